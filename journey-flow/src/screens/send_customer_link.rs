use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    action::{JourneyAction, LinkChannel},
    error::Result,
    screen::{Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

/// Step 5: the agent sends the confirmation link to the customer.
/// Dispatch is simulated; nothing leaves the process.
pub struct SendCustomerLinkScreen {
    pub send_delay: Duration,
}

#[async_trait]
impl Screen for SendCustomerLinkScreen {
    fn step(&self) -> Step {
        Step::SendCustomerLink
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::SendLink { channels } => {
                let mut unique: Vec<LinkChannel> = Vec::with_capacity(channels.len());
                for channel in channels {
                    if !unique.contains(&channel) {
                        unique.push(channel);
                    }
                }

                if unique.is_empty() {
                    warn!(session_id = %session.id, "Link send requested without channels");
                    return Ok(ScreenResult::stay(
                        "Select at least one channel to send the link",
                    ));
                }

                tokio::time::sleep(self.send_delay).await;

                let link = session.customer_link_url();
                session.customer_link.sent = true;
                session.customer_link.channels = unique;
                session.customer_link.sent_at = Some(chrono::Utc::now());

                info!(
                    session_id = %session.id,
                    channels = ?session.customer_link.channels,
                    link = %link,
                    "Customer link sent"
                );
                Ok(ScreenResult::stay(format!("Link sent: {link}")))
            }
            JourneyAction::Proceed => Ok(ScreenResult::go_to(Step::CustomerConfirmation)),
            JourneyAction::Back => Ok(ScreenResult::go_to(Step::InsuranceProposal)),
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
