use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    action::JourneyAction,
    error::Result,
    screen::{NextAction, Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

static OTP_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid otp pattern"));

/// Step 7: the customer enters the OTP. Any six-digit code is accepted.
pub struct OtpVerificationScreen {
    pub verify_delay: Duration,
}

#[async_trait]
impl Screen for OtpVerificationScreen {
    fn step(&self) -> Step {
        Step::OtpVerification
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::VerifyOtp { otp } => {
                if !OTP_FORMAT.is_match(&otp) {
                    warn!(session_id = %session.id, length = otp.len(), "Malformed OTP");
                    return Ok(ScreenResult::stay("Enter the 6-digit OTP"));
                }

                tokio::time::sleep(self.verify_delay).await;
                session.state.verify_otp();

                let policy = session.state.policy_number.clone().unwrap_or_default();
                info!(session_id = %session.id, policy_number = %policy, "OTP verified");
                Ok(ScreenResult::new(
                    Some(format!("Verified. Policy number {policy}")),
                    NextAction::GoTo(Step::Success),
                ))
            }
            JourneyAction::ResendOtp => Ok(ScreenResult::stay("A new OTP has been sent")),
            JourneyAction::Back => Ok(ScreenResult::go_to(Step::CustomerConfirmation)),
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
