use async_trait::async_trait;

use crate::{
    action::JourneyAction,
    error::Result,
    pricing::format_inr,
    screen::{NextAction, Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

/// Step 8: submission summary
pub struct SuccessScreen;

#[async_trait]
impl Screen for SuccessScreen {
    fn step(&self) -> Step {
        Step::Success
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            // The Success -> LoanApplication edge resets the session
            JourneyAction::StartNew => Ok(ScreenResult::go_to(Step::LoanApplication)),
            JourneyAction::Proceed => {
                let state = &session.state;
                let summary = match &state.policy_number {
                    Some(policy) => format!(
                        "Application {} submitted with policy {} (total premium ₹{})",
                        state.los_id.as_deref().unwrap_or("N/A"),
                        policy,
                        format_inr(state.total_premium())
                    ),
                    None => format!(
                        "Application {} submitted without add-on products",
                        state.los_id.as_deref().unwrap_or("N/A")
                    ),
                };
                Ok(ScreenResult::new(Some(summary), NextAction::Complete))
            }
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
