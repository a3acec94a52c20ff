use async_trait::async_trait;
use tracing::info;

use crate::{
    action::JourneyAction,
    error::Result,
    screen::{NextAction, Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

/// Step 1: the agent captures the applicant and loan details
pub struct LoanApplicationScreen;

#[async_trait]
impl Screen for LoanApplicationScreen {
    fn step(&self) -> Step {
        Step::LoanApplication
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::SubmitLoanApplication { application } => {
                session.state.update_loan_application(application);
                session.state.generate_los_id();

                let los_id = session.state.los_id.clone().unwrap_or_default();
                info!(session_id = %session.id, los_id = %los_id, "Loan application submitted");

                Ok(ScreenResult::new(
                    Some(format!("Application {los_id} created")),
                    NextAction::GoTo(Step::LoanConfirmation),
                ))
            }
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
