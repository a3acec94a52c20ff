use async_trait::async_trait;
use tracing::info;

use crate::{
    action::JourneyAction,
    error::Result,
    screen::{Screen, ScreenResult},
    state::LoanApplication,
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

/// Step 2: loan summary, where the agent decides whether to offer add-on products
pub struct LoanConfirmationScreen;

#[async_trait]
impl Screen for LoanConfirmationScreen {
    fn step(&self) -> Step {
        Step::LoanConfirmation
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::UpdateLoanAmount { loan_amount } => {
                session.state.update_loan_application(LoanApplication {
                    loan_amount: Some(loan_amount.clone()),
                    ..Default::default()
                });
                Ok(ScreenResult::stay(format!("Loan amount set to {loan_amount}")))
            }
            JourneyAction::AddProducts => {
                session.state.set_wants_insurance(true);
                info!(session_id = %session.id, "Agent chose to add products");
                Ok(ScreenResult::go_to(Step::InsuranceRecommendations))
            }
            JourneyAction::SkipProducts => {
                session.state.set_wants_insurance(false);
                info!(session_id = %session.id, "Agent skipped products");
                Ok(ScreenResult::go_to(Step::Success))
            }
            JourneyAction::Back => Ok(ScreenResult::go_to(Step::LoanApplication)),
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
