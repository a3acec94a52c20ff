use async_trait::async_trait;
use tracing::info;

use crate::{
    action::JourneyAction,
    error::Result,
    screen::{Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::unsupported;

/// Step 4: nominee, body measurements and medical history
pub struct InsuranceProposalScreen;

#[async_trait]
impl Screen for InsuranceProposalScreen {
    fn step(&self) -> Step {
        Step::InsuranceProposal
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::SubmitProposal { mut proposal } => {
                if proposal.has_preexisting_diseases.is_none() {
                    proposal.has_preexisting_diseases = session
                        .state
                        .insurance_proposal
                        .has_preexisting_diseases
                        .or(Some(false));
                }
                if proposal.selected_medical_conditions.is_none()
                    && session.state.insurance_proposal.selected_medical_conditions.is_none()
                {
                    proposal.selected_medical_conditions = Some(Vec::new());
                }
                session.state.update_insurance_proposal(proposal);
                info!(session_id = %session.id, "Insurance proposal captured");
                Ok(ScreenResult::go_to(Step::SendCustomerLink))
            }
            JourneyAction::Back => Ok(ScreenResult::go_to(Step::InsuranceRecommendations)),
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
