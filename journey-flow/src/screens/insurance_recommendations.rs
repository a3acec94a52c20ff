use async_trait::async_trait;

use crate::{
    action::JourneyAction,
    error::Result,
    pricing::PremiumBasis,
    screen::{Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::{products, unsupported};

/// Step 3: product recommendations, one pick per category
pub struct InsuranceRecommendationsScreen {
    pub premium_basis: PremiumBasis,
}

#[async_trait]
impl Screen for InsuranceRecommendationsScreen {
    fn step(&self) -> Step {
        Step::InsuranceRecommendations
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::SelectProduct { product_id } => {
                products::select(session, &product_id, self.premium_basis)
            }
            JourneyAction::RemoveProduct { product_id } => {
                Ok(products::remove(session, &product_id))
            }
            JourneyAction::EditProduct {
                product_id,
                sum_insured,
            } => products::edit(session, &product_id, &sum_insured),
            // The proposal form is reached even when nothing was selected
            JourneyAction::Proceed => Ok(ScreenResult::go_to(Step::InsuranceProposal)),
            JourneyAction::Back => Ok(ScreenResult::go_to(Step::LoanConfirmation)),
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
