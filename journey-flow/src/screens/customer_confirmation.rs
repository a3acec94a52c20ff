use async_trait::async_trait;
use tracing::info;

use crate::{
    action::JourneyAction,
    error::Result,
    pricing::PremiumBasis,
    screen::{Screen, ScreenResult},
    step::Step,
    storage::JourneySession,
};

use super::{products, unsupported};

/// Step 6: the customer reviews details and products, then gives consent
pub struct CustomerConfirmationScreen {
    pub premium_basis: PremiumBasis,
}

#[async_trait]
impl Screen for CustomerConfirmationScreen {
    fn step(&self) -> Step {
        Step::CustomerConfirmation
    }

    async fn handle(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ScreenResult> {
        match action {
            JourneyAction::UpdateProposal { proposal } => {
                session.state.update_insurance_proposal(proposal);
                Ok(ScreenResult::stay("Details updated"))
            }
            JourneyAction::ToggleProduct { product_id } => {
                if session.state.is_selected(&product_id) {
                    // The customer cannot drop the last remaining product
                    if session.state.selected_insurance_products.len() > 1 {
                        Ok(products::remove(session, &product_id))
                    } else {
                        Ok(ScreenResult::stay("At least one product must stay selected"))
                    }
                } else {
                    products::select(session, &product_id, self.premium_basis)
                }
            }
            JourneyAction::RemoveProduct { product_id } => {
                Ok(products::remove(session, &product_id))
            }
            JourneyAction::EditProduct {
                product_id,
                sum_insured,
            } => products::edit(session, &product_id, &sum_insured),
            JourneyAction::Confirm { consents } => {
                session.consents = consents;
                if consents.all_given() {
                    info!(session_id = %session.id, "Customer confirmed");
                    Ok(ScreenResult::go_to(Step::OtpVerification))
                } else {
                    Ok(ScreenResult::stay(
                        "All declarations must be accepted before continuing",
                    ))
                }
            }
            other => Err(unsupported(self.step(), &other)),
        }
    }
}
