// One screen per journey step
pub mod customer_confirmation;
pub mod insurance_proposal;
pub mod insurance_recommendations;
pub mod loan_application;
pub mod loan_confirmation;
pub mod otp_verification;
pub mod send_customer_link;
pub mod success;

// Shared product selection helpers
mod products;

pub use customer_confirmation::CustomerConfirmationScreen;
pub use insurance_proposal::InsuranceProposalScreen;
pub use insurance_recommendations::InsuranceRecommendationsScreen;
pub use loan_application::LoanApplicationScreen;
pub use loan_confirmation::LoanConfirmationScreen;
pub use otp_verification::OtpVerificationScreen;
pub use send_customer_link::SendCustomerLinkScreen;
pub use success::SuccessScreen;

use crate::{action::JourneyAction, error::JourneyError, step::Step};

pub(crate) fn unsupported(step: Step, action: &JourneyAction) -> JourneyError {
    JourneyError::UnsupportedAction {
        step,
        action: action.name().to_string(),
    }
}
