use std::sync::Arc;

use crate::{
    graph::{JourneyGraph, JourneyGraphBuilder},
    screens::*,
    settings::JourneySettings,
    step::Step,
    storage::JourneySession,
};

/// The loan + insurance add-on journey with its legal transitions
pub fn build_journey_graph(settings: JourneySettings) -> JourneyGraph {
    use Step::*;

    JourneyGraphBuilder::new("loan_insurance_journey")
        .add_screen(Arc::new(LoanApplicationScreen))
        .add_screen(Arc::new(LoanConfirmationScreen))
        .add_screen(Arc::new(InsuranceRecommendationsScreen {
            premium_basis: settings.premium_basis,
        }))
        .add_screen(Arc::new(InsuranceProposalScreen))
        .add_screen(Arc::new(SendCustomerLinkScreen {
            send_delay: settings.link_send_delay,
        }))
        .add_screen(Arc::new(CustomerConfirmationScreen {
            premium_basis: settings.premium_basis,
        }))
        .add_screen(Arc::new(OtpVerificationScreen {
            verify_delay: settings.otp_delay,
        }))
        .add_screen(Arc::new(SuccessScreen))
        .add_edge(LoanApplication, LoanConfirmation)
        .add_edge(LoanConfirmation, LoanApplication)
        .add_edge(LoanConfirmation, InsuranceRecommendations)
        // Skipping add-ons goes straight to the end
        .add_edge(LoanConfirmation, Success)
        .add_edge(InsuranceRecommendations, LoanConfirmation)
        .add_edge(InsuranceRecommendations, InsuranceProposal)
        .add_edge(InsuranceProposal, InsuranceRecommendations)
        .add_edge(InsuranceProposal, SendCustomerLink)
        .add_edge(SendCustomerLink, InsuranceProposal)
        .add_conditional_edge(SendCustomerLink, CustomerConfirmation, |s| {
            s.customer_link.sent
        })
        .add_conditional_edge(CustomerConfirmation, OtpVerification, |s| {
            s.consents.all_given()
        })
        .add_edge(OtpVerification, CustomerConfirmation)
        .add_conditional_edge(OtpVerification, Success, |s| s.state.otp_verified)
        // Starting over from the end always begins a fresh journey
        .add_edge_with_effect(Success, LoanApplication, JourneySession::reset)
        .build()
}
