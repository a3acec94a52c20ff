use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JourneyError, Result};

/// The eight screens of the journey, in their canonical order
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    LoanApplication,
    LoanConfirmation,
    InsuranceRecommendations,
    InsuranceProposal,
    SendCustomerLink,
    CustomerConfirmation,
    OtpVerification,
    Success,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::LoanApplication,
        Step::LoanConfirmation,
        Step::InsuranceRecommendations,
        Step::InsuranceProposal,
        Step::SendCustomerLink,
        Step::CustomerConfirmation,
        Step::OtpVerification,
        Step::Success,
    ];

    /// 1-based position of the step
    pub fn index(self) -> u8 {
        match self {
            Step::LoanApplication => 1,
            Step::LoanConfirmation => 2,
            Step::InsuranceRecommendations => 3,
            Step::InsuranceProposal => 4,
            Step::SendCustomerLink => 5,
            Step::CustomerConfirmation => 6,
            Step::OtpVerification => 7,
            Step::Success => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::LoanApplication => "Loan Application",
            Step::LoanConfirmation => "Loan Confirmation",
            Step::InsuranceRecommendations => "Products",
            Step::InsuranceProposal => "Proposal",
            Step::SendCustomerLink => "Customer Link",
            Step::CustomerConfirmation => "Customer Confirmation",
            Step::OtpVerification => "OTP Verification",
            Step::Success => "Success",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::LoanApplication => "Applicant and loan details",
            Step::LoanConfirmation => "Review the loan and decide on add-ons",
            Step::InsuranceRecommendations => "Pick at most one product per category",
            Step::InsuranceProposal => "Nominee and health details",
            Step::SendCustomerLink => "Share the confirmation link",
            Step::CustomerConfirmation => "Customer reviews and consents",
            Step::OtpVerification => "Customer verifies with OTP",
            Step::Success => "Application submitted",
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = JourneyError;

    fn try_from(index: u8) -> Result<Self> {
        Step::ALL
            .iter()
            .copied()
            .find(|step| step.index() == index)
            .ok_or(JourneyError::InvalidStep(index))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.index(), self.name())
    }
}
