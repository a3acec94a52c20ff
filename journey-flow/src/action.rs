use serde::{Deserialize, Serialize};

use crate::state::{InsuranceProposal, LoanApplication};

/// Channels the customer confirmation link can be sent over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkChannel {
    Sms,
    Email,
    Whatsapp,
}

/// The five declarations the customer must accept before OTP verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consents {
    pub agreed_to_terms: bool,
    pub confirmed_accuracy: bool,
    pub consent_healthy: bool,
    pub consent_share_details: bool,
    pub consent_deduct_premium: bool,
}

impl Consents {
    pub fn all_given(&self) -> bool {
        self.agreed_to_terms
            && self.confirmed_accuracy
            && self.consent_healthy
            && self.consent_share_details
            && self.consent_deduct_premium
    }

    pub fn all() -> Self {
        Self {
            agreed_to_terms: true,
            confirmed_accuracy: true,
            consent_healthy: true,
            consent_share_details: true,
            consent_deduct_premium: true,
        }
    }
}

/// Input submitted on a screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JourneyAction {
    SubmitLoanApplication {
        #[serde(default)]
        application: LoanApplication,
    },
    UpdateLoanAmount {
        loan_amount: String,
    },
    AddProducts,
    SkipProducts,
    SelectProduct {
        product_id: String,
    },
    ToggleProduct {
        product_id: String,
    },
    RemoveProduct {
        product_id: String,
    },
    EditProduct {
        product_id: String,
        sum_insured: String,
    },
    SubmitProposal {
        #[serde(default)]
        proposal: InsuranceProposal,
    },
    UpdateProposal {
        #[serde(default)]
        proposal: InsuranceProposal,
    },
    SendLink {
        channels: Vec<LinkChannel>,
    },
    Confirm {
        #[serde(default)]
        consents: Consents,
    },
    VerifyOtp {
        otp: String,
    },
    ResendOtp,
    Proceed,
    Back,
    StartNew,
    Reset,
}

impl JourneyAction {
    /// Wire name of the action, used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            JourneyAction::SubmitLoanApplication { .. } => "submit_loan_application",
            JourneyAction::UpdateLoanAmount { .. } => "update_loan_amount",
            JourneyAction::AddProducts => "add_products",
            JourneyAction::SkipProducts => "skip_products",
            JourneyAction::SelectProduct { .. } => "select_product",
            JourneyAction::ToggleProduct { .. } => "toggle_product",
            JourneyAction::RemoveProduct { .. } => "remove_product",
            JourneyAction::EditProduct { .. } => "edit_product",
            JourneyAction::SubmitProposal { .. } => "submit_proposal",
            JourneyAction::UpdateProposal { .. } => "update_proposal",
            JourneyAction::SendLink { .. } => "send_link",
            JourneyAction::Confirm { .. } => "confirm",
            JourneyAction::VerifyOtp { .. } => "verify_otp",
            JourneyAction::ResendOtp => "resend_otp",
            JourneyAction::Proceed => "proceed",
            JourneyAction::Back => "back",
            JourneyAction::StartNew => "start_new",
            JourneyAction::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_are_tagged_by_type() {
        let action: JourneyAction = serde_json::from_value(json!({
            "type": "edit_product",
            "product_id": "gpa",
            "sum_insured": "₹10,00,000"
        }))
        .unwrap();
        assert_eq!(
            action,
            JourneyAction::EditProduct {
                product_id: "gpa".to_string(),
                sum_insured: "₹10,00,000".to_string(),
            }
        );
        assert_eq!(action.name(), "edit_product");
    }

    #[test]
    fn missing_consents_default_to_false() {
        let raw = json!({"type": "confirm", "consents": {"agreed_to_terms": true}});
        let action: JourneyAction = serde_json::from_value(raw).unwrap();
        match action {
            JourneyAction::Confirm { consents } => {
                assert!(consents.agreed_to_terms);
                assert!(!consents.all_given());
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn loan_application_payload_uses_camel_case() {
        let action: JourneyAction = serde_json::from_value(json!({
            "type": "submit_loan_application",
            "application": {"fullName": "Test", "loanAmount": "500000"}
        }))
        .unwrap();
        let JourneyAction::SubmitLoanApplication { application } = action else {
            panic!("wrong variant");
        };
        assert_eq!(application.full_name.as_deref(), Some("Test"));
        assert_eq!(application.loan_amount.as_deref(), Some("500000"));
        assert!(application.city.is_none());
    }
}
