//! The journey state store: everything an application accumulates while it
//! moves through the eight steps, plus the named mutations applied to it.
//!
//! A `JourneyState` is a plain value owned by one session. Handlers receive it
//! by `&mut` and there is no ambient or global instance.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    catalog::{InsuranceProduct, ProductType},
    pricing::{PremiumBasis, SelectedProduct, parse_amount, scaled_premium},
    step::Step,
};

/// Loan applicant details. Every field is optional so partial updates can be
/// merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_tenure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moratorium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

macro_rules! merge_fields {
    ($target:expr, $source:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if let Some(value) = $source.$field {
                $target.$field = Some(value);
            }
        )+
    };
}

impl LoanApplication {
    /// Shallow merge: fields present in `other` overwrite, absent ones are kept
    pub fn merge(&mut self, other: LoanApplication) {
        merge_fields!(
            self,
            other,
            [
                full_name,
                parent_name,
                date_of_birth,
                mobile,
                email,
                pan,
                aadhaar,
                current_address,
                city,
                state,
                pincode,
                loan_amount,
                loan_tenure,
                education_type,
                moratorium,
                property_type,
                employment_type,
                monthly_income,
                gender,
                annual_income,
                occupation,
            ]
        );
    }

    fn demo() -> Self {
        let s = |v: &str| Some(v.to_string());
        Self {
            full_name: s("Rahul Sharma"),
            parent_name: s("Suresh Sharma"),
            date_of_birth: s("1998-05-15"),
            mobile: s("9876543210"),
            email: s("rahul.sharma@example.com"),
            pan: s("ABCDE1234F"),
            aadhaar: s("123456789012"),
            current_address: s("42, Green Valley Apartments, MG Road"),
            city: s("Bangalore"),
            state: s("Karnataka"),
            pincode: s("560001"),
            loan_amount: s("3000000"),
            loan_tenure: s("12"),
            education_type: s("ug"),
            moratorium: s("0"),
            gender: s("male"),
            annual_income: s("800000"),
            occupation: s("Student"),
            ..Self::default()
        }
    }
}

/// Nominee and health details captured for the insurance proposal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceProposal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominee_relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominee_dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_medical_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_preexisting_diseases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_medical_conditions: Option<Vec<String>>,
}

impl InsuranceProposal {
    pub fn merge(&mut self, other: InsuranceProposal) {
        merge_fields!(
            self,
            other,
            [
                gender,
                nominee_name,
                nominee_relationship,
                nominee_dob,
                occupation,
                height,
                weight,
                travel_date,
                existing_medical_conditions,
                has_preexisting_diseases,
                selected_medical_conditions,
            ]
        );
    }

    fn demo() -> Self {
        let s = |v: &str| Some(v.to_string());
        Self {
            gender: s("male"),
            nominee_name: s("Priya Sharma"),
            nominee_relationship: s("parent"),
            nominee_dob: s("1970-08-20"),
            occupation: s("Student"),
            height: s("170"),
            weight: s("65"),
            has_preexisting_diseases: Some(false),
            selected_medical_conditions: Some(Vec::new()),
            ..Self::default()
        }
    }
}

/// Everything accumulated by one application journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyState {
    pub los_id: Option<String>,
    pub loan_application: LoanApplication,
    pub wants_insurance: Option<bool>,
    pub selected_insurance_products: Vec<SelectedProduct>,
    pub insurance_proposal: InsuranceProposal,
    pub otp_verified: bool,
    pub policy_number: Option<String>,
    pub current_step: Step,
}

impl Default for JourneyState {
    /// Starts pre-filled with the demo applicant so the flow can be walked
    /// through without retyping every field.
    fn default() -> Self {
        Self {
            los_id: None,
            loan_application: LoanApplication::demo(),
            wants_insurance: None,
            selected_insurance_products: Vec::new(),
            insurance_proposal: InsuranceProposal::demo(),
            otp_verified: false,
            policy_number: None,
            current_step: Step::LoanApplication,
        }
    }
}

/// `<prefix><epoch millis><0..=999>`. Two calls within the same millisecond
/// can collide.
fn synthetic_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::rng().random_range(0..1000);
    format!("{prefix}{millis}{suffix}")
}

impl JourneyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_loan_application(&mut self, data: LoanApplication) {
        self.loan_application.merge(data);
    }

    pub fn set_wants_insurance(&mut self, wants: bool) {
        self.wants_insurance = Some(wants);
    }

    /// Adds `product` with the given sum insured. Any product already selected
    /// in the same category (including the same product) is replaced, so the
    /// list never holds two entries of one category.
    pub fn add_selected_product(
        &mut self,
        product: &InsuranceProduct,
        sum_insured: &str,
        basis: PremiumBasis,
    ) {
        let base_premium = match basis {
            PremiumBasis::CatalogFlat => match parse_amount(product.premium_amount()) {
                Some(amount) if amount == 0.0 => {
                    warn!(
                        product = %product.product_name,
                        raw = %product.premium_amount(),
                        "Product premium is zero"
                    );
                    0.0
                }
                Some(amount) => amount,
                None => {
                    warn!(
                        product = %product.product_name,
                        raw = %product.premium_amount(),
                        "Product premium not found or unparseable, using 0"
                    );
                    0.0
                }
            },
            PremiumBasis::ScaledBySumInsured => scaled_premium(product, sum_insured),
        };

        self.selected_insurance_products.retain(|p| {
            p.product.product_type != product.product_type
                && p.product.insurer_id != product.insurer_id
        });
        self.selected_insurance_products.push(SelectedProduct::new(
            product.clone(),
            sum_insured,
            base_premium,
        ));
        debug!(
            product = %product.insurer_id,
            base_premium,
            selected = self.selected_insurance_products.len(),
            "Product selected"
        );
    }

    /// No-op when `insurer_id` is not selected
    pub fn remove_selected_product(&mut self, insurer_id: &str) {
        self.selected_insurance_products
            .retain(|p| p.insurer_id() != insurer_id);
    }

    /// No-op when `insurer_id` is not selected
    pub fn update_product_config(&mut self, insurer_id: &str, sum_insured: &str, premium: f64) {
        if let Some(selected) = self
            .selected_insurance_products
            .iter_mut()
            .find(|p| p.insurer_id() == insurer_id)
        {
            selected.reprice(sum_insured, premium);
        }
    }

    pub fn update_insurance_proposal(&mut self, data: InsuranceProposal) {
        self.insurance_proposal.merge(data);
    }

    pub fn generate_los_id(&mut self) {
        self.los_id = Some(synthetic_id("LOS"));
    }

    /// Marks the OTP as verified and issues a policy number. The code itself
    /// is checked by the caller.
    pub fn verify_otp(&mut self) {
        self.otp_verified = true;
        self.policy_number = Some(synthetic_id("POL"));
    }

    pub fn generate_policy_number(&mut self) {
        self.policy_number = Some(synthetic_id("POL"));
    }

    /// Unconditional overwrite. Legal jumps are decided by the journey graph.
    pub fn set_current_step(&mut self, step: Step) {
        self.current_step = step;
    }

    pub fn reset_journey(&mut self) {
        *self = Self::default();
    }

    pub fn total_premium(&self) -> f64 {
        self.selected_insurance_products
            .iter()
            .map(|p| p.calculated_premium)
            .sum()
    }

    pub fn selected_in_category(&self, product_type: ProductType) -> Option<&SelectedProduct> {
        self.selected_insurance_products
            .iter()
            .find(|p| p.product.product_type == product_type)
    }

    pub fn is_selected(&self, insurer_id: &str) -> bool {
        self.selected_insurance_products
            .iter()
            .any(|p| p.insurer_id() == insurer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, find_product};
    use regex::Regex;

    fn product(id: &str) -> InsuranceProduct {
        find_product(id).unwrap().clone()
    }

    #[test]
    fn loan_update_is_a_shallow_merge() {
        let mut state = JourneyState::new();
        state.update_loan_application(LoanApplication {
            full_name: Some("Test".to_string()),
            city: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(state.loan_application.full_name.as_deref(), Some("Test"));
        assert_eq!(state.loan_application.city.as_deref(), Some(""));
        assert_eq!(state.loan_application.mobile.as_deref(), Some("9876543210"));
    }

    #[test]
    fn adding_uses_flat_catalog_amount_and_gst() {
        let mut state = JourneyState::new();
        state.add_selected_product(
            &product("bajaj-swasthyacare-supreme"),
            "₹15,00,000",
            PremiumBasis::CatalogFlat,
        );

        let selected = &state.selected_insurance_products[0];
        assert_eq!(selected.base_premium, 58869.0);
        assert_eq!(selected.gst, 10596.4);
        assert_eq!(selected.calculated_premium, 58869.0 + 10596.4);
        assert_eq!(selected.charge_code, "BJ00501");
    }

    #[test]
    fn zero_catalog_premium_is_charged_as_zero() {
        let mut free = product("gpa");
        free.product_amount = "₹0".to_string();
        let mut state = JourneyState::new();
        state.add_selected_product(&free, "₹1,00,000", PremiumBasis::CatalogFlat);

        let selected = &state.selected_insurance_products[0];
        assert_eq!(selected.base_premium, 0.0);
        assert_eq!(selected.gst, 0.0);
        assert_eq!(selected.calculated_premium, 0.0);
        assert_eq!(state.total_premium(), 0.0);
    }

    #[test]
    fn scaled_basis_prices_by_sum_insured() {
        let mut state = JourneyState::new();
        state.add_selected_product(
            &product("hdc-emi"),
            "₹7,50,000",
            PremiumBasis::ScaledBySumInsured,
        );
        assert_eq!(state.selected_insurance_products[0].base_premium, 7214.5);
    }

    #[test]
    fn unparseable_premium_defaults_to_zero() {
        let mut broken = product("gpa");
        broken.product_amount = "on request".to_string();
        let mut state = JourneyState::new();
        state.add_selected_product(&broken, "₹15,00,000", PremiumBasis::CatalogFlat);

        let selected = &state.selected_insurance_products[0];
        assert_eq!(selected.base_premium, 0.0);
        assert_eq!(selected.calculated_premium, 0.0);
    }

    #[test]
    fn at_most_one_product_per_category() {
        let mut state = JourneyState::new();
        let basis = PremiumBasis::CatalogFlat;
        for p in catalog() {
            state.add_selected_product(p, p.default_sum_insured(), basis);
        }
        state.add_selected_product(&product("hdfc-life-group-credit"), "₹15,00,000", basis);
        state.add_selected_product(&product("hdfc-life-group-credit"), "₹15,00,000", basis);
        state.remove_selected_product("gpa");
        state.add_selected_product(&product("gpa"), "₹15,00,000", basis);

        for kind in ProductType::DISPLAY_ORDER {
            let count = state
                .selected_insurance_products
                .iter()
                .filter(|p| p.product.product_type == kind)
                .count();
            assert!(count <= 1, "{kind:?} selected {count} times");
        }
        assert_eq!(
            state.selected_in_category(ProductType::CreditLife).unwrap().insurer_id(),
            "hdfc-life-group-credit"
        );
        assert_eq!(
            state.selected_in_category(ProductType::General).unwrap().insurer_id(),
            "gpa"
        );
    }

    #[test]
    fn remove_and_update_ignore_unknown_ids() {
        let mut state = JourneyState::new();
        state.add_selected_product(&product("gpa"), "₹15,00,000", PremiumBasis::CatalogFlat);
        let before = state.clone();

        state.remove_selected_product("missing");
        state.update_product_config("missing", "₹1", 1.0);
        assert_eq!(state, before);
    }

    #[test]
    fn update_product_config_recomputes_gst() {
        let mut state = JourneyState::new();
        state.add_selected_product(
            &product("pnb-metlife"),
            "₹15,00,000",
            PremiumBasis::CatalogFlat,
        );
        state.update_product_config("pnb-metlife", "₹10,00,000", 27494.0);

        let selected = &state.selected_insurance_products[0];
        let gst = (27494.0_f64 * 0.18 * 10.0).round() / 10.0;
        assert_eq!(selected.selected_sum_insured, "₹10,00,000");
        assert_eq!(selected.gst, gst);
        assert_eq!(selected.calculated_premium, 27494.0 + gst);
    }

    #[test]
    fn reset_is_idempotent_and_restores_demo_values() {
        let mut state = JourneyState::new();
        state.update_loan_application(LoanApplication {
            full_name: Some("Someone Else".to_string()),
            ..Default::default()
        });
        state.generate_los_id();
        state.verify_otp();
        state.set_current_step(Step::Success);

        state.reset_journey();
        let once = state.clone();
        state.reset_journey();

        assert_eq!(state, once);
        assert_eq!(state, JourneyState::default());
        assert_eq!(state.loan_application.full_name.as_deref(), Some("Rahul Sharma"));
        assert_eq!(state.insurance_proposal.nominee_name.as_deref(), Some("Priya Sharma"));
    }

    #[test]
    fn synthetic_ids_follow_their_patterns() {
        let mut state = JourneyState::new();
        state.generate_los_id();
        state.generate_policy_number();

        assert!(Regex::new(r"^LOS\d+$").unwrap().is_match(state.los_id.as_deref().unwrap()));
        assert!(Regex::new(r"^POL\d+$").unwrap().is_match(state.policy_number.as_deref().unwrap()));
        assert!(!state.otp_verified);
    }

    #[test]
    fn verify_otp_marks_verified_and_issues_policy() {
        let mut state = JourneyState::new();
        state.verify_otp();
        assert!(state.otp_verified);
        assert!(state.policy_number.as_deref().unwrap().starts_with("POL"));
    }

    #[test]
    fn step_update_then_loan_update() {
        let mut state = JourneyState::new();
        state.update_loan_application(LoanApplication {
            full_name: Some("Test".to_string()),
            ..Default::default()
        });
        state.generate_los_id();
        state.set_current_step(Step::try_from(2).unwrap());

        assert_eq!(state.current_step.index(), 2);
        assert_eq!(state.loan_application.full_name.as_deref(), Some("Test"));
        assert!(state.los_id.is_some());
    }

    #[test]
    fn state_serializes_in_camel_case() {
        let json = serde_json::to_value(JourneyState::new()).unwrap();
        assert_eq!(json["loanApplication"]["fullName"], "Rahul Sharma");
        assert_eq!(json["currentStep"], "loan_application");
        assert!(json["losId"].is_null());
    }
}
