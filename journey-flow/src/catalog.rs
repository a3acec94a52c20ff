//! Static catalog of third-party insurance products offered alongside a loan.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Product category. At most one product per category can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Vas,
    Travel,
    #[serde(rename = "creditlife")]
    CreditLife,
    Health,
    General,
}

impl ProductType {
    /// Order in which categories are presented
    pub const DISPLAY_ORDER: [ProductType; 5] = [
        ProductType::Vas,
        ProductType::CreditLife,
        ProductType::General,
        ProductType::Health,
        ProductType::Travel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProductType::Vas => "VAS – Health Insurance",
            ProductType::Travel => "Travel Insurance",
            ProductType::CreditLife => "Credit Life Insurance",
            ProductType::Health => "Health Insurance",
            ProductType::General => "General Insurance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyCategory {
    BajajFinservHealth,
    HdfcLife,
    PnbMetlife,
    Gpa,
    HdcEmi,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceProduct {
    pub insurer_id: String,
    pub product_name: String,
    pub insurer_name: String,
    pub product_type: ProductType,
    pub company_category: CompanyCategory,
    pub sum_insured: String,
    #[serde(default)]
    pub available_sum_insured: Vec<String>,
    pub product_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_premium: Option<String>,
    pub charge_code: String,
    pub key_benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_tenure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_hospitals: Option<u32>,
}

impl InsuranceProduct {
    /// Sum insured used when the product is first selected
    pub fn default_sum_insured(&self) -> &str {
        self.available_sum_insured
            .first()
            .map(String::as_str)
            .unwrap_or(&self.sum_insured)
    }

    /// Premium string the price is read from: product amount, then annual premium
    pub fn premium_amount(&self) -> &str {
        if !self.product_amount.trim().is_empty() {
            &self.product_amount
        } else {
            self.annual_premium.as_deref().unwrap_or("")
        }
    }

    fn matches(&self, term: &str) -> bool {
        self.product_name.to_lowercase().contains(term)
            || self.insurer_name.to_lowercase().contains(term)
            || self.product_type.label().to_lowercase().contains(term)
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    insurer_id: &str,
    product_name: &str,
    insurer_name: &str,
    product_type: ProductType,
    company_category: CompanyCategory,
    charge_code: &str,
    product_amount: &str,
    key_benefits: &[&str],
) -> InsuranceProduct {
    InsuranceProduct {
        insurer_id: insurer_id.to_string(),
        product_name: product_name.to_string(),
        insurer_name: insurer_name.to_string(),
        product_type,
        company_category,
        sum_insured: "₹15,00,000".to_string(),
        available_sum_insured: vec!["₹15,00,000".to_string()],
        product_amount: product_amount.to_string(),
        annual_premium: None,
        charge_code: charge_code.to_string(),
        key_benefits: key_benefits.iter().map(|b| b.to_string()).collect(),
        cover: None,
        product_tenure: Some("5 Yr".to_string()),
        network_hospitals: None,
    }
}

static CATALOG: LazyLock<Vec<InsuranceProduct>> = LazyLock::new(|| {
    let mut swasthyacare = product(
        "bajaj-swasthyacare-supreme",
        "Bajaj Swasthyacare Supreme",
        "Bajaj Finserv Health",
        ProductType::Vas,
        CompanyCategory::BajajFinservHealth,
        "BJ00501",
        "₹58,869",
        &[
            "Complimentary Credit Life insurance cover of ₹15,00,000 sum assured",
            "Wellness benefits worth – ₹59,000 Which Includes Below Benefits-",
            "Annual LAB Benefits",
            "Annual OPD benefits",
            "Free Annual Health Check up",
            "Tele & Distant Consultations",
            "10% Network Discounts",
        ],
    );
    swasthyacare.product_tenure = Some("Student – 5 Yr".to_string());

    vec![
        swasthyacare,
        product(
            "hdfc-life-group-credit",
            "HDFC Life Group Credit Policy",
            "HDFC Life",
            ProductType::CreditLife,
            CompanyCategory::HdfcLife,
            "BJ00701",
            "₹51,481",
            &["Credit Life Insurance Cover ₹15,00,000 sum assured"],
        ),
        product(
            "pnb-metlife",
            "PNB Metlife",
            "PNB MetLife",
            ProductType::CreditLife,
            CompanyCategory::PnbMetlife,
            "BJ00702",
            "₹41,241",
            &["Credit Life Insurance Cover ₹15,00,000 sum assured"],
        ),
        product(
            "gpa",
            "GPA",
            "GPA",
            ProductType::General,
            CompanyCategory::Gpa,
            "BJ00901",
            "₹10,779",
            &[
                "Accidental Death",
                "Permanent Disability",
                "Permanent Partial Disability",
            ],
        ),
        product(
            "hdc-emi",
            "HDC & EMI",
            "HDC & EMI",
            ProductType::General,
            CompanyCategory::HdcEmi,
            "BJ00902",
            "₹14,429",
            &["Critical Illness & Personal Accident", "EMI Protection"],
        ),
    ]
});

/// All products offered in the journey
pub fn catalog() -> &'static [InsuranceProduct] {
    &CATALOG
}

pub fn find_product(insurer_id: &str) -> Option<&'static InsuranceProduct> {
    CATALOG.iter().find(|p| p.insurer_id == insurer_id)
}

/// Case-insensitive search over product name, insurer name and category label.
/// An empty term matches everything.
pub fn search_products(term: &str) -> Vec<&'static InsuranceProduct> {
    let term = term.trim().to_lowercase();
    CATALOG.iter().filter(|p| p.matches(&term)).collect()
}

/// Groups products by category in display order. Empty categories are kept.
pub fn products_by_category<'a>(
    products: &[&'a InsuranceProduct],
) -> Vec<(ProductType, Vec<&'a InsuranceProduct>)> {
    ProductType::DISPLAY_ORDER
        .iter()
        .map(|kind| {
            let bucket = products
                .iter()
                .copied()
                .filter(|p| p.product_type == *kind)
                .collect();
            (*kind, bucket)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_products_with_unique_ids() {
        let ids: std::collections::HashSet<_> = catalog().iter().map(|p| &p.insurer_id).collect();
        assert_eq!(catalog().len(), 5);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn search_matches_category_label() {
        let hits = search_products("credit life");
        let ids: Vec<_> = hits.iter().map(|p| p.insurer_id.as_str()).collect();
        assert_eq!(ids, vec!["hdfc-life-group-credit", "pnb-metlife"]);
    }

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_products("  ").len(), catalog().len());
    }

    #[test]
    fn grouping_follows_display_order() {
        let all: Vec<_> = catalog().iter().collect();
        let grouped = products_by_category(&all);
        let order: Vec<_> = grouped.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(order, ProductType::DISPLAY_ORDER.to_vec());
        assert_eq!(grouped[2].1.len(), 2);
        assert!(grouped[4].1.is_empty());
    }

    #[test]
    fn product_type_serializes_like_the_catalog_tags() {
        assert_eq!(
            serde_json::to_string(&ProductType::CreditLife).unwrap(),
            "\"creditlife\""
        );
        assert_eq!(
            serde_json::to_string(&CompanyCategory::BajajFinservHealth).unwrap(),
            "\"bajaj-finserv-health\""
        );
    }
}
