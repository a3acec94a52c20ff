use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::catalog::InsuranceProduct;

/// Flat GST rate applied on top of the base premium
pub const GST_RATE: f64 = 0.18;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)").expect("valid number pattern"));

/// Which amount `add_selected_product` charges for a product.
///
/// The edit flow always scales the premium with the chosen sum insured, while
/// first-time selection historically charged the catalog's flat amount. Both
/// are kept selectable until the product owner settles on one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumBasis {
    #[default]
    CatalogFlat,
    ScaledBySumInsured,
}

impl std::str::FromStr for PremiumBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog_flat" | "flat" => Ok(PremiumBasis::CatalogFlat),
            "scaled" | "scaled_by_sum_insured" => Ok(PremiumBasis::ScaledBySumInsured),
            other => Err(format!("unknown premium basis: {other}")),
        }
    }
}

/// Half-up rounding to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Parses a formatted rupee string such as `₹58,869` into a number.
/// Trailing garbage after a numeric prefix is ignored.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();
    let number = LEADING_NUMBER.find(&cleaned)?;
    number.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn gst_for(base_premium: f64) -> f64 {
    round_one_decimal(base_premium * GST_RATE)
}

/// Premium scaled by the ratio of the chosen sum insured to the catalog one
pub fn scaled_premium(product: &InsuranceProduct, selected_sum_insured: &str) -> f64 {
    let base = parse_amount(product.premium_amount()).unwrap_or(0.0);
    let catalog_sum = parse_amount(&product.sum_insured).unwrap_or(0.0);
    let selected = parse_amount(selected_sum_insured).unwrap_or(0.0);
    let multiplier = if catalog_sum > 0.0 {
        selected / catalog_sum
    } else {
        1.0
    };
    round_one_decimal(base * multiplier)
}

/// A product the applicant has chosen, with its computed price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
    pub product: InsuranceProduct,
    pub selected_sum_insured: String,
    pub base_premium: f64,
    pub gst: f64,
    pub calculated_premium: f64,
    pub charge_code: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_options: BTreeMap<String, String>,
}

impl SelectedProduct {
    pub fn new(
        product: InsuranceProduct,
        sum_insured: impl Into<String>,
        base_premium: f64,
    ) -> Self {
        let gst = gst_for(base_premium);
        Self {
            charge_code: product.charge_code.clone(),
            product,
            selected_sum_insured: sum_insured.into(),
            base_premium,
            gst,
            calculated_premium: base_premium + gst,
            additional_options: BTreeMap::new(),
        }
    }

    /// Replaces sum insured and recomputes GST and total from `premium`
    pub fn reprice(&mut self, sum_insured: impl Into<String>, premium: f64) {
        self.selected_sum_insured = sum_insured.into();
        self.base_premium = premium;
        self.gst = gst_for(premium);
        self.calculated_premium = premium + self.gst;
    }

    pub fn insurer_id(&self) -> &str {
        &self.product.insurer_id
    }
}

/// Formats an amount with Indian digit grouping (`30,00,000`), keeping up to
/// three fractional digits and dropping trailing zeros.
pub fn format_inr(amount: f64) -> String {
    let negative = amount < 0.0;
    let scaled = (amount.abs() * 1000.0).round() as u128;
    let whole = (scaled / 1000).to_string();
    let fraction = format!("{:03}", scaled % 1000);
    let fraction = fraction.trim_end_matches('0');

    let grouped = if whole.len() <= 3 {
        whole
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.push(right);
            rest = left;
        }
        if !rest.is_empty() {
            groups.push(rest);
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let mut out = String::new();
    if negative && (scaled > 0) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_product;

    #[test]
    fn parses_rupee_strings() {
        assert_eq!(parse_amount("₹58,869"), Some(58869.0));
        assert_eq!(parse_amount(" ₹15,00,000 "), Some(1_500_000.0));
        assert_eq!(parse_amount("1234.5abc"), Some(1234.5));
        assert_eq!(parse_amount("₹"), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn gst_is_rounded_to_one_decimal() {
        assert_eq!(gst_for(58869.0), 10596.4);
        assert_eq!(gst_for(10779.0), 1940.2);
        assert_eq!(gst_for(0.0), 0.0);
    }

    #[test]
    fn reprice_recomputes_totals() {
        let product = find_product("gpa").unwrap().clone();
        let mut selected = SelectedProduct::new(product, "₹15,00,000", 10779.0);
        selected.reprice("₹10,00,000", 7186.0);

        let expected_gst = (7186.0_f64 * 0.18 * 10.0).round() / 10.0;
        assert_eq!(selected.selected_sum_insured, "₹10,00,000");
        assert_eq!(selected.gst, expected_gst);
        assert_eq!(selected.calculated_premium, 7186.0 + expected_gst);
    }

    #[test]
    fn premium_scales_with_sum_insured() {
        let product = find_product("hdc-emi").unwrap();
        assert_eq!(scaled_premium(product, "₹15,00,000"), 14429.0);
        assert_eq!(scaled_premium(product, "₹7,50,000"), 7214.5);
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(3_000_000.0), "30,00,000");
        assert_eq!(format_inr(69465.4), "69,465.4");
        assert_eq!(format_inr(999.0), "999");
        assert_eq!(format_inr(0.0), "0");
        assert_eq!(format_inr(-123456.0), "-1,23,456");
        assert_eq!(format_inr(1234.5678), "1,234.568");
        assert_eq!(format_inr(0.5), "0.5");
        assert_eq!(format_inr(1_00_000.25), "1,00,000.25");
    }

    #[test]
    fn premium_basis_parses_env_values() {
        assert_eq!("scaled".parse::<PremiumBasis>(), Ok(PremiumBasis::ScaledBySumInsured));
        assert_eq!("CATALOG_FLAT".parse::<PremiumBasis>(), Ok(PremiumBasis::CatalogFlat));
        assert!("other".parse::<PremiumBasis>().is_err());
    }
}
