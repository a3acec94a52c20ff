use chrono::NaiveDate;
use std::fmt::Write;

use crate::{pricing::format_inr, pricing::parse_amount, state::JourneyState};

const STYLE: &str = r#"    body { font-family: Arial, sans-serif; padding: 20px; }
    h1 { color: #1a1a1a; }
    h2 { color: #333; margin-top: 20px; }
    table { width: 100%; border-collapse: collapse; margin: 10px 0; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
    th { background-color: #f2f2f2; }
    .section { margin: 20px 0; }"#;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_na(value: Option<&String>) -> String {
    value
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(escape)
        .unwrap_or_else(|| "N/A".to_string())
}

/// File name offered for the downloaded proposal
pub fn proposal_filename(state: &JourneyState) -> String {
    format!(
        "Proposal-{}.html",
        state.los_id.as_deref().unwrap_or("Application")
    )
}

/// Printable HTML summary of the application and the selected products
pub fn render_proposal_html(state: &JourneyState, date: NaiveDate) -> String {
    let loan = &state.loan_application;
    let proposal = &state.insurance_proposal;
    let los_id = or_na(state.los_id.as_ref());
    let loan_amount = loan
        .loan_amount
        .as_deref()
        .and_then(parse_amount)
        .unwrap_or(0.0);

    let mut html = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Insurance Proposal - {los_id}</title>
  <style>
{STYLE}
  </style>
</head>
<body>
  <h1>Insurance Proposal</h1>
  <p><strong>Application ID:</strong> {los_id}</p>
  <p><strong>Date:</strong> {date}</p>

  <div class="section">
    <h2>Applicant Details</h2>
    <table>
      <tr><th>Name</th><td>{name}</td></tr>
      <tr><th>Email</th><td>{email}</td></tr>
      <tr><th>Mobile</th><td>{mobile}</td></tr>
      <tr><th>Loan Amount</th><td>₹{amount}</td></tr>
    </table>
  </div>

  <div class="section">
    <h2>Additional Details</h2>
    <table>
      <tr><th>Gender</th><td>{gender}</td></tr>
      <tr><th>Height</th><td>{height} cm</td></tr>
      <tr><th>Weight</th><td>{weight} kg</td></tr>
      <tr><th>Occupation</th><td>{occupation}</td></tr>
      <tr><th>Nominee</th><td>{nominee}</td></tr>
    </table>
  </div>
"#,
        date = date.format("%d/%m/%Y"),
        name = or_na(loan.full_name.as_ref()),
        email = or_na(loan.email.as_ref()),
        mobile = or_na(loan.mobile.as_ref()),
        amount = format_inr(loan_amount),
        gender = or_na(proposal.gender.as_ref()),
        height = or_na(proposal.height.as_ref()),
        weight = or_na(proposal.weight.as_ref()),
        occupation = or_na(proposal.occupation.as_ref()),
        nominee = or_na(proposal.nominee_name.as_ref()),
    );

    if proposal.has_preexisting_diseases.unwrap_or(false) {
        let conditions = proposal
            .selected_medical_conditions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|c| escape(c))
            .collect::<Vec<_>>()
            .join(", ");
        let conditions = if conditions.is_empty() {
            "N/A".to_string()
        } else {
            conditions
        };
        let _ = write!(
            html,
            r#"
  <div class="section">
    <h2>Medical Information</h2>
    <p><strong>Pre-existing Conditions:</strong> Yes</p>
    <p><strong>Conditions:</strong> {conditions}</p>
  </div>
"#
        );
    }

    html.push_str(
        r#"
  <div class="section">
    <h2>Selected Products</h2>
    <table>
      <thead>
        <tr>
          <th>Product Name</th>
          <th>Insurer</th>
          <th>Sum Insured</th>
          <th>Premium</th>
        </tr>
      </thead>
      <tbody>
"#,
    );
    for item in &state.selected_insurance_products {
        let _ = write!(
            html,
            r#"        <tr>
          <td>{}</td>
          <td>{}</td>
          <td>{}</td>
          <td>₹{}</td>
        </tr>
"#,
            escape(&item.product.product_name),
            escape(&item.product.insurer_name),
            escape(&item.selected_sum_insured),
            format_inr(item.calculated_premium),
        );
    }
    let _ = write!(
        html,
        r#"      </tbody>
      <tfoot>
        <tr>
          <th colspan="3">Total Premium</th>
          <th>₹{}</th>
        </tr>
      </tfoot>
    </table>
  </div>
</body>
</html>
"#,
        format_inr(state.total_premium())
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::find_product, pricing::PremiumBasis};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn filename_falls_back_without_los_id() {
        let mut state = JourneyState::new();
        assert_eq!(proposal_filename(&state), "Proposal-Application.html");
        state.los_id = Some("LOS17".to_string());
        assert_eq!(proposal_filename(&state), "Proposal-LOS17.html");
    }

    #[test]
    fn document_lists_products_and_total() {
        let mut state = JourneyState::new();
        state.los_id = Some("LOS42".to_string());
        state.add_selected_product(
            find_product("bajaj-swasthyacare-supreme").unwrap(),
            "₹15,00,000",
            PremiumBasis::CatalogFlat,
        );

        let html = render_proposal_html(&state, date());
        assert!(html.contains("<title>Insurance Proposal - LOS42</title>"));
        assert!(html.contains("<p><strong>Date:</strong> 16/10/2026</p>"));
        assert!(html.contains("<td>₹30,00,000</td>"));
        assert!(html.contains("<td>Bajaj Swasthyacare Supreme</td>"));
        assert!(html.contains("<th>₹69,465.4</th>"));
        assert!(!html.contains("Medical Information"));
    }

    #[test]
    fn medical_section_only_with_preexisting_diseases() {
        let mut state = JourneyState::new();
        state.insurance_proposal.has_preexisting_diseases = Some(true);
        state.insurance_proposal.selected_medical_conditions =
            Some(vec!["Diabetes".to_string(), "Asthma".to_string()]);

        let html = render_proposal_html(&state, date());
        assert!(html.contains("<p><strong>Conditions:</strong> Diabetes, Asthma</p>"));
        assert!(html.contains("<p><strong>Application ID:</strong> N/A</p>"));
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let mut state = JourneyState::new();
        state.loan_application.full_name = Some("<script>alert(1)</script>".to_string());

        let html = render_proposal_html(&state, date());
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
