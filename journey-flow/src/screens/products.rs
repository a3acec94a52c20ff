use tracing::info;

use crate::{
    catalog::{InsuranceProduct, find_product},
    error::{JourneyError, Result},
    pricing::{PremiumBasis, format_inr, scaled_premium},
    screen::ScreenResult,
    storage::JourneySession,
};

pub(super) fn lookup(product_id: &str) -> Result<&'static InsuranceProduct> {
    find_product(product_id).ok_or_else(|| JourneyError::ProductNotFound(product_id.to_string()))
}

/// Selects a product, replacing whatever was chosen in its category
pub(super) fn select(
    session: &mut JourneySession,
    product_id: &str,
    basis: PremiumBasis,
) -> Result<ScreenResult> {
    let product = lookup(product_id)?;
    let replaced = session
        .state
        .selected_in_category(product.product_type)
        .filter(|existing| existing.insurer_id() != product.insurer_id)
        .map(|existing| existing.product.product_name.clone());

    session
        .state
        .add_selected_product(product, product.default_sum_insured(), basis);

    info!(
        session_id = %session.id,
        product = %product.insurer_id,
        replaced = ?replaced,
        "Product selected"
    );

    let message = match replaced {
        Some(previous) => format!(
            "{} selected, replacing {}",
            product.product_name, previous
        ),
        None => format!("{} selected", product.product_name),
    };
    Ok(ScreenResult::stay(message))
}

pub(super) fn remove(session: &mut JourneySession, product_id: &str) -> ScreenResult {
    session.state.remove_selected_product(product_id);
    ScreenResult::stay(format!(
        "{} product(s) selected",
        session.state.selected_insurance_products.len()
    ))
}

/// Changes the sum insured of a selected product, scaling its premium
pub(super) fn edit(
    session: &mut JourneySession,
    product_id: &str,
    sum_insured: &str,
) -> Result<ScreenResult> {
    let product = lookup(product_id)?;
    if !session.state.is_selected(product_id) {
        return Ok(ScreenResult::stay(format!(
            "{} is not selected",
            product.product_name
        )));
    }

    let premium = scaled_premium(product, sum_insured);
    session
        .state
        .update_product_config(product_id, sum_insured, premium);

    Ok(ScreenResult::stay(format!(
        "{} updated: sum insured {}, premium ₹{}",
        product.product_name,
        sum_insured,
        format_inr(premium)
    )))
}
