//! Per-load product allocation
//!
//! Distributes each product's total amount across loads in proportion to
//! each load's share of the total volume.

use crate::mix::units::round2;
use crate::models::{LoadProductAmount, TankMixProduct};

/// Amounts of each mix product for one load.
///
/// Returns an empty list when the total volume is non-positive (no
/// allocation is possible). Per-load amounts are rounded to hundredths, so
/// summing a product across all loads matches its total within 0.01 per
/// load.
pub fn calculate_load_products(
    load_volume: f64,
    total_volume: f64,
    products: &[TankMixProduct],
) -> Vec<LoadProductAmount> {
    if total_volume <= 0.0 {
        return Vec::new();
    }

    let proportion = load_volume / total_volume;

    products
        .iter()
        .map(|p| LoadProductAmount {
            product_id: p.product.id.clone(),
            product_name: p.product.name.clone(),
            amount: round2(p.total_amount * proportion),
            display_unit: p.product.measurement_unit.base_display_unit().to_string(),
        })
        .collect()
}
