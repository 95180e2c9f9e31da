//! Rate conversion
//!
//! Turns a product's application rate into an absolute amount in base units
//! for a given acreage or carrier-volume context.

use crate::mix::units::{MeasurementUnit, RateBasis};
use crate::models::TankMixProduct;

/// Convert an application rate into an absolute amount in base units
/// (gallons for liquid units, pounds for dry units).
///
/// Non-positive rates or scaling quantities yield 0.0 rather than an error;
/// input validation for presentation belongs to the caller.
pub fn convert_rate_to_amount(
    rate: f64,
    unit: MeasurementUnit,
    rate_basis: RateBasis,
    acres: f64,
    total_carrier_volume: f64,
) -> f64 {
    if rate <= 0.0 {
        return 0.0;
    }

    let scale = match rate_basis {
        RateBasis::PerAcre => acres,
        RateBasis::Per100GalCarrier => total_carrier_volume / 100.0,
    };

    if scale <= 0.0 {
        return 0.0;
    }

    rate * unit.to_base_factor() * scale
}

/// Recompute the derived total amount for one mix product
pub fn recalculate_total_amount(
    product: &TankMixProduct,
    acres: f64,
    total_carrier_volume: f64,
) -> f64 {
    convert_rate_to_amount(
        product.rate,
        product.product.measurement_unit,
        product.rate_basis,
        acres,
        total_carrier_volume,
    )
}

/// Recompute derived totals for every product in the mix.
///
/// Totals are always recomputed from current inputs, never patched in
/// place, so displayed amounts cannot drift from true values.
pub fn recalculate_mix(
    products: &[TankMixProduct],
    acres: f64,
    total_carrier_volume: f64,
) -> Vec<TankMixProduct> {
    products
        .iter()
        .map(|p| {
            let mut updated = p.clone();
            updated.total_amount = recalculate_total_amount(p, acres, total_carrier_volume);
            updated
        })
        .collect()
}
