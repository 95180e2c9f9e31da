//! Tank mix product model
//!
//! A product bound into the current mix with its live rate and the derived
//! total amount.

use serde::{Deserialize, Serialize};

use super::Product;
use crate::mix::units::RateBasis;

/// A product added to the current tank mix.
///
/// `total_amount` is derived from rate, acreage, and carrier volume through
/// the rate converter; it is never edited directly. Recompute it on any
/// upstream change rather than patching it incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankMixProduct {
    pub product: Product,
    pub rate: f64,
    pub rate_basis: RateBasis,
    /// Absolute amount in base units (gallons or pounds), derived
    #[serde(default)]
    pub total_amount: f64,
}

impl TankMixProduct {
    /// Bind a product into the mix at the given rate.
    ///
    /// The total amount starts at zero; the rate converter fills it in once
    /// acreage and carrier volume are known.
    pub fn new(product: Product, rate: f64, rate_basis: RateBasis) -> Self {
        Self {
            product,
            rate,
            rate_basis,
            total_amount: 0.0,
        }
    }

    /// Bind a product using its catalog default rate and basis
    pub fn with_default_rate(product: Product) -> Self {
        let rate = product.default_rate;
        let basis = product.rate_basis;
        Self::new(product, rate, basis)
    }
}
