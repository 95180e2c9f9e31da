//! Load model
//!
//! One tank-full (or partial) trip of spray mixture.

use serde::{Deserialize, Serialize};

/// Per-load amount of a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProductAmount {
    pub product_id: String,
    pub product_name: String,
    /// Amount for this load in base units, rounded to hundredths
    pub amount: f64,
    /// Display label for the base unit ("gal" or "lbs")
    pub display_unit: String,
}

/// A single tank load.
///
/// `load_number` is positional (1-based, contiguous), not a stored identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Load {
    pub load_number: usize,
    /// Volume in gallons, 0 <= volume <= tank size
    pub volume: f64,
    /// Share of tank capacity, 0-100
    pub percentage: f64,
    pub products: Vec<LoadProductAmount>,
}
