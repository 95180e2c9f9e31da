//! Container models
//!
//! Catalog container types and the breakdown of a product amount into
//! whole containers plus a measured remainder.

use serde::{Deserialize, Serialize};

use super::ProductType;

/// A purchasable container size from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerType {
    pub id: String,
    pub name: String,
    /// Capacity in base units (gallons or pounds), > 0
    pub size: f64,
    /// Display label for the container's unit
    pub unit: String,
    pub product_type: ProductType,
    /// Whether this container can currently be purchased
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// A quantity of one container type within a breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerQuantity {
    pub container: ContainerType,
    /// Number of containers, >= 1
    pub quantity: u32,
    /// quantity x container size
    pub total_amount: f64,
}

/// The portion of an amount that does not fill a whole container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Remainder {
    /// Amount in base units
    pub amount: f64,
    /// Base unit label ("gal" or "lbs")
    pub unit: String,
    /// Human-readable measurement, e.g. "1 gal 38 oz"
    pub display_text: String,
}

impl Remainder {
    /// An empty remainder in the given base unit
    pub fn zero(unit: &str) -> Self {
        Self {
            amount: 0.0,
            unit: unit.to_string(),
            display_text: String::new(),
        }
    }
}

/// Decomposition of a total product amount into containers plus remainder.
///
/// Invariant: sum of container total amounts plus the remainder equals
/// `total_amount` within floating tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerBreakdown {
    pub containers: Vec<ContainerQuantity>,
    pub remainder: Remainder,
    /// The input amount this breakdown covers
    pub total_amount: f64,
}

impl ContainerBreakdown {
    /// Breakdown with no containers and no remainder
    pub fn empty(total_amount: f64, unit: &str) -> Self {
        Self {
            containers: Vec::new(),
            remainder: Remainder::zero(unit),
            total_amount,
        }
    }
}
