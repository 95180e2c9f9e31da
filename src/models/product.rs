//! Product model
//!
//! Reference data describing a chemical product and its default
//! application rate.

use serde::{Deserialize, Serialize};

use crate::mix::units::{MeasurementUnit, RateBasis, UnitCategory};

/// Physical form of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Liquid,
    Dry,
    /// Tote or tanker quantities; measured as a liquid
    Bulk,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Liquid => "liquid",
            ProductType::Dry => "dry",
            ProductType::Bulk => "bulk",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dry" | "granular" => ProductType::Dry,
            "bulk" => ProductType::Bulk,
            _ => ProductType::Liquid,
        }
    }

    /// Unit category this product is measured in
    pub fn category(&self) -> UnitCategory {
        match self {
            ProductType::Liquid | ProductType::Bulk => UnitCategory::Liquid,
            ProductType::Dry => UnitCategory::Dry,
        }
    }
}

/// A chemical product from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub product_type: ProductType,
    pub default_rate: f64,
    pub measurement_unit: MeasurementUnit,
    pub rate_basis: RateBasis,
    /// Allow-list of container ids assigned to this product; empty means
    /// any matching container may be selected
    #[serde(default)]
    pub preferred_container_ids: Vec<String>,
    /// Purchasable package size, if the product ships in one fixed size
    pub package_size: Option<f64>,
}
