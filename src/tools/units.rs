//! Unit Conversion Tools
//!
//! Rate-to-amount conversion and legacy rate label parsing.

use serde::Serialize;

use crate::mix::units::{parse_legacy_rate_unit, round2, MeasurementUnit, RateBasis};
use crate::mix::convert_rate_to_amount;

/// Response for convert_rate
#[derive(Debug, Serialize)]
pub struct ConvertRateResponse {
    pub rate: f64,
    pub unit: String,
    pub rate_basis: String,
    pub acres: f64,
    pub total_carrier_volume: f64,
    /// Absolute amount in the unit's base (gallons or pounds)
    pub total_amount: f64,
    pub display_unit: String,
}

/// Convert an application rate into an absolute amount
pub fn convert_rate(
    rate: f64,
    unit: &str,
    rate_basis: &str,
    acres: f64,
    total_carrier_volume: f64,
) -> Result<ConvertRateResponse, String> {
    if rate < 0.0 {
        return Err("rate cannot be negative".to_string());
    }
    if acres < 0.0 {
        return Err("acres cannot be negative".to_string());
    }
    if total_carrier_volume < 0.0 {
        return Err("total_carrier_volume cannot be negative".to_string());
    }

    let unit = MeasurementUnit::from_label(unit);
    let basis = RateBasis::from_str(rate_basis);

    let total_amount = round2(convert_rate_to_amount(
        rate,
        unit,
        basis,
        acres,
        total_carrier_volume,
    ));

    Ok(ConvertRateResponse {
        rate,
        unit: unit.as_str().to_string(),
        rate_basis: basis.as_str().to_string(),
        acres,
        total_carrier_volume,
        total_amount,
        display_unit: unit.base_display_unit().to_string(),
    })
}

/// Response for parse_legacy_unit
#[derive(Debug, Serialize)]
pub struct ParseLegacyUnitResponse {
    pub label: String,
    pub unit: String,
    pub rate_basis: String,
    pub category: String,
    pub to_base_factor: f64,
}

/// Map a legacy free-text rate label to a structured unit/basis pair
pub fn parse_legacy_unit(label: &str) -> Result<ParseLegacyUnitResponse, String> {
    if label.trim().is_empty() {
        return Err("label cannot be empty".to_string());
    }

    let (unit, basis) = parse_legacy_rate_unit(label);

    Ok(ParseLegacyUnitResponse {
        label: label.to_string(),
        unit: unit.as_str().to_string(),
        rate_basis: basis.as_str().to_string(),
        category: match unit.category() {
            crate::mix::UnitCategory::Liquid => "liquid".to_string(),
            crate::mix::UnitCategory::Dry => "dry".to_string(),
        },
        to_base_factor: unit.to_base_factor(),
    })
}
