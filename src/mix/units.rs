//! Unit types and conversion constants
//!
//! Provides types for measurement units, rate bases, and the conversion
//! factors into base units (gallons for liquids, pounds for dry products).

use serde::{Deserialize, Serialize};

/// Category of a measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Volume units measured in gallons
    Liquid,
    /// Weight units measured in pounds
    Dry,
}

/// Measurement unit for a product application rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasurementUnit {
    FluidOunce,
    Pint,
    Quart,
    Gallon,
    Ounce,
    Pound,
}

/// Basis that scales a product rate into an absolute amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RateBasis {
    /// Rate is applied per acre
    #[default]
    #[serde(rename = "per-acre")]
    PerAcre,
    /// Rate is applied per 100 gallons of carrier volume
    #[serde(rename = "per-100-gal-carrier")]
    Per100GalCarrier,
}

// ============================================================================
// Liquid Conversion Constants (to gallons)
// ============================================================================

/// Gallons per fluid ounce
pub const GAL_PER_FL_OZ: f64 = 1.0 / 128.0;
/// Gallons per pint
pub const GAL_PER_PINT: f64 = 1.0 / 8.0;
/// Gallons per quart
pub const GAL_PER_QUART: f64 = 1.0 / 4.0;
/// Fluid ounces per gallon
pub const FL_OZ_PER_GALLON: f64 = 128.0;

// ============================================================================
// Dry Conversion Constants (to pounds)
// ============================================================================

/// Pounds per dry ounce
pub const LB_PER_OZ: f64 = 1.0 / 16.0;
/// Dry ounces per pound
pub const OZ_PER_POUND: f64 = 16.0;

impl MeasurementUnit {
    /// Conversion factor into the base unit (gallons or pounds)
    pub fn to_base_factor(&self) -> f64 {
        match self {
            MeasurementUnit::FluidOunce => GAL_PER_FL_OZ,
            MeasurementUnit::Pint => GAL_PER_PINT,
            MeasurementUnit::Quart => GAL_PER_QUART,
            MeasurementUnit::Gallon => 1.0,
            MeasurementUnit::Ounce => LB_PER_OZ,
            MeasurementUnit::Pound => 1.0,
        }
    }

    /// Category of this unit
    pub fn category(&self) -> UnitCategory {
        match self {
            MeasurementUnit::FluidOunce
            | MeasurementUnit::Pint
            | MeasurementUnit::Quart
            | MeasurementUnit::Gallon => UnitCategory::Liquid,
            MeasurementUnit::Ounce | MeasurementUnit::Pound => UnitCategory::Dry,
        }
    }

    /// Display label for the base unit this unit converts into
    pub fn base_display_unit(&self) -> &'static str {
        match self.category() {
            UnitCategory::Liquid => "gal",
            UnitCategory::Dry => "lbs",
        }
    }

    /// Canonical label for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::FluidOunce => "fluid-ounce",
            MeasurementUnit::Pint => "pint",
            MeasurementUnit::Quart => "quart",
            MeasurementUnit::Gallon => "gallon",
            MeasurementUnit::Ounce => "ounce",
            MeasurementUnit::Pound => "pound",
        }
    }

    /// Parse from a label
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "fluid-ounce" | "fluid ounce" | "fl oz" | "fl-oz" | "floz" => {
                Some(MeasurementUnit::FluidOunce)
            }
            "pint" | "pints" | "pt" => Some(MeasurementUnit::Pint),
            "quart" | "quarts" | "qt" => Some(MeasurementUnit::Quart),
            "gallon" | "gallons" | "gal" => Some(MeasurementUnit::Gallon),
            "ounce" | "ounces" | "oz" => Some(MeasurementUnit::Ounce),
            "pound" | "pounds" | "lb" | "lbs" => Some(MeasurementUnit::Pound),
            _ => None,
        }
    }

    /// Parse from a label, falling back to gallon for unknown input.
    ///
    /// The fallback (factor 1.0, liquid category) is a fail-closed default
    /// for unrecognized labels, not a correct conversion; it is logged so
    /// callers can spot bad catalog data.
    pub fn from_label(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            tracing::warn!("Unknown measurement unit '{}', defaulting to gallon", s);
            MeasurementUnit::Gallon
        })
    }
}

impl RateBasis {
    /// Canonical label for this basis
    pub fn as_str(&self) -> &'static str {
        match self {
            RateBasis::PerAcre => "per-acre",
            RateBasis::Per100GalCarrier => "per-100-gal-carrier",
        }
    }

    /// Parse from a label, defaulting unknown input to per-acre
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().trim() {
            "per-100-gal-carrier" | "per-100-gal" | "per 100 gal" | "100-gal" | "100gal" => {
                RateBasis::Per100GalCarrier
            }
            _ => RateBasis::PerAcre,
        }
    }
}

/// Round a computed volume or amount to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Legacy Unit Labels
// ============================================================================

/// Map a legacy free-text rate label (e.g. "oz/acre") to a structured
/// unit/basis pair.
///
/// Finite lookup, not a grammar: unrecognized labels fall back to
/// (gallon, per-acre) and are logged.
pub fn parse_legacy_rate_unit(label: &str) -> (MeasurementUnit, RateBasis) {
    let lower = label.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "oz/acre" | "oz/a" | "fl oz/acre" | "floz/acre" => {
            (MeasurementUnit::FluidOunce, RateBasis::PerAcre)
        }
        "pt/acre" | "pint/acre" | "pints/acre" => (MeasurementUnit::Pint, RateBasis::PerAcre),
        "qt/acre" | "quart/acre" | "quarts/acre" => (MeasurementUnit::Quart, RateBasis::PerAcre),
        "gal/acre" | "gallon/acre" | "gallons/acre" | "gpa" => {
            (MeasurementUnit::Gallon, RateBasis::PerAcre)
        }
        "dry oz/acre" | "oz dry/acre" => (MeasurementUnit::Ounce, RateBasis::PerAcre),
        "lb/acre" | "lbs/acre" | "pound/acre" | "pounds/acre" => {
            (MeasurementUnit::Pound, RateBasis::PerAcre)
        }
        "oz/100 gal" | "oz/100gal" | "fl oz/100 gal" => {
            (MeasurementUnit::FluidOunce, RateBasis::Per100GalCarrier)
        }
        "pt/100 gal" | "pt/100gal" => (MeasurementUnit::Pint, RateBasis::Per100GalCarrier),
        "qt/100 gal" | "qt/100gal" => (MeasurementUnit::Quart, RateBasis::Per100GalCarrier),
        "gal/100 gal" | "gal/100gal" => (MeasurementUnit::Gallon, RateBasis::Per100GalCarrier),
        "lb/100 gal" | "lbs/100 gal" | "lbs/100gal" => {
            (MeasurementUnit::Pound, RateBasis::Per100GalCarrier)
        }
        _ => {
            tracing::warn!(
                "Unknown legacy rate label '{}', defaulting to gal/acre",
                label
            );
            (MeasurementUnit::Gallon, RateBasis::PerAcre)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquid_factors() {
        assert_eq!(MeasurementUnit::FluidOunce.to_base_factor(), 1.0 / 128.0);
        assert_eq!(MeasurementUnit::Pint.to_base_factor(), 0.125);
        assert_eq!(MeasurementUnit::Quart.to_base_factor(), 0.25);
        assert_eq!(MeasurementUnit::Gallon.to_base_factor(), 1.0);
    }

    #[test]
    fn test_dry_factors() {
        assert_eq!(MeasurementUnit::Ounce.to_base_factor(), 1.0 / 16.0);
        assert_eq!(MeasurementUnit::Pound.to_base_factor(), 1.0);
    }

    #[test]
    fn test_categories() {
        assert_eq!(MeasurementUnit::FluidOunce.category(), UnitCategory::Liquid);
        assert_eq!(MeasurementUnit::Gallon.category(), UnitCategory::Liquid);
        assert_eq!(MeasurementUnit::Ounce.category(), UnitCategory::Dry);
        assert_eq!(MeasurementUnit::Pound.category(), UnitCategory::Dry);
    }

    #[test]
    fn test_base_display_unit() {
        assert_eq!(MeasurementUnit::Quart.base_display_unit(), "gal");
        assert_eq!(MeasurementUnit::Pound.base_display_unit(), "lbs");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            MeasurementUnit::from_str("fl oz"),
            Some(MeasurementUnit::FluidOunce)
        );
        assert_eq!(MeasurementUnit::from_str("qt"), Some(MeasurementUnit::Quart));
        assert_eq!(MeasurementUnit::from_str("lbs"), Some(MeasurementUnit::Pound));
        assert_eq!(MeasurementUnit::from_str("bushel"), None);
    }

    #[test]
    fn test_from_label_fallback() {
        // Unknown labels fail closed to gallon (factor 1, liquid)
        assert_eq!(MeasurementUnit::from_label("bushel"), MeasurementUnit::Gallon);
    }

    #[test]
    fn test_legacy_labels() {
        assert_eq!(
            parse_legacy_rate_unit("oz/acre"),
            (MeasurementUnit::FluidOunce, RateBasis::PerAcre)
        );
        assert_eq!(
            parse_legacy_rate_unit("qt/acre"),
            (MeasurementUnit::Quart, RateBasis::PerAcre)
        );
        assert_eq!(
            parse_legacy_rate_unit("lbs/acre"),
            (MeasurementUnit::Pound, RateBasis::PerAcre)
        );
        assert_eq!(
            parse_legacy_rate_unit("oz/100 gal"),
            (MeasurementUnit::FluidOunce, RateBasis::Per100GalCarrier)
        );
    }

    #[test]
    fn test_legacy_label_fallback() {
        assert_eq!(
            parse_legacy_rate_unit("handfuls/acre"),
            (MeasurementUnit::Gallon, RateBasis::PerAcre)
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(333.333333), 333.33);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(100.0), 100.0);
    }
}
