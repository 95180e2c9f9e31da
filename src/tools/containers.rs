//! Container Breakdown Tool
//!
//! Packs a product amount into containers from a caller-supplied catalog.

use serde::Serialize;

use crate::mix::{format_container_breakdown, ContainerPacker};
use crate::models::{ContainerBreakdown, ContainerType, ProductType};

/// Response for container_breakdown
#[derive(Debug, Serialize)]
pub struct ContainerBreakdownResponse {
    pub breakdown: ContainerBreakdown,
    /// Single shopping line, e.g. "3x 2.5 gal Jug + 1 gal 38 oz"
    pub display: String,
}

/// Pack `total_amount` (gallons or pounds, per the product type) into whole
/// containers from the catalog.
///
/// A negative amount is rejected; a zero amount and an empty candidate set
/// are both valid results (all-manual measurement), not errors.
pub fn container_breakdown(
    catalog: Vec<ContainerType>,
    total_amount: f64,
    product_type: &str,
    preferred_container_ids: Vec<String>,
) -> Result<ContainerBreakdownResponse, String> {
    if total_amount < 0.0 {
        return Err("total_amount cannot be negative".to_string());
    }

    let product_type = ProductType::from_str(product_type);
    let packer = ContainerPacker::new(catalog);

    let preferred = if preferred_container_ids.is_empty() {
        None
    } else {
        Some(preferred_container_ids.as_slice())
    };

    let breakdown = packer.calculate_optimal_breakdown(total_amount, product_type, preferred);
    let display = format_container_breakdown(&breakdown);

    Ok(ContainerBreakdownResponse { breakdown, display })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jug_catalog() -> Vec<ContainerType> {
        vec![
            ContainerType {
                id: "liquid-2.5gal".to_string(),
                name: "2.5 gal Jug".to_string(),
                size: 2.5,
                unit: "gal".to_string(),
                product_type: ProductType::Liquid,
                available: true,
            },
            ContainerType {
                id: "liquid-1gal".to_string(),
                name: "1 gal Jug".to_string(),
                size: 1.0,
                unit: "gal".to_string(),
                product_type: ProductType::Liquid,
                available: true,
            },
        ]
    }

    #[test]
    fn test_breakdown_with_display_line() {
        let response = container_breakdown(
            jug_catalog(),
            6.3,
            "liquid",
            vec!["liquid-2.5gal".to_string()],
        )
        .unwrap();

        assert_eq!(response.breakdown.containers[0].quantity, 2);
        assert_eq!(response.display, "2x 2.5 gal Jug + 1 gal 38 oz");
    }

    #[test]
    fn test_breakdown_zero_amount() {
        let response = container_breakdown(jug_catalog(), 0.0, "liquid", Vec::new()).unwrap();
        assert!(response.breakdown.containers.is_empty());
        assert_eq!(response.display, "No containers needed");
    }

    #[test]
    fn test_breakdown_rejects_negative_amount() {
        assert!(container_breakdown(jug_catalog(), -1.0, "liquid", Vec::new()).is_err());
    }

    #[test]
    fn test_breakdown_granular_alias() {
        // "granular" is a legacy alias for dry; no liquid container matches
        let response = container_breakdown(jug_catalog(), 10.0, "granular", Vec::new()).unwrap();
        assert!(response.breakdown.containers.is_empty());
        assert!((response.breakdown.remainder.amount - 10.0).abs() < 1e-9);
    }
}
