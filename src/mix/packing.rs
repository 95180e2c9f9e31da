//! Container packing
//!
//! Packs an absolute product amount into the fewest/largest available
//! containers and formats the remainder in the next-smaller natural unit.

use std::cmp::Ordering;

use crate::mix::units::{FL_OZ_PER_GALLON, OZ_PER_POUND, UnitCategory};
use crate::models::{
    ContainerBreakdown, ContainerQuantity, ContainerType, ProductType, Remainder,
};

/// Amounts below this are treated as fully packed
pub const REMAINDER_TOLERANCE: f64 = 0.001;

/// Container size at or above which a breakdown is treated as bulk (tote
/// class) for remainder formatting
pub const BULK_CONTAINER_SIZE: f64 = 250.0;

/// Greedy largest-first packer over a container catalog.
///
/// Largest-first is an approximation of the minimal container count, not a
/// provably optimal packing across arbitrary size sets. The policy lives
/// behind this type so an exact packer could replace it without touching
/// callers.
pub struct ContainerPacker {
    catalog: Vec<ContainerType>,
}

impl ContainerPacker {
    /// Create a packer over the current container catalog
    pub fn new(catalog: Vec<ContainerType>) -> Self {
        Self { catalog }
    }

    /// Pack `total_amount` of a product into whole containers.
    ///
    /// Candidates are the available catalog containers matching the
    /// product's unit category; a non-empty `preferred_ids` list restricts
    /// them further (an allow-list: once a product has assigned containers,
    /// unassigned ones are never auto-selected). A non-positive amount or
    /// an empty candidate set yields no containers; any unpacked amount
    /// becomes the remainder, which for an empty candidate set is the whole
    /// input (a valid all-manual-measurement result, not an error).
    pub fn calculate_optimal_breakdown(
        &self,
        total_amount: f64,
        product_type: ProductType,
        preferred_ids: Option<&[String]>,
    ) -> ContainerBreakdown {
        let unit = match product_type.category() {
            UnitCategory::Liquid => "gal",
            UnitCategory::Dry => "lbs",
        };

        if total_amount <= 0.0 {
            return ContainerBreakdown::empty(total_amount, unit);
        }

        let mut candidates: Vec<&ContainerType> = self
            .catalog
            .iter()
            .filter(|c| c.available && c.size > 0.0)
            .filter(|c| c.product_type.category() == product_type.category())
            .filter(|c| match preferred_ids {
                Some(ids) if !ids.is_empty() => ids.contains(&c.id),
                _ => true,
            })
            .collect();

        candidates.sort_by(|a, b| b.size.partial_cmp(&a.size).unwrap_or(Ordering::Equal));

        let mut remaining = total_amount;
        let mut containers = Vec::new();

        for candidate in candidates {
            if remaining <= REMAINDER_TOLERANCE {
                break;
            }
            let quantity = (remaining / candidate.size).floor() as u32;
            if quantity > 0 {
                let packed = quantity as f64 * candidate.size;
                containers.push(ContainerQuantity {
                    container: candidate.clone(),
                    quantity,
                    total_amount: packed,
                });
                remaining -= packed;
            }
        }

        let bulk = containers
            .iter()
            .any(|q| q.container.size >= BULK_CONTAINER_SIZE);

        let remainder = if remaining > REMAINDER_TOLERANCE {
            Remainder {
                amount: remaining,
                unit: unit.to_string(),
                display_text: format_remainder(remaining, product_type, bulk),
            }
        } else {
            Remainder::zero(unit)
        };

        ContainerBreakdown {
            containers,
            remainder,
            total_amount,
        }
    }
}

/// Format a remainder amount in whole base units plus the next-smaller
/// natural unit.
///
/// `bulk` switches liquid formatting to tenths of a gallon (tote-class
/// measuring). The bulk flag is derived from the containers chosen by the
/// packer, which couples formatting to container choice; the behavior is
/// kept as-is for compatibility.
pub fn format_remainder(amount: f64, product_type: ProductType, bulk: bool) -> String {
    match product_type.category() {
        UnitCategory::Liquid if bulk => {
            if amount >= 0.1 {
                format!(
                    "{:.1} gal ({:.0} oz)",
                    amount,
                    (amount * FL_OZ_PER_GALLON).round()
                )
            } else {
                format!("{:.0} oz", (amount * FL_OZ_PER_GALLON).round())
            }
        }
        UnitCategory::Liquid => {
            let whole = amount.floor();
            let ounces = ((amount - whole) * FL_OZ_PER_GALLON).round();
            format_whole_and_partial(whole as u64, ounces as u64, "gal")
        }
        UnitCategory::Dry => {
            let whole = amount.floor();
            let ounces = ((amount - whole) * OZ_PER_POUND).round();
            format_whole_and_partial(whole as u64, ounces as u64, "lbs")
        }
    }
}

fn format_whole_and_partial(whole: u64, ounces: u64, whole_unit: &str) -> String {
    if whole > 0 && ounces > 0 {
        format!("{} {} {} oz", whole, whole_unit, ounces)
    } else if whole > 0 {
        format!("{} {}", whole, whole_unit)
    } else {
        format!("{} oz", ounces)
    }
}

/// Render a breakdown as a single shopping line, e.g.
/// `"3x 2.5 gal Jug + 1 gal 38 oz"`.
pub fn format_container_breakdown(breakdown: &ContainerBreakdown) -> String {
    let mut parts: Vec<String> = breakdown
        .containers
        .iter()
        .map(|q| format!("{}x {}", q.quantity, q.container.name))
        .collect();

    if breakdown.remainder.amount > REMAINDER_TOLERANCE {
        parts.push(format!("+ {}", breakdown.remainder.display_text));
    }

    if parts.is_empty() {
        "No containers needed".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, name: &str, size: f64, product_type: ProductType) -> ContainerType {
        ContainerType {
            id: id.to_string(),
            name: name.to_string(),
            size,
            unit: match product_type.category() {
                UnitCategory::Liquid => "gal".to_string(),
                UnitCategory::Dry => "lbs".to_string(),
            },
            product_type,
            available: true,
        }
    }

    fn liquid_catalog() -> Vec<ContainerType> {
        vec![
            container("liquid-2.5gal", "2.5 gal Jug", 2.5, ProductType::Liquid),
            container("liquid-1gal", "1 gal Jug", 1.0, ProductType::Liquid),
            container("liquid-tote", "275 gal Tote", 275.0, ProductType::Liquid),
        ]
    }

    #[test]
    fn test_exact_multiple_has_no_remainder() {
        let packer = ContainerPacker::new(liquid_catalog());
        let preferred = vec!["liquid-2.5gal".to_string()];
        let breakdown =
            packer.calculate_optimal_breakdown(7.5, ProductType::Liquid, Some(&preferred));

        assert_eq!(breakdown.containers.len(), 1);
        assert_eq!(breakdown.containers[0].quantity, 3);
        assert_eq!(breakdown.containers[0].total_amount, 7.5);
        assert!(breakdown.remainder.amount < REMAINDER_TOLERANCE);
    }

    #[test]
    fn test_remainder_formatting_gal_and_oz() {
        let packer = ContainerPacker::new(liquid_catalog());
        let preferred = vec!["liquid-2.5gal".to_string()];
        let breakdown =
            packer.calculate_optimal_breakdown(6.3, ProductType::Liquid, Some(&preferred));

        assert_eq!(breakdown.containers[0].quantity, 2);
        assert!((breakdown.remainder.amount - 1.3).abs() < 1e-9);
        // 0.3 gal * 128 = 38.4 -> 38 oz
        assert_eq!(breakdown.remainder.display_text, "1 gal 38 oz");
    }

    #[test]
    fn test_packing_conservation() {
        let packer = ContainerPacker::new(liquid_catalog());
        for amount in [6.3, 7.5, 0.7, 12.25, 300.0] {
            let breakdown = packer.calculate_optimal_breakdown(amount, ProductType::Liquid, None);
            let packed: f64 = breakdown.containers.iter().map(|q| q.total_amount).sum();
            assert!((packed + breakdown.remainder.amount - amount).abs() < REMAINDER_TOLERANCE);
        }
    }

    #[test]
    fn test_greedy_prefers_largest() {
        let packer = ContainerPacker::new(liquid_catalog());
        let breakdown = packer.calculate_optimal_breakdown(6.0, ProductType::Liquid, None);

        // 2x 2.5 gal, then 1x 1 gal
        assert_eq!(breakdown.containers[0].container.id, "liquid-2.5gal");
        assert_eq!(breakdown.containers[0].quantity, 2);
        assert_eq!(breakdown.containers[1].container.id, "liquid-1gal");
        assert_eq!(breakdown.containers[1].quantity, 1);
        assert!(breakdown.remainder.amount < REMAINDER_TOLERANCE);
    }

    #[test]
    fn test_preferred_ids_are_an_allow_list() {
        let packer = ContainerPacker::new(liquid_catalog());
        let preferred = vec!["liquid-1gal".to_string()];
        let breakdown =
            packer.calculate_optimal_breakdown(6.0, ProductType::Liquid, Some(&preferred));

        assert_eq!(breakdown.containers.len(), 1);
        assert_eq!(breakdown.containers[0].container.id, "liquid-1gal");
        assert_eq!(breakdown.containers[0].quantity, 6);
    }

    #[test]
    fn test_empty_preferred_list_means_no_restriction() {
        let packer = ContainerPacker::new(liquid_catalog());
        let breakdown = packer.calculate_optimal_breakdown(2.5, ProductType::Liquid, Some(&[]));
        assert!(!breakdown.containers.is_empty());
    }

    #[test]
    fn test_unavailable_containers_are_skipped() {
        let mut catalog = liquid_catalog();
        for c in &mut catalog {
            if c.id == "liquid-2.5gal" {
                c.available = false;
            }
        }
        let packer = ContainerPacker::new(catalog);
        let breakdown = packer.calculate_optimal_breakdown(5.0, ProductType::Liquid, None);
        assert!(breakdown
            .containers
            .iter()
            .all(|q| q.container.id != "liquid-2.5gal"));
    }

    #[test]
    fn test_no_matching_containers_yields_all_remainder() {
        let packer = ContainerPacker::new(vec![container(
            "dry-50lb",
            "50 lb Bag",
            50.0,
            ProductType::Dry,
        )]);
        let breakdown = packer.calculate_optimal_breakdown(6.3, ProductType::Liquid, None);

        assert!(breakdown.containers.is_empty());
        assert!((breakdown.remainder.amount - 6.3).abs() < 1e-9);
        assert_eq!(breakdown.remainder.display_text, "6 gal 38 oz");
    }

    #[test]
    fn test_zero_amount_yields_empty_breakdown() {
        let packer = ContainerPacker::new(liquid_catalog());
        let breakdown = packer.calculate_optimal_breakdown(0.0, ProductType::Liquid, None);
        assert!(breakdown.containers.is_empty());
        assert_eq!(breakdown.remainder.amount, 0.0);
    }

    #[test]
    fn test_bulk_remainder_formatting() {
        let packer = ContainerPacker::new(liquid_catalog());
        // 1x 275 gal tote + 12x 2.5 gal jugs leaves 0.75 gal, displayed
        // tote-style in tenths of a gallon
        let breakdown = packer.calculate_optimal_breakdown(305.75, ProductType::Liquid, None);
        assert!(breakdown
            .containers
            .iter()
            .any(|q| q.container.size >= BULK_CONTAINER_SIZE));
        assert_eq!(breakdown.remainder.display_text, "0.8 gal (96 oz)");
    }

    #[test]
    fn test_dry_remainder_formatting() {
        let packer = ContainerPacker::new(vec![container(
            "dry-50lb",
            "50 lb Bag",
            50.0,
            ProductType::Dry,
        )]);
        let breakdown = packer.calculate_optimal_breakdown(120.5, ProductType::Dry, None);

        assert_eq!(breakdown.containers[0].quantity, 2);
        // 20.5 lbs remainder: 20 lbs 8 oz
        assert_eq!(breakdown.remainder.display_text, "20 lbs 8 oz");
    }

    #[test]
    fn test_bulk_product_packs_liquid_containers() {
        let packer = ContainerPacker::new(liquid_catalog());
        let breakdown = packer.calculate_optimal_breakdown(275.0, ProductType::Bulk, None);
        assert_eq!(breakdown.containers[0].container.id, "liquid-tote");
        assert_eq!(breakdown.containers[0].quantity, 1);
    }

    #[test]
    fn test_format_remainder_whole_only() {
        assert_eq!(format_remainder(2.0, ProductType::Liquid, false), "2 gal");
        assert_eq!(format_remainder(3.0, ProductType::Dry, false), "3 lbs");
    }

    #[test]
    fn test_format_remainder_partial_only() {
        // 0.5 gal = 64 oz
        assert_eq!(format_remainder(0.5, ProductType::Liquid, false), "64 oz");
        // 0.25 lbs = 4 oz
        assert_eq!(format_remainder(0.25, ProductType::Dry, false), "4 oz");
    }

    #[test]
    fn test_format_remainder_bulk_small_amount() {
        assert_eq!(format_remainder(0.05, ProductType::Liquid, true), "6 oz");
    }

    #[test]
    fn test_format_container_breakdown() {
        let packer = ContainerPacker::new(liquid_catalog());
        let preferred = vec!["liquid-2.5gal".to_string()];
        let breakdown =
            packer.calculate_optimal_breakdown(6.3, ProductType::Liquid, Some(&preferred));
        assert_eq!(
            format_container_breakdown(&breakdown),
            "2x 2.5 gal Jug + 1 gal 38 oz"
        );
    }

    #[test]
    fn test_format_empty_breakdown() {
        let breakdown = ContainerBreakdown::empty(0.0, "gal");
        assert_eq!(format_container_breakdown(&breakdown), "No containers needed");
    }
}
