//! Tank Mix Planning Tool
//!
//! Builds a full load plan for a mix configuration: total volume,
//! per-product totals, load volumes, and per-load product amounts.

use serde::Serialize;

use crate::mix::units::round2;
use crate::mix::{recalculate_mix, LoadPlan, MixWarning};
use crate::models::{Load, TankMixProduct};

/// Derived totals for one mix product
#[derive(Debug, Serialize)]
pub struct ProductTotal {
    pub product_id: String,
    pub product_name: String,
    pub rate: f64,
    pub rate_basis: String,
    pub total_amount: f64,
    pub display_unit: String,
}

impl From<&TankMixProduct> for ProductTotal {
    fn from(p: &TankMixProduct) -> Self {
        Self {
            product_id: p.product.id.clone(),
            product_name: p.product.name.clone(),
            rate: p.rate,
            rate_basis: p.rate_basis.as_str().to_string(),
            total_amount: round2(p.total_amount),
            display_unit: p.product.measurement_unit.base_display_unit().to_string(),
        }
    }
}

/// Response for plan_tank_mix
#[derive(Debug, Serialize)]
pub struct PlanTankMixResponse {
    pub total_volume: f64,
    pub tank_size: f64,
    pub carrier_rate: f64,
    pub acres: f64,
    pub min_loads: usize,
    pub number_of_loads: usize,
    pub full_loads: usize,
    pub partial_loads: usize,
    pub warning: Option<MixWarning>,
    pub products: Vec<ProductTotal>,
    pub loads: Vec<Load>,
}

/// Plan a tank mix.
///
/// Total volume is acres x carrier rate; product totals are recomputed from
/// their rates (never taken from the input), and the volume is split over
/// at least the minimum number of loads.
pub fn plan_tank_mix(
    tank_size: f64,
    carrier_rate: f64,
    acres: f64,
    requested_loads: Option<usize>,
    products: Vec<TankMixProduct>,
) -> Result<PlanTankMixResponse, String> {
    if tank_size <= 0.0 {
        return Err("tank_size must be greater than 0".to_string());
    }
    if carrier_rate <= 0.0 {
        return Err("carrier_rate must be greater than 0".to_string());
    }
    if acres <= 0.0 {
        return Err("acres must be greater than 0".to_string());
    }

    let total_volume = round2(acres * carrier_rate);

    // Totals are derived; stale input values are overwritten
    let products = recalculate_mix(&products, acres, total_volume);

    let plan = match requested_loads {
        Some(n) => LoadPlan::with_loads(total_volume, tank_size, n),
        None => LoadPlan::new(total_volume, tank_size),
    }
    .map_err(|e| format!("Failed to plan loads: {}", e))?;

    let loads = plan.loads(&products);

    Ok(PlanTankMixResponse {
        total_volume,
        tank_size,
        carrier_rate,
        acres,
        min_loads: plan.min_loads_required(),
        number_of_loads: plan.number_of_loads(),
        full_loads: plan.full_loads(),
        partial_loads: plan.partial_loads(),
        warning: plan.warning(),
        products: products.iter().map(ProductTotal::from).collect(),
        loads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::units::{MeasurementUnit, RateBasis};
    use crate::models::{Product, ProductType};

    fn herbicide() -> TankMixProduct {
        TankMixProduct::new(
            Product {
                id: "herb-1".to_string(),
                name: "Broadleaf Herbicide".to_string(),
                product_type: ProductType::Liquid,
                default_rate: 32.0,
                measurement_unit: MeasurementUnit::FluidOunce,
                rate_basis: RateBasis::PerAcre,
                preferred_container_ids: Vec::new(),
                package_size: None,
            },
            32.0,
            RateBasis::PerAcre,
        )
    }

    #[test]
    fn test_plan_basic_mix() {
        // 160 acres at 10 gal/acre in a 500 gal tank
        let response =
            plan_tank_mix(500.0, 10.0, 160.0, None, vec![herbicide()]).unwrap();

        assert_eq!(response.total_volume, 1600.0);
        assert_eq!(response.min_loads, 4);
        assert_eq!(response.number_of_loads, 4);
        assert_eq!(response.loads.len(), 4);
        assert_eq!(response.loads[0].volume, 400.0);

        // 32 fl oz/acre over 160 acres = 40 gal total
        assert!((response.products[0].total_amount - 40.0).abs() < 1e-9);
        // Split evenly: 10 gal per load
        assert!((response.loads[0].products[0].amount - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_extra_loads() {
        let response =
            plan_tank_mix(500.0, 10.0, 160.0, Some(5), vec![herbicide()]).unwrap();
        assert_eq!(response.number_of_loads, 5);
        assert_eq!(response.loads[0].volume, 320.0);
    }

    #[test]
    fn test_plan_requested_below_minimum_is_raised() {
        let response =
            plan_tank_mix(500.0, 10.0, 160.0, Some(2), vec![herbicide()]).unwrap();
        assert_eq!(response.number_of_loads, 4);
    }

    #[test]
    fn test_plan_rejects_non_positive_inputs() {
        assert!(plan_tank_mix(0.0, 10.0, 160.0, None, vec![]).is_err());
        assert!(plan_tank_mix(500.0, 0.0, 160.0, None, vec![]).is_err());
        assert!(plan_tank_mix(500.0, 10.0, 0.0, None, vec![]).is_err());
    }

    #[test]
    fn test_plan_ignores_stale_totals() {
        let mut p = herbicide();
        p.total_amount = 12345.0;
        let response = plan_tank_mix(500.0, 10.0, 160.0, None, vec![p]).unwrap();
        assert!((response.products[0].total_amount - 40.0).abs() < 1e-9);
    }
}
