//! Load Splitting Tools
//!
//! Direct exposure of the even split and redistribution algorithms.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::mix::{
    calculate_even_split, min_loads, redistribute_load_volumes, MixWarning, VOLUME_TOLERANCE,
};

/// Response for calculate_even_split
#[derive(Debug, Serialize)]
pub struct EvenSplitResponse {
    pub volumes: Vec<f64>,
    pub total: f64,
    pub min_loads: usize,
    /// False when the load count is below the required minimum and the
    /// capped loads cannot carry the full volume
    pub conserves_total: bool,
}

/// Split a total volume evenly across loads
pub fn even_split(
    total_volume: f64,
    number_of_loads: usize,
    tank_size: f64,
) -> Result<EvenSplitResponse, String> {
    if number_of_loads == 0 {
        return Err("number_of_loads must be at least 1".to_string());
    }

    let min = min_loads(total_volume, tank_size)
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    let volumes = calculate_even_split(total_volume, number_of_loads, tank_size)
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    if number_of_loads < min {
        tracing::warn!(
            "Even split of {} gal over {} loads is below the {} load minimum",
            total_volume,
            number_of_loads,
            min
        );
    }

    let total: f64 = volumes.iter().sum();
    let conserves_total =
        (total - total_volume).abs() <= VOLUME_TOLERANCE * number_of_loads as f64;

    Ok(EvenSplitResponse {
        volumes,
        total,
        min_loads: min,
        conserves_total,
    })
}

/// Response for redistribute_loads
#[derive(Debug, Serialize)]
pub struct RedistributeResponse {
    pub volumes: Vec<f64>,
    pub total: f64,
    pub locked_loads: Vec<usize>,
    pub warning: Option<MixWarning>,
}

/// Manually set one load's volume and redistribute the slack.
///
/// The changed load joins the locked set; the warning reports any
/// over-constrained shortfall.
pub fn redistribute(
    volumes: Vec<f64>,
    changed_index: usize,
    new_volume: f64,
    total_volume: f64,
    tank_size: f64,
    locked_loads: Vec<usize>,
) -> Result<RedistributeResponse, String> {
    if volumes.is_empty() {
        return Err("volumes cannot be empty".to_string());
    }
    if changed_index >= volumes.len() {
        return Err(format!(
            "changed_index {} out of range for {} loads",
            changed_index,
            volumes.len()
        ));
    }

    let mut locked: BTreeSet<usize> = locked_loads.into_iter().collect();
    // Manually setting a volume locks that load
    locked.insert(changed_index);

    let outcome = redistribute_load_volumes(
        &volumes,
        changed_index,
        new_volume,
        total_volume,
        tank_size,
        &locked,
    );

    let total: f64 = outcome.volumes.iter().sum();

    Ok(RedistributeResponse {
        volumes: outcome.volumes,
        total,
        locked_loads: locked.into_iter().collect(),
        warning: outcome.warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split_tool() {
        let response = even_split(900.0, 3, 300.0).unwrap();
        assert_eq!(response.volumes, vec![300.0, 300.0, 300.0]);
        assert!(response.conserves_total);
        assert_eq!(response.min_loads, 3);
    }

    #[test]
    fn test_even_split_flags_degenerate_count() {
        let response = even_split(1000.0, 3, 300.0).unwrap();
        assert_eq!(response.volumes, vec![300.0, 300.0, 300.0]);
        assert!(!response.conserves_total);
        assert_eq!(response.min_loads, 4);
    }

    #[test]
    fn test_even_split_rejects_zero_loads() {
        assert!(even_split(900.0, 0, 300.0).is_err());
    }

    #[test]
    fn test_even_split_rejects_zero_tank() {
        assert!(even_split(900.0, 3, 0.0).is_err());
    }

    #[test]
    fn test_redistribute_tool_locks_changed_index() {
        let response = redistribute(
            vec![300.0, 250.0, 250.0],
            0,
            200.0,
            800.0,
            300.0,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(response.volumes, vec![200.0, 300.0, 300.0]);
        assert!(response.locked_loads.contains(&0));
        assert!(response.warning.is_none());
    }

    #[test]
    fn test_redistribute_tool_reports_shortfall() {
        let response = redistribute(
            vec![300.0, 300.0, 300.0],
            0,
            200.0,
            900.0,
            300.0,
            Vec::new(),
        )
        .unwrap();
        assert!(response.warning.is_some());
        assert!((response.total - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_redistribute_rejects_bad_index() {
        assert!(redistribute(vec![300.0], 3, 100.0, 300.0, 300.0, Vec::new()).is_err());
        assert!(redistribute(Vec::new(), 0, 100.0, 300.0, 300.0, Vec::new()).is_err());
    }
}
