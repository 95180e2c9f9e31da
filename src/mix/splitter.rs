//! Load splitting
//!
//! Partitions a total spray volume into per-load volumes bounded by tank
//! capacity, in two modes: an even split and a custom split with lockable
//! loads and proportional redistribution of the slack.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mix::allocator::calculate_load_products;
use crate::mix::units::round2;
use crate::models::{Load, TankMixProduct};

/// Rounding tolerance per load for volume conservation checks
pub const VOLUME_TOLERANCE: f64 = 0.01;

/// A load at or above this percentage of tank capacity counts as full.
/// Design choice for reporting, not a hard tank boundary.
pub const FULL_LOAD_THRESHOLD: f64 = 90.0;

/// Engine error types
#[derive(Debug, Error)]
pub enum MixError {
    /// Splitting a positive volume is undefined without a positive tank size
    #[error("invalid configuration: tank size {tank_size} cannot hold total volume {total_volume}")]
    InvalidConfiguration { tank_size: f64, total_volume: f64 },
}

/// Non-fatal warning signals surfaced alongside engine results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MixWarning {
    /// Locked loads plus clamping made it impossible to preserve the total
    /// volume exactly. The discrepancy is reported, never silently patched.
    OverConstrainedRedistribution { difference: f64 },
}

/// How the total volume is divided across loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    #[default]
    Even,
    Custom,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Even => "even",
            SplitMode::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "custom" => SplitMode::Custom,
            _ => SplitMode::Even,
        }
    }
}

/// Result of a custom-mode redistribution
#[derive(Debug, Clone, Serialize)]
pub struct RedistributionOutcome {
    pub volumes: Vec<f64>,
    pub warning: Option<MixWarning>,
}

/// Minimum number of loads needed to carry `total_volume` in a tank of
/// `tank_size` gallons.
pub fn min_loads(total_volume: f64, tank_size: f64) -> Result<usize, MixError> {
    if total_volume <= 0.0 {
        return Ok(0);
    }
    if tank_size <= 0.0 {
        return Err(MixError::InvalidConfiguration {
            tank_size,
            total_volume,
        });
    }
    Ok((total_volume / tank_size).ceil() as usize)
}

/// Split `total_volume` evenly into `number_of_loads` loads, each capped at
/// `tank_size` and rounded to hundredths.
///
/// When `number_of_loads` is below the required minimum the capped loads
/// cannot sum to the total; that degenerate input is the caller's to
/// prevent by enforcing `number_of_loads >= min_loads`.
pub fn calculate_even_split(
    total_volume: f64,
    number_of_loads: usize,
    tank_size: f64,
) -> Result<Vec<f64>, MixError> {
    if number_of_loads == 0 {
        return Ok(Vec::new());
    }
    if total_volume <= 0.0 {
        return Ok(vec![0.0; number_of_loads]);
    }
    if tank_size <= 0.0 {
        return Err(MixError::InvalidConfiguration {
            tank_size,
            total_volume,
        });
    }

    let per_load = round2((total_volume / number_of_loads as f64).min(tank_size));
    Ok(vec![per_load; number_of_loads])
}

/// Redistribute load volumes after one load is manually set.
///
/// The changed load is pinned to the clamped new volume and the slack is
/// spread over the loads that are neither changed nor locked, in proportion
/// to their prior volumes (evenly when those are all zero). Every result is
/// clamped to `[0, tank_size]` and rounded to hundredths.
///
/// The total is preserved whenever possible. When locked loads and clamping
/// over-constrain the system the shortfall is reported through the outcome
/// warning; the volumes are left as computed.
pub fn redistribute_load_volumes(
    volumes: &[f64],
    changed_index: usize,
    new_volume: f64,
    total_volume: f64,
    tank_size: f64,
    locked: &BTreeSet<usize>,
) -> RedistributionOutcome {
    if changed_index >= volumes.len() {
        return RedistributionOutcome {
            volumes: volumes.to_vec(),
            warning: None,
        };
    }

    let cap = tank_size.max(0.0);
    let clamped = new_volume.clamp(0.0, cap);

    let mut result = volumes.to_vec();
    result[changed_index] = clamped;

    // Volumes pinned by earlier manual edits stay put
    let locked_sum: f64 = volumes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != changed_index && locked.contains(i))
        .map(|(_, v)| v)
        .sum();

    let remaining = total_volume - clamped - locked_sum;

    let adjustable: Vec<usize> = (0..volumes.len())
        .filter(|i| *i != changed_index && !locked.contains(i))
        .collect();

    if adjustable.is_empty() {
        let rounded: Vec<f64> = result.iter().map(|v| round2(*v)).collect();
        let warning = conservation_warning(&rounded, total_volume);
        return RedistributionOutcome {
            volumes: rounded,
            warning,
        };
    }

    let adjustable_sum: f64 = adjustable.iter().map(|i| volumes[*i]).sum();

    if adjustable_sum == 0.0 {
        // No prior shares to scale; spread the slack evenly
        let even = remaining / adjustable.len() as f64;
        for i in &adjustable {
            result[*i] = even.clamp(0.0, cap);
        }
    } else {
        for i in &adjustable {
            let share = volumes[*i] / adjustable_sum;
            result[*i] = (remaining * share).clamp(0.0, cap);
        }
    }

    let rounded: Vec<f64> = result.iter().map(|v| round2(*v)).collect();
    let warning = conservation_warning(&rounded, total_volume);

    RedistributionOutcome {
        volumes: rounded,
        warning,
    }
}

fn conservation_warning(volumes: &[f64], total_volume: f64) -> Option<MixWarning> {
    let sum: f64 = volumes.iter().sum();
    let difference = sum - total_volume;
    let tolerance = VOLUME_TOLERANCE * volumes.len().max(1) as f64;

    if difference.abs() > tolerance {
        Some(MixWarning::OverConstrainedRedistribution {
            difference: round2(difference),
        })
    } else {
        None
    }
}

/// Split state for one mix: number of loads, split mode, per-load volumes,
/// and which loads the user has pinned.
///
/// Changing the number of loads or the split mode clears the locks and
/// reseeds the volumes from a fresh even split.
#[derive(Debug, Clone, Serialize)]
pub struct LoadPlan {
    total_volume: f64,
    tank_size: f64,
    number_of_loads: usize,
    split_mode: SplitMode,
    load_volumes: Vec<f64>,
    locked_loads: BTreeSet<usize>,
    warning: Option<MixWarning>,
}

impl LoadPlan {
    /// Plan for `total_volume` gallons in a `tank_size` gallon tank, seeded
    /// with the minimum number of loads and an even split.
    pub fn new(total_volume: f64, tank_size: f64) -> Result<Self, MixError> {
        let loads = min_loads(total_volume, tank_size)?;
        let load_volumes = calculate_even_split(total_volume, loads, tank_size)?;

        Ok(Self {
            total_volume,
            tank_size,
            number_of_loads: loads,
            split_mode: SplitMode::Even,
            load_volumes,
            locked_loads: BTreeSet::new(),
            warning: None,
        })
    }

    /// Plan with an explicit load count; counts below the required minimum
    /// are raised to it.
    pub fn with_loads(
        total_volume: f64,
        tank_size: f64,
        requested_loads: usize,
    ) -> Result<Self, MixError> {
        let mut plan = Self::new(total_volume, tank_size)?;
        if requested_loads > plan.number_of_loads {
            plan.set_number_of_loads(requested_loads)?;
        }
        Ok(plan)
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn tank_size(&self) -> f64 {
        self.tank_size
    }

    pub fn number_of_loads(&self) -> usize {
        self.number_of_loads
    }

    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    pub fn volumes(&self) -> &[f64] {
        &self.load_volumes
    }

    pub fn locked_loads(&self) -> &BTreeSet<usize> {
        &self.locked_loads
    }

    pub fn warning(&self) -> Option<MixWarning> {
        self.warning
    }

    /// Minimum loads the current volume and tank size require
    pub fn min_loads_required(&self) -> usize {
        // Construction already validated the configuration
        min_loads(self.total_volume, self.tank_size).unwrap_or(0)
    }

    /// Change the load count. Counts below the required minimum are raised
    /// to it. Locks are cleared and volumes reseed from an even split.
    pub fn set_number_of_loads(&mut self, requested: usize) -> Result<(), MixError> {
        self.number_of_loads = requested.max(self.min_loads_required());
        self.reseed()
    }

    /// Switch between even and custom splitting. Any mode change clears the
    /// locks and reseeds from a fresh even split.
    pub fn set_split_mode(&mut self, mode: SplitMode) -> Result<(), MixError> {
        if mode == self.split_mode {
            return Ok(());
        }
        self.split_mode = mode;
        self.reseed()
    }

    /// Manually set one load's volume.
    ///
    /// Setting a volume locks that load and redistributes the slack across
    /// the remaining unlocked loads. Implies custom mode. Out-of-range
    /// indices are ignored.
    pub fn set_load_volume(&mut self, index: usize, volume: f64) -> Result<(), MixError> {
        if index >= self.load_volumes.len() {
            return Ok(());
        }
        if self.split_mode != SplitMode::Custom {
            self.set_split_mode(SplitMode::Custom)?;
        }

        self.locked_loads.insert(index);
        let outcome = redistribute_load_volumes(
            &self.load_volumes,
            index,
            volume,
            self.total_volume,
            self.tank_size,
            &self.locked_loads,
        );
        self.load_volumes = outcome.volumes;
        self.warning = outcome.warning;
        Ok(())
    }

    fn reseed(&mut self) -> Result<(), MixError> {
        self.locked_loads.clear();
        self.warning = None;
        self.load_volumes =
            calculate_even_split(self.total_volume, self.number_of_loads, self.tank_size)?;
        Ok(())
    }

    /// Percentage of tank capacity for one load, 0-100
    pub fn percentage(&self, index: usize) -> f64 {
        if self.tank_size <= 0.0 {
            return 0.0;
        }
        self.load_volumes
            .get(index)
            .map(|v| round2(v / self.tank_size * 100.0))
            .unwrap_or(0.0)
    }

    /// Count of loads at or above the full-load threshold
    pub fn full_loads(&self) -> usize {
        (0..self.load_volumes.len())
            .filter(|i| self.percentage(*i) >= FULL_LOAD_THRESHOLD)
            .count()
    }

    /// Count of loads below the full-load threshold
    pub fn partial_loads(&self) -> usize {
        self.load_volumes.len() - self.full_loads()
    }

    /// Materialize the plan as loads with per-load product amounts
    pub fn loads(&self, products: &[TankMixProduct]) -> Vec<Load> {
        self.load_volumes
            .iter()
            .enumerate()
            .map(|(i, volume)| Load {
                load_number: i + 1,
                volume: *volume,
                percentage: self.percentage(i),
                products: calculate_load_products(*volume, self.total_volume, products),
            })
            .collect()
    }
}
