//! TankMix Status Tool
//!
//! Provides runtime status information about the TankMix service.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::build_info::BuildInfo;

/// Mix planning instructions for AI assistants
pub const MIX_INSTRUCTIONS: &str = r#"
# TankMix Planning Instructions

This guide explains how to plan spray mixes using the TankMix Planner tools.

## Overview

To plan a tank mix, you need:
1. **Job parameters** - Tank size (gal), carrier rate (gal/acre), and acres
2. **Products** - Each with a rate, measurement unit, and rate basis
3. **Containers** (optional) - A catalog for shopping-list breakdowns

Total spray volume is always `acres x carrier_rate`. Product totals are
always derived from rates; never supply a hand-computed total, it will be
recalculated and overwritten.

---

## Units and Rate Bases

### Measurement Units

| Unit | Label | Base | Factor |
|------|-------|------|--------|
| Fluid ounce | `fluid-ounce` | gallons | 1/128 |
| Pint | `pint` | gallons | 1/8 |
| Quart | `quart` | gallons | 1/4 |
| Gallon | `gallon` | gallons | 1 |
| Dry ounce | `ounce` | pounds | 1/16 |
| Pound | `pound` | pounds | 1 |

Liquid amounts are reported in gallons, dry amounts in pounds.

### Rate Bases

| Basis | Label | Amount formula |
|-------|-------|----------------|
| Per acre | `per-acre` | rate x factor x acres |
| Per 100 gal carrier | `per-100-gal-carrier` | rate x factor x (carrier volume / 100) |

### Legacy Labels

Old records store free-text labels like "oz/acre" or "qt/100 gal". Use
`parse_legacy_unit` to map them to a structured unit/basis pair before
planning. Unrecognized labels fall back to gal/acre.

---

## Step-by-Step Workflow

### Step 1: Plan the Mix

```
plan_tank_mix(
  tank_size: 500,
  carrier_rate: 10,
  acres: 160,
  products: [
    {
      product_id: "herb-1",
      product_name: "Broadleaf Herbicide",
      product_type: "liquid",
      rate: 32,
      unit: "fluid-ounce",
      rate_basis: "per-acre"
    }
  ]
)
```

Returns the total volume (1600 gal), minimum loads (4), per-product totals
(40 gal), and the per-load breakdown.

### Step 2: Adjust Loads (optional)

The planner seeds an even split over the minimum number of loads. To use
more loads, pass `requested_loads`; counts below the minimum are raised.

To set one load's volume manually, use `redistribute_loads` with the
current volumes. The changed load is locked and the slack is spread over
the remaining unlocked loads proportionally. Pass previously locked
indices in `locked_loads` so they stay put.

**Watch for the `warning` field.** When locked loads plus tank capacity
make it impossible to preserve the total volume, the response carries an
`over_constrained_redistribution` warning with the gallon difference.
Surface it to the user; never silently ignore it.

### Step 3: Container Breakdown (optional)

```
container_breakdown(
  total_amount: 6.3,
  product_type: "liquid",
  containers: [
    {id: "liquid-2.5gal", name: "2.5 gal Jug", size: 2.5, unit: "gal", product_type: "liquid"}
  ],
  preferred_container_ids: ["liquid-2.5gal"]
)
```

Returns `2x 2.5 gal Jug + 1 gal 38 oz`. Remainders are formatted in whole
base units plus ounces; tote-class breakdowns (any container >= 250)
report tenths of a gallon instead.

`preferred_container_ids` is an allow-list: once set, only those
containers are considered. An empty list means no restriction.

---

## Quick Reference

| Task | Tool |
|------|------|
| Plan a full mix | `plan_tank_mix` |
| Split a volume evenly | `calculate_even_split` |
| Manually adjust one load | `redistribute_loads` |
| Convert a rate to an amount | `convert_rate` |
| Map a legacy rate label | `parse_legacy_unit` |
| Pack an amount into containers | `container_breakdown` |
| Service status | `tankmix_status` |

## Common Mistakes to Avoid

### Supplying hand-computed totals
Product `total_amount` inputs are ignored and recomputed from the rate.
To change a total, change the rate.

### Requesting fewer loads than the minimum
A 1600 gal job cannot fit in 3 loads of a 500 gal tank. Requested counts
below the minimum are raised, not honored.

### Forgetting locked loads on redistribution
`redistribute_loads` is stateless. Pass every previously locked index in
`locked_loads` or earlier manual edits will be redistributed away.

## Notes

- All volumes and amounts are rounded to 2 decimal places
- A load at or above 90% of tank capacity counts as full
- Dry products ("dry" or legacy "granular") measure in pounds; "bulk"
  products measure as liquids
"#;

/// Runtime status of the TankMix service
#[derive(Debug, Clone, Serialize)]
pub struct TankMixStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,

    /// Tool invocation counts since startup
    pub tool_calls: BTreeMap<String, u64>,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    tool_calls: BTreeMap<String, u64>,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            tool_calls: BTreeMap::new(),
        }
    }

    /// Record one invocation of a tool
    pub fn record(&mut self, tool_name: &str) {
        *self.tool_calls.entry(tool_name.to_string()).or_insert(0) += 1;
    }

    /// Get the current status
    pub fn get_status(&self) -> TankMixStatus {
        let build_info = BuildInfo::current();

        TankMixStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: std::process::id(),
            tool_calls: self.tool_calls.clone(),
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
