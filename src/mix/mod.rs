//! Load planning and container packing engine
//!
//! Pure numeric algorithms over immutable inputs: rate conversion, load
//! splitting, per-load allocation, and container packing. No I/O, no shared
//! mutable state.

pub mod allocator;
pub mod packing;
pub mod rate;
pub mod splitter;
pub mod units;

pub use allocator::calculate_load_products;
pub use packing::{
    format_container_breakdown, format_remainder, ContainerPacker, BULK_CONTAINER_SIZE,
    REMAINDER_TOLERANCE,
};
pub use rate::{convert_rate_to_amount, recalculate_mix, recalculate_total_amount};
pub use splitter::{
    calculate_even_split, min_loads, redistribute_load_volumes, LoadPlan, MixError, MixWarning,
    RedistributionOutcome, SplitMode, FULL_LOAD_THRESHOLD, VOLUME_TOLERANCE,
};
pub use units::{
    parse_legacy_rate_unit, round2, MeasurementUnit, RateBasis, UnitCategory,
};
