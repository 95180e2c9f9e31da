//! TankMix Tools module
//!
//! Stateless tool implementations over the planning engine.

pub mod containers;
pub mod loads;
pub mod plan;
pub mod status;
pub mod units;
