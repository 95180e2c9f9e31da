//! TankMix Planner Library
//!
//! Core load planning and container packing engine for agricultural spray mixing.

pub mod build_info;
pub mod mcp;
pub mod mix;
pub mod models;
pub mod tools;
