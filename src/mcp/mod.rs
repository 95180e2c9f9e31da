//! TankMix MCP module

pub mod server;

pub use server::TankMixService;
