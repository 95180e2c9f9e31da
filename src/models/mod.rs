//! Data models
//!
//! Plain value objects exchanged with the engine. Catalog data (products,
//! containers) is supplied by the caller per invocation and treated as
//! read-only.

mod container;
mod load;
mod product;
mod tank_mix;

pub use container::{ContainerBreakdown, ContainerQuantity, ContainerType, Remainder};
pub use load::{Load, LoadProductAmount};
pub use product::{Product, ProductType};
pub use tank_mix::TankMixProduct;
