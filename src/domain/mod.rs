//! Domain modules.

pub mod carts;
pub mod orders;
pub mod products;
