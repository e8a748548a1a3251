//! Storefront checkout core: catalog, per-user carts, and the atomic
//! cart-to-order transition.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod memory;

#[cfg(test)]
mod test;

mod uuids;
