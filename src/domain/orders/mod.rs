//! Orders
//!
//! The order ledger is append-only: orders are created atomically with
//! their items by the checkout orchestrator and never deleted; only the
//! status field moves afterwards.

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub(crate) use repositories::{PgOrderItemsRepository, PgOrdersRepository};

pub use errors::OrdersServiceError;
pub use service::*;
