//! In-memory backend.
//!
//! Implements the same service traits as the Postgres backend against a
//! single mutex-guarded state, so the full stack can run without a
//! database. One lock acquisition plays the role of one transaction:
//! every read and write inside it is atomic and isolated, which is
//! exactly the guarantee the checkout orchestrator needs.

mod carts;
mod orders;
mod products;
mod store;

pub use carts::MemoryCartsService;
pub use orders::MemoryOrdersService;
pub use products::MemoryProductsService;
pub use store::MemoryStore;
