//! Test support.
//!
//! Service-level tests run against the in-memory backend through the
//! same trait objects production code uses, so they need no database.
//! The Postgres backend is exercised separately by the integration
//! tests under `tests/`, which require Docker.

mod context;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
