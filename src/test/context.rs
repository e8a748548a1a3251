//! Test context for service-level tests.

use std::sync::Arc;

use crate::{
    auth::{CurrentUser, UserId},
    domain::{
        carts::CartsService,
        orders::{OrdersService, models::StatusPolicy},
        products::ProductsService,
    },
    memory::{MemoryCartsService, MemoryOrdersService, MemoryProductsService, MemoryStore},
};

pub(crate) struct TestContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub admin: CurrentUser,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        Self::with_status_policy(StatusPolicy::default())
    }

    pub(crate) fn with_status_policy(policy: StatusPolicy) -> Self {
        let store = MemoryStore::new();

        Self {
            products: Arc::new(MemoryProductsService::new(store.clone())),
            carts: Arc::new(MemoryCartsService::new(store.clone())),
            orders: Arc::new(MemoryOrdersService::with_status_policy(store, policy)),
            admin: CurrentUser::admin(UserId::new()),
        }
    }

    /// A fresh non-admin caller. Each call is a distinct user.
    pub(crate) fn customer(&self) -> CurrentUser {
        CurrentUser::customer(UserId::new())
    }
}
