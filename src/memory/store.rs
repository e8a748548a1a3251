//! Shared state for the in-memory backend.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    auth::UserId,
    domain::{
        carts::models::{CartEntry, CartEntryId, CartLine, CartProduct},
        orders::models::{Order, OrderId},
        products::models::{Product, ProductId},
    },
};

/// Everything the three services persist. Guarded by one mutex; holding
/// the guard is the in-memory equivalent of an open transaction.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) products: HashMap<ProductId, Product>,
    pub(crate) cart_entries: HashMap<CartEntryId, CartEntry>,
    pub(crate) orders: HashMap<OrderId, Order>,
}

impl State {
    pub(crate) fn find_entry(&self, user: UserId, product: ProductId) -> Option<&CartEntry> {
        self.cart_entries
            .values()
            .find(|entry| entry.user_id == user && entry.product_id == product)
    }

    /// The user's cart joined with live products, newest entry first.
    pub(crate) fn cart_lines(&self, user: UserId) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self
            .cart_entries
            .values()
            .filter(|entry| entry.user_id == user)
            .filter_map(|entry| {
                let product = self.products.get(&entry.product_id)?;

                Some(CartLine {
                    entry: entry.clone(),
                    product: CartProduct {
                        title: product.title.clone(),
                        price: product.price,
                        image: product.image.clone(),
                        stock: product.stock,
                        category: product.category.clone(),
                    },
                })
            })
            .collect();

        lines.sort_by(|a, b| {
            (b.entry.created_at, b.entry.uuid).cmp(&(a.entry.created_at, a.entry.uuid))
        });

        lines
    }

    pub(crate) fn clear_cart(&mut self, user: UserId) {
        self.cart_entries.retain(|_, entry| entry.user_id != user);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().await
    }
}
