//! Cart Models

use jiff::Timestamp;
use serde::Serialize;

use crate::{auth::UserId, domain::products::models::ProductId, uuids::entity_uuid};

entity_uuid!(
    /// Cart Entry UUID
    CartEntryId
);

/// One product+quantity intent in a user's cart. At most one entry
/// exists per (user, product); adds merge quantities.
#[derive(Debug, Clone, Serialize)]
pub struct CartEntry {
    pub uuid: CartEntryId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Live catalog data joined onto a cart entry when the cart is read.
/// Unlike order item snapshots, these fields track the current product.
#[derive(Debug, Clone, Serialize)]
pub struct CartProduct {
    pub title: String,
    pub price: u64,
    pub image: String,
    pub stock: u32,
    pub category: String,
}

/// A cart entry together with the live product it points at.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub entry: CartEntry,
    pub product: CartProduct,
}

impl CartLine {
    /// Line subtotal at current catalog prices.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.product.price * u64::from(self.entry.quantity)
    }
}

/// The read model of a user's cart: lines newest first, priced live.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: u64,
}

impl CartView {
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal = lines.iter().map(CartLine::subtotal).sum();

        Self { lines, subtotal }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
