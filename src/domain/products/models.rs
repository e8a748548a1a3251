//! Product Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::entity_uuid;

entity_uuid!(
    /// Product UUID
    ProductId
);

/// A catalog product. `stock` is the single source of truth for
/// availability and is only ever mutated through the conditional
/// decrement during checkout or by an admin product update.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub uuid: ProductId,
    pub title: String,
    pub description: String,
    /// Unit price in minor units (cents).
    pub price: u64,
    pub image: String,
    pub stock: u32,
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub uuid: ProductId,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub image: String,
    pub stock: u32,
    pub category: String,
}

/// Product Update Model. Replaces every mutable field, including stock
/// (the admin stock-setting path).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductUpdate {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub image: String,
    pub stock: u32,
    pub category: String,
}
