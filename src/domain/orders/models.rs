//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth::UserId, domain::products::models::ProductId, uuids::entity_uuid};

entity_uuid!(
    /// Order UUID
    OrderId
);

entity_uuid!(
    /// Order Item UUID
    OrderItemId
);

/// Fulfilment stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }

    /// Position in the fulfilment sequence, used by the forward-only
    /// transition policy.
    #[must_use]
    pub(crate) const fn stage(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Shipped => 2,
            Self::Delivered => 3,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status string is not one of the recognized values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized order status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// How `update_status` treats the current status.
///
/// The observed system accepts any recognized status in any order, so
/// that is the default; forward-only is available for deployments that
/// want the stricter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any recognized status is accepted, including backward moves.
    #[default]
    AnyRecognized,
    /// The status may only move forward through the sequence.
    /// Re-applying the current status stays allowed (idempotent).
    ForwardOnly,
}

/// Display fields copied off the product at checkout time. Owned data,
/// never a reference back to the live catalog: editing or deleting the
/// product later must not change what historical orders show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSnapshot {
    pub title: String,
    pub image: String,
    pub category: String,
}

/// One line of an order: quantity and unit price frozen at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub uuid: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price in minor units, snapshotted at order creation.
    pub price: u64,
    pub product: ProductSnapshot,
}

/// An immutable record of a completed checkout.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub uuid: OrderId,
    pub user_id: UserId,
    pub total_price: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// Validated checkout payload. Payment details are collected but not
/// verified against a processor here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub payment_method: String,
    /// Optional client-supplied token. Re-submitting a checkout with
    /// the same token returns the original order instead of creating a
    /// second one.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl CheckoutRequest {
    #[must_use]
    pub fn new(shipping_address: impl Into<String>, payment_method: impl Into<String>) -> Self {
        Self {
            shipping_address: shipping_address.into(),
            payment_method: payment_method.into(),
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub(crate) fn has_required_fields(&self) -> bool {
        !self.shipping_address.trim().is_empty() && !self.payment_method.trim().is_empty()
    }
}
