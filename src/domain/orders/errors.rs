//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    auth::Forbidden,
    domain::{
        orders::models::{InvalidStatus, OrderStatus},
        products::models::ProductId,
    },
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order not found")]
    NotFound,

    #[error("access denied")]
    AccessDenied,

    /// The conditional stock decrement found less stock than the
    /// checkout needed. The whole unit of work has been rolled back;
    /// the caller's cart is untouched.
    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: ProductId, requested: u32 },

    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),

    #[error("order status cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Infrastructure failure. Everything was rolled back, so a retry
    /// with the same cart is safe.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Whether the caller may simply resubmit the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Sql(_))
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<Forbidden> for OrdersServiceError {
    fn from(_: Forbidden) -> Self {
        Self::AccessDenied
    }
}
