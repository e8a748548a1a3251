//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::products::models::ProductId;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart entry not found")]
    EntryNotFound,

    /// The requested quantity exceeds what the catalog currently has.
    /// `available` is the amount the user could still add.
    #[error("insufficient stock for product {product}: {available} available")]
    InsufficientStock { product: ProductId, available: u32 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::EntryNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::ProductNotFound,
            Some(ErrorKind::CheckViolation) => Self::InvalidQuantity,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
