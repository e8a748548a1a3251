//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::CurrentUser,
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartEntry, CartEntryId, CartView},
            repository::PgCartEntriesRepository,
        },
        products::{PgProductsRepository, models::ProductId},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    entries: PgCartEntriesRepository,
    products: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            entries: PgCartEntriesRepository::new(),
            products: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, actor: CurrentUser) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self.entries.get_cart_lines(&mut tx, actor.user_id).await?;

        tx.commit().await?;

        Ok(CartView::from_lines(lines))
    }

    async fn add_entry(
        &self,
        actor: CurrentUser,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartEntry, CartsServiceError> {
        let quantity = positive_quantity(quantity)?;

        let mut tx = self.db.begin().await?;

        let catalog = self
            .products
            .get_product(&mut tx, product)
            .await
            .map_err(product_not_found)?;

        let existing = self
            .entries
            .get_entry_quantity(&mut tx, actor.user_id, product)
            .await?
            .unwrap_or(0);

        // Advisory ceiling so the UI can react before checkout; the
        // conditional decrement at checkout remains authoritative.
        let merged = existing
            .checked_add(quantity)
            .ok_or(CartsServiceError::InvalidQuantity)?;

        if merged > catalog.stock {
            return Err(CartsServiceError::InsufficientStock {
                product,
                available: catalog.stock.saturating_sub(existing),
            });
        }

        let entry = self
            .entries
            .upsert_entry(&mut tx, CartEntryId::new(), actor.user_id, product, quantity)
            .await?;

        tx.commit().await?;

        Ok(entry)
    }

    async fn update_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
        quantity: i64,
    ) -> Result<Option<CartEntry>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // Zero or negative quantity removes the entry. Removing an
        // absent entry is deliberately not an error.
        if quantity <= 0 {
            self.entries
                .delete_entry(&mut tx, actor.user_id, entry)
                .await?;

            tx.commit().await?;

            return Ok(None);
        }

        let quantity = positive_quantity(quantity)?;

        let current = self.entries.get_entry(&mut tx, actor.user_id, entry).await?;

        let catalog = self
            .products
            .get_product(&mut tx, current.product_id)
            .await
            .map_err(product_not_found)?;

        if quantity > catalog.stock {
            return Err(CartsServiceError::InsufficientStock {
                product: current.product_id,
                available: catalog.stock,
            });
        }

        let updated = self
            .entries
            .set_entry_quantity(&mut tx, actor.user_id, entry, quantity)
            .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn remove_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // Scoped by user, so a foreign entry id is indistinguishable
        // from an absent one: both are a no-op.
        self.entries
            .delete_entry(&mut tx, actor.user_id, entry)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn clear_cart(&self, actor: CurrentUser) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.entries.clear_cart(&mut tx, actor.user_id).await?;

        tx.commit().await?;

        Ok(())
    }
}

pub(crate) fn positive_quantity(quantity: i64) -> Result<u32, CartsServiceError> {
    if quantity <= 0 {
        return Err(CartsServiceError::InvalidQuantity);
    }

    u32::try_from(quantity).map_err(|_| CartsServiceError::InvalidQuantity)
}

fn product_not_found(error: sqlx::Error) -> CartsServiceError {
    if matches!(error, sqlx::Error::RowNotFound) {
        CartsServiceError::ProductNotFound
    } else {
        error.into()
    }
}

/// Per-user mutable collection of product+quantity intents.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart joined with live product data. No side effects.
    async fn get_cart(&self, actor: CurrentUser) -> Result<CartView, CartsServiceError>;

    /// Add `quantity` of a product, merging with an existing entry for
    /// the same product. The merged quantity may not exceed live stock.
    async fn add_entry(
        &self,
        actor: CurrentUser,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartEntry, CartsServiceError>;

    /// Set an entry's quantity. Zero or negative deletes the entry and
    /// returns `None`; deleting an absent entry is not an error.
    async fn update_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
        quantity: i64,
    ) -> Result<Option<CartEntry>, CartsServiceError>;

    /// Remove an entry. Removing an absent entry is a no-op.
    async fn remove_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
    ) -> Result<(), CartsServiceError>;

    /// Delete every entry in the caller's cart. An empty cart is fine.
    async fn clear_cart(&self, actor: CurrentUser) -> Result<(), CartsServiceError>;
}
