//! In-memory carts service.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    auth::CurrentUser,
    domain::{
        carts::{
            CartsService,
            errors::CartsServiceError,
            models::{CartEntry, CartEntryId, CartView},
            service::positive_quantity,
        },
        products::models::ProductId,
    },
    memory::MemoryStore,
};

#[derive(Debug, Clone)]
pub struct MemoryCartsService {
    store: MemoryStore,
}

impl MemoryCartsService {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CartsService for MemoryCartsService {
    async fn get_cart(&self, actor: CurrentUser) -> Result<CartView, CartsServiceError> {
        let state = self.store.lock().await;

        Ok(CartView::from_lines(state.cart_lines(actor.user_id)))
    }

    async fn add_entry(
        &self,
        actor: CurrentUser,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartEntry, CartsServiceError> {
        let quantity = positive_quantity(quantity)?;

        let mut state = self.store.lock().await;

        let stock = state
            .products
            .get(&product)
            .ok_or(CartsServiceError::ProductNotFound)?
            .stock;

        let existing = state
            .find_entry(actor.user_id, product)
            .map(|entry| (entry.uuid, entry.quantity));

        let carted = existing.map_or(0, |(_, quantity)| quantity);
        let merged = carted
            .checked_add(quantity)
            .ok_or(CartsServiceError::InvalidQuantity)?;

        if merged > stock {
            return Err(CartsServiceError::InsufficientStock {
                product,
                available: stock.saturating_sub(carted),
            });
        }

        let entry = match existing {
            Some((uuid, _)) => {
                let entry = state
                    .cart_entries
                    .get_mut(&uuid)
                    .ok_or(CartsServiceError::EntryNotFound)?;
                entry.quantity = merged;
                entry.updated_at = Timestamp::now();
                entry.clone()
            }
            None => {
                let now = Timestamp::now();
                let entry = CartEntry {
                    uuid: CartEntryId::new(),
                    user_id: actor.user_id,
                    product_id: product,
                    quantity,
                    created_at: now,
                    updated_at: now,
                };
                state.cart_entries.insert(entry.uuid, entry.clone());
                entry
            }
        };

        Ok(entry)
    }

    async fn update_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
        quantity: i64,
    ) -> Result<Option<CartEntry>, CartsServiceError> {
        let mut state = self.store.lock().await;

        if quantity <= 0 {
            remove_scoped(&mut state.cart_entries, actor, entry);

            return Ok(None);
        }

        let quantity = positive_quantity(quantity)?;

        let product_id = state
            .cart_entries
            .get(&entry)
            .filter(|existing| existing.user_id == actor.user_id)
            .map(|existing| existing.product_id)
            .ok_or(CartsServiceError::EntryNotFound)?;

        let stock = state
            .products
            .get(&product_id)
            .ok_or(CartsServiceError::ProductNotFound)?
            .stock;

        if quantity > stock {
            return Err(CartsServiceError::InsufficientStock {
                product: product_id,
                available: stock,
            });
        }

        let existing = state
            .cart_entries
            .get_mut(&entry)
            .ok_or(CartsServiceError::EntryNotFound)?;

        existing.quantity = quantity;
        existing.updated_at = Timestamp::now();

        Ok(Some(existing.clone()))
    }

    async fn remove_entry(
        &self,
        actor: CurrentUser,
        entry: CartEntryId,
    ) -> Result<(), CartsServiceError> {
        let mut state = self.store.lock().await;

        remove_scoped(&mut state.cart_entries, actor, entry);

        Ok(())
    }

    async fn clear_cart(&self, actor: CurrentUser) -> Result<(), CartsServiceError> {
        let mut state = self.store.lock().await;

        state.clear_cart(actor.user_id);

        Ok(())
    }
}

/// Delete only if the entry belongs to the caller; absent and foreign
/// entries are both a no-op, matching the scoped SQL delete.
fn remove_scoped(
    entries: &mut std::collections::HashMap<CartEntryId, CartEntry>,
    actor: CurrentUser,
    entry: CartEntryId,
) {
    if entries
        .get(&entry)
        .is_some_and(|existing| existing.user_id == actor.user_id)
    {
        entries.remove(&entry);
    }
}
