//! In-memory products service.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    auth::CurrentUser,
    domain::products::{
        ProductsService,
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductId, ProductUpdate},
        service::validate_title,
    },
    memory::MemoryStore,
};

#[derive(Debug, Clone)]
pub struct MemoryProductsService {
    store: MemoryStore,
}

impl MemoryProductsService {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductsService for MemoryProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let state = self.store.lock().await;

        Ok(newest_first(state.products.values().cloned().collect()))
    }

    async fn list_products_by_category(
        &self,
        category: String,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let state = self.store.lock().await;

        let products = state
            .products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect();

        Ok(newest_first(products))
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        let state = self.store.lock().await;

        state
            .products
            .get(&product)
            .cloned()
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn create_product(
        &self,
        actor: CurrentUser,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        actor.require_admin()?;
        validate_title(&product.title)?;

        let mut state = self.store.lock().await;

        if state.products.contains_key(&product.uuid) {
            return Err(ProductsServiceError::AlreadyExists);
        }

        let now = Timestamp::now();
        let created = Product {
            uuid: product.uuid,
            title: product.title,
            description: product.description,
            price: product.price,
            image: product.image,
            stock: product.stock,
            category: product.category,
            created_at: now,
            updated_at: now,
        };

        state.products.insert(created.uuid, created.clone());

        Ok(created)
    }

    async fn update_product(
        &self,
        actor: CurrentUser,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        actor.require_admin()?;
        validate_title(&update.title)?;

        let mut state = self.store.lock().await;

        let existing = state
            .products
            .get_mut(&product)
            .ok_or(ProductsServiceError::NotFound)?;

        existing.title = update.title;
        existing.description = update.description;
        existing.price = update.price;
        existing.image = update.image;
        existing.stock = update.stock;
        existing.category = update.category;
        existing.updated_at = Timestamp::now();

        Ok(existing.clone())
    }

    async fn delete_product(
        &self,
        actor: CurrentUser,
        product: ProductId,
    ) -> Result<(), ProductsServiceError> {
        actor.require_admin()?;

        let mut state = self.store.lock().await;

        if state.products.remove(&product).is_none() {
            return Err(ProductsServiceError::NotFound);
        }

        // Mirrors the foreign key cascade: carts drop their entries for
        // the deleted product; order item snapshots are untouched.
        state
            .cart_entries
            .retain(|_, entry| entry.product_id != product);

        Ok(())
    }
}

fn newest_first(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| (b.created_at, b.uuid).cmp(&(a.created_at, a.uuid)));
    products
}
