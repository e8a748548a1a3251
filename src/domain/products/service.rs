//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::CurrentUser,
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductId, ProductUpdate},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_products_by_category(
        &self,
        category: String,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .list_products_by_category(&mut tx, &category)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        actor: CurrentUser,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        actor.require_admin()?;
        validate_title(&product.title)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

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

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        actor: CurrentUser,
        product: ProductId,
    ) -> Result<(), ProductsServiceError> {
        actor.require_admin()?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ProductsServiceError> {
    if title.trim().is_empty() {
        return Err(ProductsServiceError::MissingRequiredData);
    }

    Ok(())
}

/// Durable product records; the sole authority for stock levels.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// List the whole catalog, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// List products in one category, newest first.
    async fn list_products_by_category(
        &self,
        category: String,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError>;

    /// Create a product. Admin only.
    async fn create_product(
        &self,
        actor: CurrentUser,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError>;

    /// Replace a product's mutable fields, including stock. Admin only.
    async fn update_product(
        &self,
        actor: CurrentUser,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Delete a product. Admin only. Historical order items keep their
    /// snapshots; cart entries referencing the product are removed.
    async fn delete_product(
        &self,
        actor: CurrentUser,
        product: ProductId,
    ) -> Result<(), ProductsServiceError>;
}
