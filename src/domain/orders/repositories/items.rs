//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_count},
    domain::{
        carts::models::CartLine,
        orders::models::{OrderId, OrderItem, OrderItemId, ProductSnapshot},
        products::models::ProductId,
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert one order item from a cart line, freezing the unit price
    /// and the product's display fields as they are right now.
    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemId,
        order: OrderId,
        line: &CartLine,
    ) -> Result<OrderItem, sqlx::Error> {
        let price_i64 =
            i64::try_from(line.product.price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let quantity_i32 =
            i32::try_from(line.entry.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .bind(line.entry.product_id.into_uuid())
            .bind(quantity_i32)
            .bind(price_i64)
            .bind(&line.product.title)
            .bind(&line.product.image)
            .bind(&line.product.category)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemId::from_uuid(row.try_get("uuid")?),
            order_id: OrderId::from_uuid(row.try_get("order_uuid")?),
            product_id: ProductId::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            product: ProductSnapshot {
                title: row.try_get("product_title")?,
                image: row.try_get("product_image")?,
                category: row.try_get("product_category")?,
            },
        })
    }
}
