//! Cart Entries Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    auth::UserId,
    database::{try_get_amount, try_get_count},
    domain::{
        carts::models::{CartEntry, CartEntryId, CartLine, CartProduct},
        products::models::ProductId,
    },
};

const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");
const GET_ENTRY_SQL: &str = include_str!("sql/get_entry.sql");
const GET_ENTRY_QUANTITY_SQL: &str = include_str!("sql/get_entry_quantity.sql");
const UPSERT_ENTRY_SQL: &str = include_str!("sql/upsert_entry.sql");
const SET_ENTRY_QUANTITY_SQL: &str = include_str!("sql/set_entry_quantity.sql");
const DELETE_ENTRY_SQL: &str = include_str!("sql/delete_entry.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartEntriesRepository;

impl PgCartEntriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Entries joined with live product data, newest entry first.
    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        entry: CartEntryId,
    ) -> Result<CartEntry, sqlx::Error> {
        query_as::<Postgres, CartEntry>(GET_ENTRY_SQL)
            .bind(entry.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Quantity already carted for (user, product), if any.
    pub(crate) async fn get_entry_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        product: ProductId,
    ) -> Result<Option<u32>, sqlx::Error> {
        let quantity: Option<i32> = query_scalar(GET_ENTRY_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        quantity
            .map(|q| {
                u32::try_from(q).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }

    /// Insert a new entry, or merge quantities when one already exists
    /// for (user, product).
    pub(crate) async fn upsert_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: CartEntryId,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartEntry, sqlx::Error> {
        query_as::<Postgres, CartEntry>(UPSERT_ENTRY_SQL)
            .bind(entry.into_uuid())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(to_db_quantity(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_entry_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        entry: CartEntryId,
        quantity: u32,
    ) -> Result<CartEntry, sqlx::Error> {
        query_as::<Postgres, CartEntry>(SET_ENTRY_QUANTITY_SQL)
            .bind(entry.into_uuid())
            .bind(user.into_uuid())
            .bind(to_db_quantity(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        entry: CartEntryId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ENTRY_SQL)
            .bind(entry.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn to_db_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for CartEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartEntryId::from_uuid(row.try_get("uuid")?),
            user_id: UserId::from_uuid(row.try_get("user_uuid")?),
            product_id: ProductId::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            entry: CartEntry::from_row(row)?,
            product: CartProduct {
                title: row.try_get("title")?,
                price: try_get_amount(row, "price")?,
                image: row.try_get("image")?,
                stock: try_get_count(row, "stock")?,
                category: row.try_get("category")?,
            },
        })
    }
}
