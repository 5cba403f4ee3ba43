//! # Sale Repository
//!
//! Database operations for sales and sold items.
//!
//! ## Sale Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       insert_sale(NewSale)                              │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO sales       (header, amounts verbatim)                  │
//! │    INSERT INTO sold_items  line 0                                      │
//! │    INSERT INTO sold_items  line 1                                      │
//! │    ...                                                                  │
//! │    SELECT sale + items  ← read back on the same connection             │
//! │  COMMIT ──────────── any failure above rolls back everything           │
//! │                                                                         │
//! │  The read-back is what the caller gets. Once COMMIT succeeds nothing   │
//! │  else can fail, so Ok means written and Err means not written.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are append-only. There is no update or delete here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use tally_core::{NewSale, Sale, SaleLedger, SoldItem, StoreResult};

use super::{parse_amount, timestamp};
use crate::error::{DbError, DbResult};

/// A `sales` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: DateTime<Utc>,
    subtotal: String,
    tax: String,
    total_amount: String,
}

/// A `sold_items` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct SoldItemRow {
    id: String,
    sale_id: String,
    product_id: String,
    product_code: String,
    name: String,
    quantity: i64,
    price: String,
}

impl TryFrom<SoldItemRow> for SoldItem {
    type Error = DbError;

    fn try_from(row: SoldItemRow) -> DbResult<Self> {
        Ok(SoldItem {
            price: parse_amount("sold_items.price", &row.price)?,
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            product_code: row.product_code,
            name: row.name,
            quantity: row.quantity,
        })
    }
}

impl SaleRow {
    fn into_sale(self, sold_items: Vec<SoldItem>) -> DbResult<Sale> {
        Ok(Sale {
            subtotal: parse_amount("sales.subtotal", &self.subtotal)?,
            tax: parse_amount("sales.tax", &self.tax)?,
            total_amount: parse_amount("sales.total_amount", &self.total_amount)?,
            id: self.id,
            date: self.date,
            sold_items,
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Writes a sale header and all of its items in one transaction and
    /// reads the aggregate back before committing.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - an item references a product that
    ///   no longer exists. Nothing is written.
    pub async fn insert_sale(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(sale_id = %sale.id, items = sale.items.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, date, subtotal, tax, total_amount)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(timestamp(sale.date))
        .bind(sale.header.subtotal.to_string())
        .bind(sale.header.tax.to_string())
        .bind(sale.header.total_amount.to_string())
        .execute(&mut *tx)
        .await?;

        for (line_no, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sold_items (
                    id, sale_id, product_id, line_no,
                    product_code, name, quantity, price
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&sale.id)
            .bind(&item.product_id)
            .bind(line_no as i64)
            .bind(&item.product_code)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        let stored = fetch_sale(&mut tx, &sale.id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", &sale.id))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(stored)
    }

    /// Gets a sale and its items (in cart order).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        fetch_sale(&mut conn, id).await
    }

    /// Lists the most recent sales with their items, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, date, subtotal, tax, total_amount
            FROM sales
            ORDER BY date DESC, id
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let items = fetch_items(&mut conn, &row.id).await?;
            sales.push(row.into_sale(items)?);
        }

        Ok(sales)
    }

    /// Gets all items for a sale, in cart order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SoldItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, sale_id).await
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Reads a sale and its items on one connection (or transaction).
async fn fetch_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let row: Option<SaleRow> =
        sqlx::query_as("SELECT id, date, subtotal, tax, total_amount FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    match row {
        Some(row) => {
            let items = fetch_items(conn, &row.id).await?;
            row.into_sale(items).map(Some)
        }
        None => Ok(None),
    }
}

async fn fetch_items(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SoldItem>> {
    let rows: Vec<SoldItemRow> = sqlx::query_as(
        r#"
        SELECT id, sale_id, product_id, product_code, name, quantity, price
        FROM sold_items
        WHERE sale_id = ?1
        ORDER BY line_no
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(SoldItem::try_from).collect()
}

#[async_trait]
impl SaleLedger for SaleRepository {
    async fn insert_sale(&self, sale: &NewSale) -> StoreResult<Sale> {
        Ok(SaleRepository::insert_sale(self, sale).await?)
    }

    async fn find_sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.get_by_id(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
