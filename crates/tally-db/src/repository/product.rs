//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookup by id and by product code (checkout resolution)
//! - CRUD operations (catalog management)
//! - Stock adjustment (post-sale reconciliation)
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Why a delta, not a value                             │
//! │                                                                         │
//! │  stock = 10                                                            │
//! │                                                                         │
//! │  Checkout A sells 7 ──► UPDATE ... SET stock = stock - 7                │
//! │  Checkout B sells 6 ──► UPDATE ... SET stock = stock - 6                │
//! │                                                                         │
//! │  Each statement is atomic, so the result is 10 - 7 - 6 = -3 in any     │
//! │  interleaving. A read-modify-write would lose one of the updates.      │
//! │                                                                         │
//! │  There is no floor: negative stock records an oversell.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use tally_core::{NewProduct, Product, ProductCatalog, ProductUpdate, StoreResult};

use super::{parse_amount, timestamp};
use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str =
    "id, product_code, name, price, stock_quantity, image_url, created_at, updated_at";

/// A `products` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    product_code: String,
    name: String,
    price: String,
    stock_quantity: i64,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            price: parse_amount("products.price", &row.price)?,
            id: row.id,
            product_code: row.product_code,
            name: row.name,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let espresso = repo.get_by_code("ESP-1001").await?;
/// repo.adjust_stock(&espresso.unwrap().id, -2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, product_code"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its product code (exact match).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product with a generated id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - the product code is taken
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let id = generate_product_id();

        debug!(id = %id, product_code = %new.product_code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, product_code, name, price, stock_quantity,
                image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new.product_code)
        .bind(&new.name)
        .bind(new.price.to_string())
        .bind(new.stock_quantity)
        .bind(&new.image_url)
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| with_code(e.into(), &new.product_code))?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &id))
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Absent fields keep their stored value inside the same statement, so
    /// a concurrent `adjust_stock` is never overwritten by an update that
    /// does not set `stock_quantity`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no product with this id
    /// * `DbError::UniqueViolation` - the new product code is taken
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        if update.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", id));
        }

        debug!(id = %id, "Updating product");

        // An explicit stock_quantity is an operator correction, not a sale.
        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                product_code = COALESCE(?2, product_code),
                name = COALESCE(?3, name),
                price = COALESCE(?4, price),
                stock_quantity = COALESCE(?5, stock_quantity),
                image_url = COALESCE(?6, image_url),
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&update.product_code)
        .bind(&update.name)
        .bind(update.price.map(|p| p.to_string()))
        .bind(update.stock_quantity)
        .bind(&update.image_url)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| with_code(e.into(), update.product_code.as_deref().unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Products that appear on a recorded sale are kept: the check below
    /// gives the common case a clear error, and the RESTRICT foreign key
    /// catches a sale recorded between the check and the delete.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no product with this id
    /// * `DbError::StillReferenced` - a sold item references it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        if self.reference_count(id).await? > 0 {
            return Err(still_referenced(id));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => still_referenced(id),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Adds `delta` to the product's stock in one statement.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for restocking)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Number of sold items referencing the product.
    pub async fn reference_count(&self, id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sold_items WHERE product_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.get_by_id(id).await?)
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        Ok(self.get_by_code(code).await?)
    }

    async fn decrement_stock(&self, id: &str, quantity: i64) -> StoreResult<()> {
        Ok(self.adjust_stock(id, -quantity).await?)
    }
}

/// Fills in the offending value on a product code unique violation.
fn with_code(err: DbError, code: &str) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("productCode", code),
        other => other,
    }
}

fn still_referenced(id: &str) -> DbError {
    DbError::StillReferenced {
        entity: "Product".to_string(),
        id: id.to_string(),
    }
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
