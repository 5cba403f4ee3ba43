//! # Store Ports
//!
//! The store contracts the checkout pipeline is written against.
//!
//! ```text
//! ┌──────────────────────┐      ┌───────────────────────────────────────┐
//! │  tally-checkout      │      │  implementations                      │
//! │                      │      │                                       │
//! │  ProductResolver ────┼──┐   │  tally-db::ProductRepository (SQLite) │
//! │  StockReconciler ────┼──┼──►│  tally-checkout::MemoryStore (tests)  │
//! │  SaleRecorder ───────┼──┘   │  tally-db::SaleRepository (SQLite)    │
//! └──────────────────────┘      └───────────────────────────────────────┘
//! ```
//!
//! Implementations must go to the backing store on every call. Caching
//! product stock or sale state in-process would break the guarantees the
//! checkout pipeline relies on.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{NewSale, Product, Sale};

/// Read access to products plus the stock decrement used after a sale.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Finds a product by its id.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Finds a product by its (unique) product code.
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>>;

    /// Atomically subtracts `quantity` from the product's stock.
    ///
    /// No floor is applied: stock may go below zero.
    /// Returns `StoreError::NotFound` when the product no longer exists.
    async fn decrement_stock(&self, id: &str, quantity: i64) -> StoreResult<()>;
}

/// Durable storage for sale aggregates.
#[async_trait]
pub trait SaleLedger: Send + Sync {
    /// Writes the header and every line of `sale` as one atomic unit, then
    /// returns the aggregate as a fresh read observes it.
    ///
    /// A concurrent reader sees either the complete sale or nothing.
    async fn insert_sale(&self, sale: &NewSale) -> StoreResult<Sale>;

    /// Loads a sale and its items.
    async fn find_sale(&self, id: &str) -> StoreResult<Option<Sale>>;
}

// =============================================================================
// Shared handles
// =============================================================================

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        (**self).find_by_code(code).await
    }

    async fn decrement_stock(&self, id: &str, quantity: i64) -> StoreResult<()> {
        (**self).decrement_stock(id, quantity).await
    }
}

#[async_trait]
impl<T: SaleLedger + ?Sized> SaleLedger for Arc<T> {
    async fn insert_sale(&self, sale: &NewSale) -> StoreResult<Sale> {
        (**self).insert_sale(sale).await
    }

    async fn find_sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        (**self).find_sale(id).await
    }
}
