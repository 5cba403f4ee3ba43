//! In-memory store implementation
//!
//! Implements both store traits without a database, for processor tests.
//! Thread-safe using RwLock for concurrent access.
//!
//! Failures can be injected per operation so the error paths of the
//! processor can be driven deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tally_core::{
    Amount, NewSale, Product, ProductCatalog, Sale, SaleLedger, SoldItem, StoreError, StoreResult,
};

/// In-memory catalog and sale ledger.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<String, Product>>,
    sales: RwLock<Vec<Sale>>,
    fail_lookups: AtomicBool,
    fail_inserts: AtomicBool,
    failing_decrements: RwLock<HashSet<String>>,
    lookup_calls: AtomicUsize,
    decrement_calls: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product and returns it.
    pub fn add_product(&self, code: &str, name: &str, price: Amount, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            product_code: code.to_string(),
            name: name.to_string(),
            price,
            stock_quantity: stock,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id.clone(), product.clone());
        product
    }

    /// Removes a product, simulating a delete that races a checkout.
    pub fn remove_product(&self, id: &str) -> Option<Product> {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Current stock of a product.
    pub fn stock_of(&self, id: &str) -> Option<i64> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|p| p.stock_quantity)
    }

    /// Get the number of recorded sales
    pub fn sale_count(&self) -> usize {
        self.sales.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of product lookups served (by id or by code).
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Number of stock decrements attempted.
    pub fn decrement_calls(&self) -> usize {
        self.decrement_calls.load(Ordering::SeqCst)
    }

    /// Makes every product lookup fail with a backend error.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes every sale insert fail with a backend error.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes stock decrements for `product_id` fail with a backend error.
    pub fn fail_decrement_for(&self, product_id: &str) {
        self.failing_decrements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id.to_string());
    }

    fn check_lookup(&self) -> StoreResult<()> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected lookup failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for MemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        self.check_lookup()?;
        Ok(self
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        self.check_lookup()?;
        Ok(self
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|p| p.product_code == code)
            .cloned())
    }

    async fn decrement_stock(&self, id: &str, quantity: i64) -> StoreResult<()> {
        self.decrement_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .failing_decrements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
        {
            return Err(StoreError::Backend("injected decrement failure".to_string()));
        }

        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let product = products
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        product.stock_quantity -= quantity;
        product.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl SaleLedger for MemoryStore {
    async fn insert_sale(&self, new: &NewSale) -> StoreResult<Sale> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected insert failure".to_string()));
        }

        // Same all-or-nothing rule as the RESTRICT foreign key.
        {
            let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
            let missing = new
                .items
                .iter()
                .find(|i| !products.contains_key(&i.product_id));
            if let Some(missing) = missing {
                return Err(StoreError::Backend(format!(
                    "sold item references missing product {}",
                    missing.product_id
                )));
            }
        }

        let sale = Sale {
            id: new.id.clone(),
            date: new.date,
            subtotal: new.header.subtotal,
            tax: new.header.tax,
            total_amount: new.header.total_amount,
            sold_items: new
                .items
                .iter()
                .map(|item| SoldItem {
                    id: item.id.clone(),
                    sale_id: new.id.clone(),
                    product_id: item.product_id.clone(),
                    product_code: item.product_code.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        };

        self.sales
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sale.clone());
        Ok(sale)
    }

    async fn find_sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self
            .sales
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_and_decrement() {
        let store = MemoryStore::new();
        let p = store.add_product("ESP-1001", "Espresso", "3.50".parse().unwrap(), 1);

        assert_eq!(store.find_by_code("ESP-1001").await.unwrap().unwrap().id, p.id);
        store.decrement_stock(&p.id, 3).await.unwrap();
        assert_eq!(store.stock_of(&p.id), Some(-2));

        let err = store.decrement_stock("missing", 1).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.decrement_calls(), 2);
        assert_eq!(store.lookup_calls(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        let p = store.add_product("ESP-1001", "Espresso", "3.50".parse().unwrap(), 5);

        store.fail_decrement_for(&p.id);
        assert!(store.decrement_stock(&p.id, 1).await.is_err());
        assert_eq!(store.stock_of(&p.id), Some(5));

        store.fail_lookups(true);
        assert!(store.find_by_id(&p.id).await.is_err());
    }
}
