//! Concurrent checkouts against one shared store.

use std::sync::Arc;

use tally_checkout::{MemoryStore, SaleProcessor};
use tally_core::{CheckoutRequest, SaleItemRequest};

fn checkout_for(code: &str, quantity: i64) -> CheckoutRequest {
    CheckoutRequest {
        subtotal: "10.00".parse().unwrap(),
        tax: "0.00".parse().unwrap(),
        total_amount: "10.00".parse().unwrap(),
        items: vec![SaleItemRequest {
            product_id: None,
            product_code: Some(code.to_string()),
            name: String::new(),
            quantity,
            price: "1.00".parse().unwrap(),
        }],
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_oversell_records_every_sale() {
    let store = Arc::new(MemoryStore::new());
    let product = store.add_product("ESP-1001", "Espresso", "1.00".parse().unwrap(), 10);
    let processor = Arc::new(SaleProcessor::new(store.clone(), store.clone()));

    let a = {
        let processor = processor.clone();
        tokio::spawn(async move { processor.process(&checkout_for("ESP-1001", 7)).await })
    };
    let b = {
        let processor = processor.clone();
        tokio::spawn(async move { processor.process(&checkout_for("ESP-1001", 6)).await })
    };

    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();

    assert_ne!(a.sale.id, b.sale.id);
    assert_eq!(store.sale_count(), 2);
    assert_eq!(store.stock_of(&product.id), Some(10 - 7 - 6));
    // Blank names fall back to the catalog name.
    assert_eq!(a.sale.sold_items[0].name, "Espresso");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_checkouts_sum_exactly() {
    let store = Arc::new(MemoryStore::new());
    let product = store.add_product("LAT-2001", "Latte", "4.95".parse().unwrap(), 5);
    let processor = Arc::new(SaleProcessor::new(store.clone(), store.clone()));

    let handles: Vec<_> = (1..=20)
        .map(|qty| {
            let processor = processor.clone();
            tokio::spawn(async move { processor.process(&checkout_for("LAT-2001", qty)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let sold: i64 = (1..=20).sum();
    assert_eq!(store.sale_count(), 20);
    assert_eq!(store.stock_of(&product.id), Some(5 - sold));
}
