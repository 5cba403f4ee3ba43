//! # Sale Transaction Processor
//!
//! One checkout request in, one terminal outcome out.
//!
//! ## States
//! ```text
//! RECEIVED ──► RESOLVING ──► RECORDING ──► RECORDED ──► RECONCILING ──► DONE
//!                  │              │
//!                  ▼              ▼
//!              REJECTED      (storage failure)
//! ```
//!
//! Every transition is logged at `debug` with the stage names. No stage is
//! retried. Each call is independent; nothing is shared between calls
//! beyond the stores themselves.

use std::fmt;

use tally_core::validation::validate_checkout;
use tally_core::{CheckoutRequest, ProductCatalog, Sale, SaleLedger};
use tracing::{debug, error, info, warn};

use crate::error::{CheckoutError, CheckoutResult};
use crate::reconciler::{reconcile, ReconciliationReport};
use crate::recorder::record_sale;
use crate::resolver::resolve_all;

/// Processor stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Received,
    Resolving,
    Recording,
    Recorded,
    Reconciling,
    Done,
    Rejected,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Received => "RECEIVED",
            CheckoutStage::Resolving => "RESOLVING",
            CheckoutStage::Recording => "RECORDING",
            CheckoutStage::Recorded => "RECORDED",
            CheckoutStage::Reconciling => "RECONCILING",
            CheckoutStage::Done => "DONE",
            CheckoutStage::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The sale as read back from the store.
    pub sale: Sale,
    /// Stock decrement results. Failures here do not undo the sale.
    pub reconciliation: ReconciliationReport,
}

/// Orchestrates resolution, recording and reconciliation.
#[derive(Debug, Clone)]
pub struct SaleProcessor<C, L> {
    catalog: C,
    ledger: L,
}

impl<C, L> SaleProcessor<C, L>
where
    C: ProductCatalog,
    L: SaleLedger,
{
    pub fn new(catalog: C, ledger: L) -> Self {
        SaleProcessor { catalog, ledger }
    }

    /// Runs one checkout to a terminal state.
    ///
    /// ## Returns
    /// * `Ok(CheckoutOutcome)` - DONE. Reconciliation may contain failures.
    /// * `Err(CheckoutError::Invalid)` - malformed cart, nothing touched
    /// * `Err(CheckoutError::Unresolvable)` - REJECTED, nothing written
    /// * `Err(CheckoutError::Lookup | Recording)` - storage failure, nothing written
    pub async fn process(&self, request: &CheckoutRequest) -> CheckoutResult<CheckoutOutcome> {
        let mut stage = CheckoutStage::Received;
        debug!(stage = %stage, items = request.items.len(), "Checkout received");

        validate_checkout(request)?;

        stage = advance(stage, CheckoutStage::Resolving);
        let resolved = match resolve_all(&self.catalog, &request.items).await {
            Ok(resolved) => resolved,
            Err(CheckoutError::Unresolvable { item }) => {
                advance(stage, CheckoutStage::Rejected);
                info!(
                    product_id = ?item.product_id,
                    product_code = ?item.product_code,
                    "Checkout rejected: item matches no product"
                );
                return Err(CheckoutError::Unresolvable { item });
            }
            Err(e) => {
                error!(stage = %stage, error = %e, "Product lookup failed during checkout");
                return Err(e);
            }
        };

        stage = advance(stage, CheckoutStage::Recording);
        let sale = match record_sale(&self.ledger, request.header(), &resolved).await {
            Ok(sale) => sale,
            Err(e) => {
                error!(stage = %stage, error = %e, "Failed to record sale");
                return Err(e);
            }
        };

        stage = advance(stage, CheckoutStage::Recorded);
        info!(
            sale_id = %sale.id,
            items = sale.sold_items.len(),
            total_amount = %sale.total_amount,
            "Sale recorded"
        );

        stage = advance(stage, CheckoutStage::Reconciling);
        let reconciliation = reconcile(&self.catalog, &sale).await;
        let failed = reconciliation.failures().count();
        if failed > 0 {
            warn!(
                sale_id = %sale.id,
                failed,
                "Sale recorded with incomplete stock reconciliation"
            );
        }

        advance(stage, CheckoutStage::Done);
        Ok(CheckoutOutcome {
            sale,
            reconciliation,
        })
    }
}

fn advance(from: CheckoutStage, to: CheckoutStage) -> CheckoutStage {
    debug!(from = %from, to = %to, "Checkout stage transition");
    to
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StockOutcome};
    use std::sync::Arc;
    use tally_core::{CoreError, Product, SaleItemRequest};

    type Processor = SaleProcessor<Arc<MemoryStore>, Arc<MemoryStore>>;

    fn setup() -> (Arc<MemoryStore>, Processor, Product) {
        let store = Arc::new(MemoryStore::new());
        let espresso = store.add_product("ESP-1001", "Espresso", "3.50".parse().unwrap(), 10);
        let processor = SaleProcessor::new(store.clone(), store.clone());
        (store, processor, espresso)
    }

    fn item(id: Option<&str>, code: Option<&str>, quantity: i64, price: &str) -> SaleItemRequest {
        SaleItemRequest {
            product_id: id.map(String::from),
            product_code: code.map(String::from),
            name: "Espresso".to_string(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    fn request(items: Vec<SaleItemRequest>) -> CheckoutRequest {
        CheckoutRequest {
            subtotal: "7.00".parse().unwrap(),
            tax: "0.70".parse().unwrap(),
            total_amount: "7.70".parse().unwrap(),
            items,
        }
    }

    #[tokio::test]
    async fn test_checkout_by_code_records_and_decrements() {
        let (store, processor, espresso) = setup();

        let outcome = processor
            .process(&request(vec![item(None, Some("ESP-1001"), 2, "3.50")]))
            .await
            .unwrap();

        let sale = &outcome.sale;
        assert_eq!(sale.sold_items.len(), 1);
        assert_eq!(sale.sold_items[0].product_id, espresso.id);
        assert_eq!(sale.sold_items[0].quantity, 2);
        assert_eq!(sale.sold_items[0].price.to_string(), "3.50");
        assert_eq!(sale.subtotal.to_string(), "7.00");
        assert_eq!(sale.tax.to_string(), "0.70");
        assert_eq!(sale.total_amount.to_string(), "7.70");
        assert!(outcome.reconciliation.is_clean());

        assert_eq!(store.stock_of(&espresso.id), Some(8));
        assert_eq!(store.sale_count(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_item_rejects_whole_checkout() {
        let (store, processor, espresso) = setup();

        let err = processor
            .process(&request(vec![
                item(None, Some("ESP-1001"), 1, "3.50"),
                item(Some("missing-id"), Some("missing-code"), 1, "1.00"),
            ]))
            .await
            .unwrap_err();

        match err {
            CheckoutError::Unresolvable { item } => {
                assert_eq!(item.product_id.as_deref(), Some("missing-id"));
                assert_eq!(item.product_code.as_deref(), Some("missing-code"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.sale_count(), 0);
        assert_eq!(store.decrement_calls(), 0);
        assert_eq!(store.stock_of(&espresso.id), Some(10));
    }

    #[tokio::test]
    async fn test_invalid_cart_touches_no_store() {
        let (store, processor, _) = setup();

        let err = processor.process(&request(vec![])).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(CoreError::EmptyCart)));

        let err = processor
            .process(&request(vec![item(None, Some("ESP-1001"), 0, "3.50")]))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(CoreError::Validation(_))));

        assert_eq!(store.lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_recording_failure_skips_reconciliation() {
        let (store, processor, espresso) = setup();
        store.fail_inserts(true);

        let err = processor
            .process(&request(vec![item(Some(&espresso.id), None, 2, "3.50")]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Recording(_)));
        assert!(err.is_storage_failure());
        assert_eq!(store.decrement_calls(), 0);
        assert_eq!(store.stock_of(&espresso.id), Some(10));
    }

    #[tokio::test]
    async fn test_reconciliation_failure_keeps_sale() {
        let (store, processor, espresso) = setup();
        let latte = store.add_product("LAT-2001", "Latte", "4.95".parse().unwrap(), 5);
        store.fail_decrement_for(&espresso.id);

        let outcome = processor
            .process(&request(vec![
                item(Some(&espresso.id), None, 1, "3.50"),
                item(Some(&latte.id), None, 2, "4.95"),
            ]))
            .await
            .unwrap();

        assert_eq!(store.sale_count(), 1);
        assert!(matches!(
            outcome.reconciliation.items[0].outcome,
            StockOutcome::Failed(_)
        ));
        assert!(matches!(
            outcome.reconciliation.items[1].outcome,
            StockOutcome::Decremented
        ));
        assert_eq!(store.stock_of(&espresso.id), Some(10));
        assert_eq!(store.stock_of(&latte.id), Some(3));
    }

    #[tokio::test]
    async fn test_response_lines_match_persisted_sale() {
        let (store, processor, espresso) = setup();

        let outcome = processor
            .process(&request(vec![
                item(None, Some("ESP-1001"), 1, "3.50"),
                item(Some(&espresso.id), Some("IGNORED"), 3, "3.40"),
            ]))
            .await
            .unwrap();

        let stored = store.find_sale(&outcome.sale.id).await.unwrap().unwrap();
        assert_eq!(stored, outcome.sale);
        assert_eq!(stored.sold_items[1].product_code, "ESP-1001");
        assert_eq!(stored.sold_items[0].quantity, 1);
        assert_eq!(stored.sold_items[1].quantity, 3);
        assert_eq!(stored.sold_items[1].price.to_string(), "3.40");
        assert_eq!(store.stock_of(&espresso.id), Some(6));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(CheckoutStage::Received.to_string(), "RECEIVED");
        assert_eq!(CheckoutStage::Rejected.to_string(), "REJECTED");
    }
}
