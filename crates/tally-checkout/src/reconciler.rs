//! # Stock Reconciler
//!
//! Decrements stock for every line of a recorded sale.
//!
//! ```text
//!   Sale (already committed)
//!     ├── line 0 ──► decrement_stock ──► Decremented
//!     ├── line 1 ──► decrement_stock ──► Failed (logged, sale untouched)
//!     └── line 2 ──► decrement_stock ──► Decremented
//! ```
//!
//! Runs outside the sale's transaction. One line's failure never stops the
//! next. Two lines for the same product are two decrements.

use tally_core::{ProductCatalog, Sale, StoreError};
use tracing::{debug, warn};

/// Result of one line's stock decrement.
#[derive(Debug, Clone)]
pub enum StockOutcome {
    Decremented,
    Failed(StoreError),
}

/// One line of a [`ReconciliationReport`].
#[derive(Debug, Clone)]
pub struct ItemReconciliation {
    pub product_id: String,
    pub quantity: i64,
    pub outcome: StockOutcome,
}

/// Per-line outcomes, in sale order.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    pub items: Vec<ItemReconciliation>,
}

impl ReconciliationReport {
    /// True when every line was decremented.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Lines whose decrement failed.
    pub fn failures(&self) -> impl Iterator<Item = &ItemReconciliation> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, StockOutcome::Failed(_)))
    }
}

/// Decrements stock for each line of `sale`.
pub async fn reconcile<C>(catalog: &C, sale: &Sale) -> ReconciliationReport
where
    C: ProductCatalog + ?Sized,
{
    let mut report = ReconciliationReport {
        items: Vec::with_capacity(sale.sold_items.len()),
    };

    for item in &sale.sold_items {
        let outcome = match catalog.decrement_stock(&item.product_id, item.quantity).await {
            Ok(()) => {
                debug!(
                    sale_id = %sale.id,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "Stock decremented"
                );
                StockOutcome::Decremented
            }
            Err(e) => {
                warn!(
                    sale_id = %sale.id,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    error = %e,
                    "Stock reconciliation failed for item"
                );
                StockOutcome::Failed(e)
            }
        };

        report.items.push(ItemReconciliation {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            outcome,
        });
    }

    report
}
