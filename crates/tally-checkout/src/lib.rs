//! # tally-checkout: Sale Transaction Processor
//!
//! Takes a proposed cart and durably commits it as a sale, then reconciles
//! stock for what was sold.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CheckoutRequest                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RECEIVED ── validate ──► 400 VALIDATION_ERROR                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RESOLVING ── any line unresolvable ──► REJECTED (400, line echoed)    │
//! │       │         (nothing written, no stock touched)                     │
//! │       ▼                                                                 │
//! │  RECORDING ── store failure ──► 500 (no reconciliation)                │
//! │       │         header + all lines in one transaction                   │
//! │       ▼                                                                 │
//! │  RECORDED                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RECONCILING ── per-line decrement; failures logged, never fatal       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DONE ──► 201 + the Sale as stored                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No stage retries. Stock has no floor; concurrent checkouts may drive it
//! negative and that is recorded faithfully.
//!
//! ## Usage
//! ```rust,ignore
//! let processor = SaleProcessor::new(db.products(), db.sales());
//! let outcome = processor.process(&request).await?;
//! println!("recorded {}", outcome.sale.id);
//! ```

pub mod error;
pub mod memory;
pub mod processor;
pub mod reconciler;
pub mod recorder;
pub mod resolver;

pub use error::CheckoutError;
pub use memory::MemoryStore;
pub use processor::{CheckoutOutcome, CheckoutStage, SaleProcessor};
pub use reconciler::{ItemReconciliation, ReconciliationReport, StockOutcome};
pub use resolver::Resolution;
