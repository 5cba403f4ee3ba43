//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the vocabulary of Tally POS: money, products, sales, and
//! the store contracts the checkout pipeline is written against. It has no
//! I/O of its own.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout ──► Invoice              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-api (axum)                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-checkout                               │   │
//! │  │    resolve ──► record ──► reconcile                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ProductCatalog / SaleLedger            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │   money • types • validation • ports • errors                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                    tally-db (SQLite)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Amount`, an exact decimal (no floating point!)
//! - [`types`] - Domain types (Product, Sale, SoldItem, checkout DTOs)
//! - [`ports`] - Store traits implemented by tally-db and test doubles
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Amount;
//!
//! let price: Amount = "3.50".parse().unwrap();
//!
//! // Scale is preserved exactly as written
//! assert_eq!(price.to_string(), "3.50");
//! assert_eq!(price.scale(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod ports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, StoreError, StoreResult, ValidationError};
pub use money::Amount;
pub use ports::{ProductCatalog, SaleLedger};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product code.
pub const MAX_PRODUCT_CODE_LEN: usize = 50;

/// Maximum length of a product or line-item name.
pub const MAX_NAME_LEN: usize = 200;
