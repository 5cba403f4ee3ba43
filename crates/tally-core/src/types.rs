//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SoldItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  product_code   │   │  date           │   │  sale_id (FK)   │       │
//! │  │  name           │   │  subtotal       │   │  product_id(FK) │       │
//! │  │  price          │   │  tax            │   │  code/name/price│       │
//! │  │  stock_quantity │   │  total_amount   │   │  (snapshots)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Checkout input (untrusted)        Checkout internals                   │
//! │  ┌─────────────────┐               ┌─────────────────┐                 │
//! │  │ CheckoutRequest │──resolve────► │  ResolvedItem   │──record──► Sale │
//! │  │ SaleItemRequest │               │  NewSale        │                 │
//! │  └─────────────────┘               └─────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `product_code`: human-entered, unique, mutable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Amount;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-facing lookup key (e.g. "ESP-1001"). Unique.
    pub product_code: String,

    /// Display name shown to cashier and on invoice.
    pub name: String,

    /// Current unit price.
    #[ts(type = "string")]
    pub price: Amount,

    /// Current stock level. Negative after an oversell.
    #[ts(type = "number")]
    pub stock_quantity: i64,

    /// Image reference, if any. Storage of the image itself is external.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub product_code: String,
    pub name: String,
    #[ts(type = "string")]
    pub price: Amount,
    #[ts(type = "number")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial product update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub price: Option<Amount>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.product_code.is_none()
            && self.name.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.image_url.is_none()
    }
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One cart line as the client sent it. Untrusted.
///
/// Either reference may be missing or stale; resolution decides which
/// product the line actually refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,

    /// Display name at cart-build time. May be blank.
    #[serde(default)]
    pub name: String,

    #[ts(type = "number")]
    pub quantity: i64,

    /// Unit price as the client priced it.
    #[ts(type = "string")]
    pub price: Amount,
}

/// A checkout request: client-computed totals plus cart lines.
///
/// The header amounts are recorded verbatim; nothing here is recomputed
/// from the lines.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    #[ts(type = "string")]
    pub subtotal: Amount,

    #[ts(type = "string")]
    pub tax: Amount,

    #[ts(type = "string")]
    pub total_amount: Amount,

    #[serde(alias = "soldItems")]
    pub items: Vec<SaleItemRequest>,
}

impl CheckoutRequest {
    /// Returns the header amounts.
    pub fn header(&self) -> SaleHeader {
        SaleHeader {
            subtotal: self.subtotal,
            tax: self.tax,
            total_amount: self.total_amount,
        }
    }
}

/// Sale header amounts, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleHeader {
    pub subtotal: Amount,
    pub tax: Amount,
    pub total_amount: Amount,
}

// =============================================================================
// Resolved Item
// =============================================================================

/// A cart line bound to an authoritative product.
///
/// `product_id` referred to an existing product when the line was resolved.
/// The product may be deleted afterwards; that race is tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub product_id: String,
    /// The catalog's code for the product at resolution time.
    pub product_code: String,
    pub name: String,
    pub quantity: i64,
    pub price: Amount,
}

impl ResolvedItem {
    /// Binds `request` to `product`.
    ///
    /// The request's display name wins unless it is blank, in which case
    /// the catalog name is used. Quantity and price always come from the
    /// request.
    pub fn bind(request: &SaleItemRequest, product: &Product) -> Self {
        let name = if request.name.trim().is_empty() {
            product.name.clone()
        } else {
            request.name.clone()
        };

        ResolvedItem {
            product_id: product.id.clone(),
            product_code: product.product_code.clone(),
            name,
            quantity: request.quantity,
            price: request.price,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale with its line items. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[ts(type = "string")]
    pub subtotal: Amount,

    #[ts(type = "string")]
    pub tax: Amount,

    #[ts(type = "string")]
    pub total_amount: Amount,

    /// Line items in cart order.
    pub sold_items: Vec<SoldItem>,
}

// =============================================================================
// Sold Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SoldItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product code at time of sale (frozen).
    pub product_code: String,
    /// Name at time of sale (frozen).
    pub name: String,
    #[ts(type = "number")]
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    #[ts(type = "string")]
    pub price: Amount,
}

// =============================================================================
// New Sale (write model)
// =============================================================================

/// A sale aggregate ready to be written in one unit.
///
/// Ids are allocated before the write so the whole aggregate can be
/// inserted in a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub id: String,
    pub date: DateTime<Utc>,
    pub header: SaleHeader,
    pub items: Vec<NewSoldItem>,
}

/// A line of a [`NewSale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSoldItem {
    pub id: String,
    pub product_id: String,
    pub product_code: String,
    pub name: String,
    pub quantity: i64,
    pub price: Amount,
}

// =============================================================================
// Unit Tests
// =============================================================================
