//! # Product Resolver
//!
//! Maps a cart line to the product it refers to.
//!
//! ```text
//!   productId present? ──yes──► find_by_id ──found──► Resolved
//!         │                          │
//!         no                     not found (stale)
//!         │                          │
//!         ▼                          ▼
//!   productCode present? ──yes──► find_by_code ──found──► Resolved
//!         │                          │
//!         no                     not found
//!         ▼                          ▼
//!    Unresolvable               Unresolvable
//! ```
//!
//! A blank reference counts as absent. An id that resolves always wins,
//! even when the code names a different product.

use tally_core::{ProductCatalog, ResolvedItem, SaleItemRequest, StoreResult};
use tracing::debug;

use crate::error::{CheckoutError, CheckoutResult};

/// Outcome of resolving one line. Unresolvable is a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedItem),
    Unresolvable(SaleItemRequest),
}

/// Resolves one line against the catalog. Read-only.
pub async fn resolve<C>(catalog: &C, item: &SaleItemRequest) -> StoreResult<Resolution>
where
    C: ProductCatalog + ?Sized,
{
    if let Some(id) = present(&item.product_id) {
        if let Some(product) = catalog.find_by_id(id).await? {
            return Ok(Resolution::Resolved(ResolvedItem::bind(item, &product)));
        }
        debug!(product_id = %id, "Product id is stale, falling back to code");
    }

    if let Some(code) = present(&item.product_code) {
        if let Some(product) = catalog.find_by_code(code).await? {
            return Ok(Resolution::Resolved(ResolvedItem::bind(item, &product)));
        }
    }

    Ok(Resolution::Unresolvable(item.clone()))
}

/// Resolves every line in cart order.
///
/// Stops at the first unresolvable line and returns it in
/// `CheckoutError::Unresolvable`. A lookup failure is `CheckoutError::Lookup`.
pub async fn resolve_all<C>(
    catalog: &C,
    items: &[SaleItemRequest],
) -> CheckoutResult<Vec<ResolvedItem>>
where
    C: ProductCatalog + ?Sized,
{
    let mut resolved = Vec::with_capacity(items.len());

    for item in items {
        match resolve(catalog, item).await.map_err(CheckoutError::Lookup)? {
            Resolution::Resolved(r) => resolved.push(r),
            Resolution::Unresolvable(item) => return Err(CheckoutError::Unresolvable { item }),
        }
    }

    Ok(resolved)
}

fn present(reference: &Option<String>) -> Option<&str> {
    reference.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
