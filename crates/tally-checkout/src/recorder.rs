//! # Sale Recorder
//!
//! Persists one sale aggregate and returns it as the store now holds it.
//!
//! Header amounts are recorded exactly as the caller supplied them. They
//! are not recomputed from the lines.

use chrono::Utc;
use tally_core::{CoreError, NewSale, NewSoldItem, ResolvedItem, Sale, SaleHeader, SaleLedger};
use uuid::Uuid;

use crate::error::{CheckoutError, CheckoutResult};

/// Allocates the sale id, line ids and timestamp for a set of resolved lines.
pub fn build_sale(header: SaleHeader, items: &[ResolvedItem]) -> NewSale {
    NewSale {
        id: Uuid::new_v4().to_string(),
        date: Utc::now(),
        header,
        items: items
            .iter()
            .map(|item| NewSoldItem {
                id: Uuid::new_v4().to_string(),
                product_id: item.product_id.clone(),
                product_code: item.product_code.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
    }
}

/// Records a sale for `items` through `ledger`.
///
/// ## Errors
/// * `CheckoutError::Invalid(CoreError::EmptyCart)` - `items` is empty
/// * `CheckoutError::Recording` - the write failed; nothing is persisted
pub async fn record_sale<L>(
    ledger: &L,
    header: SaleHeader,
    items: &[ResolvedItem],
) -> CheckoutResult<Sale>
where
    L: SaleLedger + ?Sized,
{
    if items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let sale = build_sale(header, items);
    ledger
        .insert_sale(&sale)
        .await
        .map_err(CheckoutError::Recording)
}
