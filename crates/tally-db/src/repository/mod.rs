//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler / SaleProcessor                                          │
//! │       │                                                                 │
//! │       │  db.products().get_by_code("ESP-1001")                         │
//! │       ▼                                                                 │
//! │  ProductRepository                  SaleRepository                     │
//! │  ├── list / get_by_id / get_by_code ├── insert_sale (one transaction)  │
//! │  ├── insert / update / delete       ├── get_by_id                      │
//! │  └── adjust_stock                   └── list_recent                    │
//! │       │                                   │                             │
//! │       │  SQL (runtime-checked queries)    │                             │
//! │       ▼                                   ▼                             │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Both also implement the tally-core store traits, so the checkout      │
//! │  pipeline never sees SQL.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Column Encoding
//! - Money is TEXT holding the exact decimal string. It is parsed back with
//!   [`parse_amount`], which keeps the stored scale.
//! - Timestamps are TEXT in RFC 3339, UTC, fixed microsecond precision, so
//!   lexical order is chronological order.

pub mod product;
pub mod sale;

use chrono::{DateTime, SecondsFormat, Utc};
use tally_core::Amount;

use crate::error::{DbError, DbResult};

/// Parses a money column.
pub(crate) fn parse_amount(column: &str, raw: &str) -> DbResult<Amount> {
    raw.parse().map_err(|e: tally_core::ValidationError| DbError::Decode {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a timestamp for storage.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_amount_keeps_scale() {
        assert_eq!(parse_amount("price", "3.50").unwrap().to_string(), "3.50");
        assert!(matches!(
            parse_amount("price", "3,50"),
            Err(DbError::Decode { column, .. }) if column == "price"
        ));
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        assert_eq!(timestamp(a), "2026-03-01T09:00:00.000000Z");
        assert!(timestamp(a) < timestamp(b));
    }
}
