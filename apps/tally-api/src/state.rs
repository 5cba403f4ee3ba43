//! Shared application state.

use std::sync::Arc;

use tally_checkout::SaleProcessor;
use tally_db::{Database, ProductRepository, SaleRepository};

use crate::config::ApiConfig;

/// The processor type the server runs: SQLite on both sides.
pub type SqliteSaleProcessor = SaleProcessor<ProductRepository, SaleRepository>;

/// State handed to every handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    db: Database,
    processor: SqliteSaleProcessor,
    config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let processor = SaleProcessor::new(db.products(), db.sales());
        AppState {
            inner: Arc::new(Inner {
                db,
                processor,
                config,
            }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn processor(&self) -> &SqliteSaleProcessor {
        &self.inner.processor
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.inner.config.admin_token.as_deref()
    }
}
