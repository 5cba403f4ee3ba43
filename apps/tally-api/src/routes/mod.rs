//! # Routes
//!
//! ```text
//! GET    /health                  liveness + database check
//!
//! POST   /api/sales               checkout
//! GET    /api/sales?limit=N       recent sales, newest first
//! GET    /api/sales/:id           one sale (invoice)
//!
//! GET    /api/products            catalog, newest first
//! GET    /api/products/:id        one product
//! POST   /api/products            create        (admin)
//! PUT    /api/products/:id        partial update (admin)
//! DELETE /api/products/:id        delete        (admin)
//! ```

pub mod health;
pub mod products;
pub mod sales;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/sales",
            get(sales::list_sales_handler).post(sales::create_sale_handler),
        )
        .route("/api/sales/:id", get(sales::get_sale_handler))
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
