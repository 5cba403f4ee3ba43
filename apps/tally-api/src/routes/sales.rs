//! Checkout and sales history handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tally_core::{CheckoutRequest, CoreError, Sale};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on `?limit=`.
const MAX_SALES_PAGE: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub limit: Option<u32>,
}

/// `POST /api/sales`
pub async fn create_sale_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let Json(request) = payload?;

    let outcome = state.processor().process(&request).await?;

    if !outcome.reconciliation.is_clean() {
        debug!(
            sale_id = %outcome.sale.id,
            failed = outcome.reconciliation.failures().count(),
            "Responding with sale despite stock reconciliation failures"
        );
    }

    Ok((StatusCode::CREATED, Json(outcome.sale)))
}

/// `GET /api/sales`
pub async fn list_sales_handler(
    State(state): State<AppState>,
    query: Result<Query<ListSalesQuery>, QueryRejection>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(state.config().sales_page_limit)
        .clamp(1, MAX_SALES_PAGE);

    let sales = state.db().sales().list_recent(limit).await?;
    Ok(Json(sales))
}

/// `GET /api/sales/:id`
pub async fn get_sale_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    state
        .db()
        .sales()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::SaleNotFound(id).into())
}
