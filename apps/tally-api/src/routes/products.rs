//! Catalog handlers. Mutations require [`AdminGuard`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tally_core::validation::{validate_new_product, validate_product_update};
use tally_core::{CoreError, NewProduct, Product, ProductUpdate};
use tracing::info;

use crate::auth::AdminGuard;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// `GET /api/products`
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db().products().list().await?))
}

/// `GET /api/products/:id`
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .db()
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::ProductNotFound(id).into())
}

/// `POST /api/products`
pub async fn create_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(mut new) = payload?;
    new.product_code = new.product_code.trim().to_string();
    new.name = new.name.trim().to_string();
    validate_new_product(&new)?;

    let product = state.db().products().insert(&new).await?;
    info!(product_id = %product.id, product_code = %product.product_code, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/:id`
pub async fn update_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(mut update) = payload?;
    update.product_code = update.product_code.map(|c| c.trim().to_string());
    update.name = update.name.map(|n| n.trim().to_string());
    validate_product_update(&update)?;

    let product = state.db().products().update(&id, &update).await?;
    info!(product_id = %product.id, "Product updated");

    Ok(Json(product))
}

/// `DELETE /api/products/:id`
pub async fn delete_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.db().products().delete(&id).await?;
    info!(product_id = %id, "Product deleted");

    Ok(Json(DeleteResponse { ok: true }))
}
