//! HTTP contract tests against an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tally_api::{create_router, ApiConfig, AppState};
use tally_core::NewProduct;
use tally_db::{Database, DbConfig};

const ADMIN_TOKEN: &str = "test-admin-token";

async fn setup() -> (Router, Database, String) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let espresso = db
        .products()
        .insert(&NewProduct {
            product_code: "ESP-1001".to_string(),
            name: "Espresso".to_string(),
            price: "3.50".parse().unwrap(),
            stock_quantity: 10,
            image_url: None,
        })
        .await
        .unwrap();

    let config = ApiConfig {
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..ApiConfig::default()
    };
    (create_router(AppState::new(db.clone(), config)), db, espresso.id)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

async fn checkout(app: &Router) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/sales", Some(espresso_checkout()), None).await
}

fn latte(code: &str, name: &str, price: &str, stock: i64) -> Value {
    json!({ "productCode": code, "name": name, "price": price, "stockQuantity": stock })
}

fn espresso_checkout() -> Value {
    json!({
        "subtotal": "7.00",
        "tax": "0.70",
        "totalAmount": "7.70",
        "soldItems": [
            { "productCode": "ESP-1001", "name": "Espresso", "quantity": 2, "price": "3.50" }
        ]
    })
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_returns_created_sale() {
    let (app, db, espresso_id) = setup().await;

    let (status, body) = checkout(&app).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["subtotal"], "7.00");
    assert_eq!(body["tax"], "0.70");
    assert_eq!(body["totalAmount"], "7.70");
    assert_eq!(body["soldItems"].as_array().unwrap().len(), 1);
    assert_eq!(body["soldItems"][0]["productId"], espresso_id.as_str());
    assert_eq!(body["soldItems"][0]["quantity"], 2);
    assert_eq!(body["soldItems"][0]["price"], "3.50");

    let product = db.products().get_by_id(&espresso_id).await.unwrap().unwrap();
    assert_eq!(product.stock_quantity, 8);

    let sale_id = body["id"].as_str().unwrap();
    let (status, invoice) = get(&app, &format!("/api/sales/{sale_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice, body);
}

#[tokio::test]
async fn test_unresolvable_item_is_rejected_and_echoed() {
    let (app, db, espresso_id) = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "subtotal": "1.00", "tax": "0.00", "totalAmount": "1.00",
            "items": [
                { "productCode": "ESP-1001", "name": "Espresso", "quantity": 1, "price": "3.50" },
                {
                    "productId": "missing-id", "productCode": "missing-code",
                    "name": "Ghost", "quantity": 1, "price": "1.00"
                }
            ]
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
    assert_eq!(body["item"]["productId"], "missing-id");
    assert_eq!(body["item"]["productCode"], "missing-code");

    assert_eq!(db.sales().count().await.unwrap(), 0);
    let product = db.products().get_by_id(&espresso_id).await.unwrap().unwrap();
    assert_eq!(product.stock_quantity, 10);
}

#[tokio::test]
async fn test_malformed_carts_are_validation_errors() {
    let (app, _, _) = setup().await;

    let bodies = [
        json!({ "subtotal": "0", "tax": "0", "totalAmount": "0", "items": [] }),
        json!({ "subtotal": "1", "tax": "0", "totalAmount": "1",
                "items": [{ "productCode": "ESP-1001", "quantity": 0, "price": "1.00" }] }),
        // Floats are not accepted for money.
        json!({ "subtotal": 7.0, "tax": "0", "totalAmount": "7",
                "items": [{ "productCode": "ESP-1001", "quantity": 1, "price": "1.00" }] }),
        json!({ "subtotal": "1", "tax": "0", "totalAmount": "1",
                "items": [{ "productCode": "ESP-1001", "quantity": 1, "price": "-1.00" }] }),
    ];

    for body in bodies {
        let (status, response) = send(&app, Method::POST, "/api/sales", Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let (app, db, _) = setup().await;
    db.close().await;

    let (status, body) = checkout(&app).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "code": "DATABASE_ERROR", "message": "Failed to record sale" }));
}

// =============================================================================
// Sales history
// =============================================================================

#[tokio::test]
async fn test_sales_history() {
    let (app, _, _) = setup().await;

    for _ in 0..3 {
        let (status, _) = checkout(&app).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/api/sales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["soldItems"][0]["productCode"], "ESP-1001");

    let (_, body) = get(&app, "/api/sales?limit=2").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get(&app, "/api/sales?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = get(&app, "/api/sales/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_catalog_mutations_require_admin_token() {
    let (app, _, espresso_id) = setup().await;
    let new_latte = latte("LAT-2001", "Latte", "4.95", 5);

    let (status, body) =
        send(&app, Method::POST, "/api/products", Some(new_latte.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) =
        send(&app, Method::POST, "/api/products", Some(new_latte), Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let uri = format!("/api/products/{espresso_id}");
    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutations_refused_without_configured_token() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = create_router(AppState::new(db, ApiConfig::default()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(latte("LAT-2001", "Latte", "4.95", 5)),
        Some("anything"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_product_lifecycle() {
    let (app, _, _) = setup().await;
    let token = Some(ADMIN_TOKEN);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(latte("LAT-2001", "Latte", "4.950", 5)),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], "4.950");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(latte("LAT-2001", "Other", "1", 1)),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "price": "5.25" })),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "5.25");
    assert_eq!(updated["name"], "Latte");

    let (status, listed) = get(&app, "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let uri = format!("/api/products/{id}");
    let (status, body) = send(&app, Method::DELETE, &uri, None, token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let rename = Some(json!({ "name": "X" }));
    let (status, _) = send(&app, Method::PUT, "/api/products/missing", rename, token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sold_product_delete_conflicts() {
    let (app, _, espresso_id) = setup().await;

    let (status, _) = checkout(&app).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/products/{espresso_id}"),
        None,
        Some(ADMIN_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_health() {
    let (app, db, _) = setup().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);

    db.close().await;
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
