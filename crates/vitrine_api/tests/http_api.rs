use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use vitrine_api::{build_router, AppState};
use vitrine_core::db::open_db_in_memory;
use vitrine_core::{GatewayError, GatewayResult, ProductId, RecommendationGateway};

struct FixedGateway {
    ids: Vec<ProductId>,
}

impl RecommendationGateway for FixedGateway {
    fn recommend(&self, _features: &[f64], count: usize) -> GatewayResult<Vec<ProductId>> {
        let take = count.min(self.ids.len());
        Ok(self.ids[..take].to_vec())
    }
}

struct UnreachableGateway;

impl RecommendationGateway for UnreachableGateway {
    fn recommend(&self, _features: &[f64], _count: usize) -> GatewayResult<Vec<ProductId>> {
        Err(GatewayError::UpstreamStatus(503))
    }
}

fn app() -> Router {
    app_with_gateway(FixedGateway { ids: Vec::new() })
}

fn app_with_gateway(gateway: impl RecommendationGateway + Send + Sync + 'static) -> Router {
    let conn = open_db_in_memory().unwrap();
    build_router(Arc::new(AppState::new(conn, gateway)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_product(app: &Router, name: &str, price_cents: i64) -> Uuid {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/products",
            json!({
                "name": name,
                "description": "",
                "price_cents": price_cents,
                "image_ref": "img/item.png",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["uuid"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn product_lifecycle_roundtrips() {
    let app = app();
    let id = create_product(&app, "Mug", 999).await;

    let (status, body) = send(&app, get(&format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mug");
    assert_eq!(body["price_cents"], 999);

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/products/{id}"),
            json!({"price_cents": 1099, "model_ref": "assets/mug.glb"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 1099);
    assert_eq!(body["model_ref"], "assets/mug.glb");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/products/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, body) = send(&app, get("/products?include_deleted=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_validation_failures_map_to_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/products",
            json!({"name": "", "price_cents": 100, "image_ref": "img/x.png"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/products",
            json!({"name": "Lamp", "price_cents": -5, "image_ref": "img/lamp.png"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn order_flow_matches_the_storefront_example() {
    let app = app();
    let product_id = create_product(&app, "Mug", 999).await;
    let purchaser = Uuid::new_v4();

    let mut request = json_request(
        "POST",
        "/orders",
        json!({"product_id": product_id, "quantity": 3}),
    );
    request
        .headers_mut()
        .insert("x-purchaser-id", purchaser.to_string().parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["purchaser"], purchaser.to_string());
    let order_id = Uuid::parse_str(body["uuid"].as_str().unwrap()).unwrap();

    let (status, body) = send(&app, get(&format!("/orders/{order_id}/total"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_cents"], 2997);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/orders/{order_id}/status"),
            json!({"status": "confirmed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/orders/{order_id}/status"),
            json!({"status": "pending"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_transition");
}

#[tokio::test]
async fn order_creation_requires_purchaser_identity() {
    let app = app();
    let product_id = create_product(&app, "Mug", 999).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            json!({"product_id": product_id, "quantity": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn order_creation_validates_quantity_and_product() {
    let app = app();
    let product_id = create_product(&app, "Mug", 999).await;
    let purchaser = Uuid::new_v4().to_string();

    let mut request = json_request(
        "POST",
        "/orders",
        json!({"product_id": product_id, "quantity": 0}),
    );
    request
        .headers_mut()
        .insert("x-purchaser-id", purchaser.parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let mut request = json_request(
        "POST",
        "/orders",
        json!({"product_id": Uuid::new_v4(), "quantity": 1}),
    );
    request
        .headers_mut()
        .insert("x-purchaser-id", purchaser.parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn order_listing_filters_by_purchaser_and_status() {
    let app = app();
    let product_id = create_product(&app, "Mug", 999).await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for purchaser in [alice, bob] {
        let mut request = json_request(
            "POST",
            "/orders",
            json!({"product_id": product_id, "quantity": 1}),
        );
        request
            .headers_mut()
            .insert("x-purchaser-id", purchaser.to_string().parse().unwrap());
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get(&format!("/orders?purchaser_id={alice}"))).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["purchaser"], alice.to_string());

    let (status, body) = send(&app, get("/orders?status=pending")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/orders?status=misplaced")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn recommendations_pass_through_upstream_ordering() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let third = Uuid::new_v4();
    let app = app_with_gateway(FixedGateway {
        ids: vec![first, second, third],
    });

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/recommendations",
            json!({"features": [0.4, 0.1, 0.9], "count": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["product_ids"],
        json!([first.to_string(), second.to_string()])
    );
}

#[tokio::test]
async fn recommendation_count_bounds_are_rejected_before_the_gateway() {
    let app = app();

    for count in [0, 101] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/recommendations",
                json!({"features": [0.5], "count": count}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
    }
}

#[tokio::test]
async fn gateway_failures_map_to_bad_gateway() {
    let app = app_with_gateway(UnreachableGateway);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/recommendations",
            json!({"features": [0.5], "count": 5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "upstream_error");
}
