//! HTTP routes driven in-process through the full middleware stack.

use axum::Router;
use axum::body::Body;
use dapur_server::db::{repository, seed};
use dapur_server::{Config, ServerState, api::build_app};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: ServerState,
    customer_id: String,
    gudeg_id: String,
    _dir: TempDir,
}

async fn setup() -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    seed::seed_demo_data(&state.pool).await.unwrap();

    let customer_id = repository::user::find_by_email(&state.pool, "customer@example.com")
        .await
        .unwrap()
        .unwrap()
        .id;
    let gudeg_id = repository::menu_item::find_by_name(&state.pool, "Nasi Gudeg")
        .await
        .unwrap()
        .unwrap()
        .id;

    TestApp {
        router: build_app().with_state(state.clone()),
        state,
        customer_id,
        gudeg_id,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, http::HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    async fn send_json(&self, method: &str, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    async fn create(&self, payload: Value) -> (StatusCode, Value) {
        self.send_json("POST", "/api/orders", payload).await
    }

    async fn gudeg_stock(&self) -> i64 {
        repository::menu_item::find_by_id(&self.state.pool, &self.gudeg_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }
}

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let (status, headers, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let app = setup().await;

    let request = Request::builder().uri("/api/orders").body(Body::empty()).unwrap();
    let (status, headers, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    let id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("generated x-request-id");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");

    // Error responses get one too
    let request = Request::builder()
        .uri("/api/orders/does-not-exist")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = app.send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.contains_key("x-request-id"));

    // A caller-supplied id is kept
    let request = Request::builder()
        .uri("/api/orders/dashboard/stats")
        .header("x-request-id", "spa-42")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = app.send(request).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "spa-42");
}

#[tokio::test]
async fn test_create_order_success() {
    let app = setup().await;
    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "dine-in",
            "table_number": 5,
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 2 }]
        }))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], 0);
    let order = &body["data"]["order"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "pending");
    assert_eq!(order["payment_method"], "cash");
    assert_eq!(order["order_type"], "dine-in");
    assert_eq!(order["table_number"], "5");
    assert_eq!(order["total_amount"].as_f64(), Some(50000.0));
    let lines = body["data"]["order_items"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["menu_name"], "Nasi Gudeg");
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["unit_price"].as_f64(), Some(25000.0));
    assert_eq!(app.gudeg_stock().await, 8);

    // Readable back through the detail route
    let id = order["id"].as_str().unwrap();
    let (status, detail) = app.get(&format!("/api/orders/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["id"], id);
    assert_eq!(detail["data"]["customer_email"], "customer@example.com");
    assert_eq!(detail["data"]["order_items"][0]["menu_name"], "Nasi Gudeg");
}

#[tokio::test]
async fn test_insufficient_stock_is_400_with_details() {
    let app = setup().await;
    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "takeaway",
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 15 }]
        }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 6003);
    assert_eq!(body["details"]["kind"], "insufficient_stock");
    assert_eq!(body["details"]["menu_item_id"], app.gudeg_id.as_str());
    assert_eq!(body["details"]["available_stock"], 10);
    assert!(body["message"].as_str().unwrap().contains("Nasi Gudeg"));
    assert_eq!(app.gudeg_stock().await, 10);
}

#[tokio::test]
async fn test_rejections_carry_codes() {
    let app = setup().await;

    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "dine-in",
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 1 }]
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4008);
    assert_eq!(body["details"]["field"], "table_number");

    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "takeaway",
            "order_items": []
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4007);

    let (status, body) = app
        .create(json!({
            "customer_id": "ghost",
            "order_type": "takeaway",
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 1 }]
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8001);
    assert_eq!(body["details"]["entity"], "customer");

    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "takeaway",
            "order_items": [{ "menu_item_id": "missing-item", "quantity": 1 }]
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6001);
    assert!(body["message"].as_str().unwrap().contains("missing-item"));

    let (status, body) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "takeaway",
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 0 }]
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["field"], "quantity");

    let (_, stats) = app.get("/api/orders/dashboard/stats").await;
    assert_eq!(stats["data"]["total_orders"], 0);
    assert_eq!(app.gudeg_stock().await, 10);
}

#[tokio::test]
async fn test_malformed_body_gets_envelope() {
    let app = setup().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let app = setup().await;
    let (status, body) = app.get("/api/orders/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_status_update_and_listing() {
    let app = setup().await;
    let (_, created) = app
        .create(json!({
            "customer_id": app.customer_id,
            "order_type": "takeaway",
            "payment_method": "credit",
            "order_items": [{ "menu_item_id": app.gudeg_id, "quantity": 1 }]
        }))
        .await;
    let id = created["data"]["order"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/orders/{id}/status");

    let (status, body) = app
        .send_json("PUT", &uri, json!({ "status": "processing", "payment_status": "paid" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "processing");
    assert_eq!(body["data"]["payment_status"], "paid");

    // Skipping back is refused
    let (status, body) = app
        .send_json("PUT", &uri, json!({ "status": "pending" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4009);

    let (status, body) = app
        .send_json("PUT", &uri, json!({ "payment_status": "bogus" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5006);

    let (status, body) = app.get("/api/orders?status=processing").await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], id.as_str());
    assert_eq!(orders[0]["item_count"], 1);

    let (status, body) = app.get("/api/orders?status=lost").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (_, stats) = app.get("/api/orders/dashboard/stats").await;
    assert_eq!(stats["data"]["total_orders"], 1);
    assert_eq!(stats["data"]["total_revenue"].as_f64(), Some(25000.0));
    assert_eq!(stats["data"]["pending_orders"], 0);
    assert_eq!(stats["data"]["menu_items"], 6);
}
