use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use entregador::adapters::{LogNotificationSender, MemoryDeliveryStore, MemoryResidentDirectory};
use entregador::domain::ports::DeliveryStore;
use entregador::http::{router, AppState};
use entregador::{
    AppConfig, Delivery, DeliveryRegistration, EntregadorError, RequestContext, Result,
};
use std::sync::Arc;
use tower::ServiceExt;

struct FailingStore;

#[async_trait]
impl DeliveryStore for FailingStore {
    async fn create(&self, _ctx: &RequestContext, _delivery: &Delivery) -> Result<Delivery> {
        Err(EntregadorError::StoreError {
            message: "connection reset".to_string(),
        })
    }
}

fn app_with_store(store: Arc<dyn DeliveryStore>) -> axum::Router {
    let registration = DeliveryRegistration::new(
        store,
        Arc::new(MemoryResidentDirectory::new()),
        Arc::new(LogNotificationSender),
    );
    router(AppState::new(registration, &AppConfig::default()))
}

async fn post_json(app: axum::Router, body: String) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/entregador")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-123")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_create_delivery_returns_created() {
    let store = Arc::new(MemoryDeliveryStore::new());
    let app = app_with_store(store.clone());

    let (status, body) = post_json(
        app,
        serde_json::json!({
            "apartment_number": "101",
            "package_type": "Envelope",
            "urgency": "normal"
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Entrega registrada com sucesso");
    let id = body["id"].as_str().unwrap();
    let stored = store.get(id).await.unwrap();
    assert_eq!(stored.status, "pending");
    assert_eq!(stored.package_type, "Envelope");
}

#[tokio::test]
async fn test_create_delivery_accepts_original_field_names() {
    let store = Arc::new(MemoryDeliveryStore::new());
    let app = app_with_store(store.clone());

    let (status, _) = post_json(
        app,
        r#"{"ApNum": "202", "PackageType": "Box", "Urgency": "high", "Status": "received"}"#
            .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let store = Arc::new(MemoryDeliveryStore::new());
    let app = app_with_store(store.clone());

    let (status, body) = post_json(app, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_blank_apartment_is_bad_request() {
    let store = Arc::new(MemoryDeliveryStore::new());
    let app = app_with_store(store.clone());

    let (status, body) = post_json(
        app,
        serde_json::json!({"apartment_number": "  ", "package_type": "Box"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("apartment_number is required"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_persistence_failure_is_internal_error() {
    let app = app_with_store(Arc::new(FailingStore));

    let (status, body) = post_json(
        app,
        serde_json::json!({"apartment_number": "101", "package_type": "Box"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("falha ao registrar entrega"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app_with_store(Arc::new(MemoryDeliveryStore::new()));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/entregador")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-echo")
        .body(Body::from(r#"{"apartment_number": "101"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("req-echo")
    );
}

#[tokio::test]
async fn test_health() {
    let app = app_with_store(Arc::new(MemoryDeliveryStore::new()));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "up");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
