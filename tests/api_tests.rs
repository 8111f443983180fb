use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog::{
    app,
    config::HttpConfig,
    infrastructure::{MemoryStore, ProductStore, StoreError},
    AppState, Product, ProductId, ProductService,
};
use catalog::app::product::model::{ProductDraft, ProductUpdate};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

fn app_with(store: Arc<dyn ProductStore>) -> Router {
    app::router(
        AppState::new(ProductService::new(store)),
        &HttpConfig::default(),
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/products", Some(body)).await
}

async fn list(app: &Router) -> Vec<Product> {
    let (status, body) = send(app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    serde_json::from_value(body["data"].clone()).unwrap()
}

/// 记录调用次数的存储包装
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        self.hit();
        self.inner.find_all().await
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        self.hit();
        self.inner.insert(draft).await
    }

    async fn find_by_id_and_update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        self.hit();
        self.inner.find_by_id_and_update(id, update).await
    }

    async fn find_by_id_and_delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.hit();
        self.inner.find_by_id_and_delete(id).await
    }
}

/// 所有操作都失败的存储
struct BrokenStore;

#[async_trait]
impl ProductStore for BrokenStore {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn insert(&self, _draft: ProductDraft) -> Result<Product, StoreError> {
        Err(StoreError::Query("duplicate key".to_string()))
    }

    async fn find_by_id_and_update(
        &self,
        _id: ProductId,
        _update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Query("timeout".to_string()))
    }

    async fn find_by_id_and_delete(&self, _id: ProductId) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Query("timeout".to_string()))
    }
}

#[tokio::test]
async fn test_create_returns_created_product() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (status, body) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Desk Lamp");
    assert_eq!(body["data"]["price"], 19.99);
    assert_eq!(body["data"]["image"], "http://x/img.png");
    let id = body["data"]["_id"].as_str().unwrap();
    assert!(ProductId::is_valid(id));
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (_, first) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;
    let (_, second) = create(
        &app,
        json!({"name": "Chair", "price": 45, "image": "http://x/chair.png"}),
    )
    .await;

    let products = list(&app).await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.to_string(), first["data"]["_id"]);
    assert_eq!(products[0].name, "Desk Lamp");
    assert_eq!(products[0].price, 19.99);
    assert_eq!(products[1].id.to_string(), second["data"]["_id"]);
    assert_eq!(products[1].price, 45.0);
}

#[tokio::test]
async fn test_create_with_missing_fields_writes_nothing() {
    let store = Arc::new(CountingStore::new());
    let app = app_with(store.clone());

    let invalid = [
        json!({"name": "", "price": 5, "image": "http://x"}),
        json!({"price": 5, "image": "http://x"}),
        json!({"name": "Lamp", "image": "http://x"}),
        json!({"name": "Lamp", "price": 0, "image": "http://x"}),
        json!({"name": "Lamp", "price": 5, "image": ""}),
        json!({"name": "Lamp", "price": "cheap", "image": "http://x"}),
        json!({}),
    ];

    for body in invalid {
        let (status, response) = create(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({"success": false, "message": "Please fill all the fields"})
        );
    }

    assert_eq!(store.calls(), 0);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_create_without_json_body_is_rejected() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, Method::POST, "/api/products", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please fill all the fields");
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (_, created) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({"price": 24.5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["_id"], id);
    assert_eq!(body["data"]["name"], "Desk Lamp");
    assert_eq!(body["data"]["price"], 24.5);
    assert_eq!(body["data"]["image"], "http://x/img.png");

    let products = list(&app).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, 24.5);
}

#[tokio::test]
async fn test_update_unknown_id_returns_null_data() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/products/507f1f77bcf86cd799439011",
        Some(json!({"name": "Ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null}));
}

#[tokio::test]
async fn test_update_with_empty_field_is_rejected() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (_, created) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({"name": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(list(&app).await[0].name, "Desk Lamp");
}

#[tokio::test]
async fn test_malformed_id_never_reaches_storage() {
    let store = Arc::new(CountingStore::new());
    let app = app_with(store.clone());

    let (status, body) = send(&app, Method::DELETE, "/api/products/not-a-valid-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Invalid Product ID"}));

    // ID 校验先于请求体校验
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/products/12345",
        Some(json!({"name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid Product ID");

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_undecodable_id_is_invalid_product_id() {
    let store = Arc::new(CountingStore::new());
    let app = app_with(store.clone());

    let (status, body) = send(&app, Method::DELETE, "/api/products/%FF", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Invalid Product ID"}));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/products/%FF",
        Some(json!({"name": "Lamp"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Invalid Product ID"}));

    // 编码后的斜杠仍是一个路径段
    let (status, body) = send(&app, Method::DELETE, "/api/products/a%2Fb", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid Product ID");

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_delete_removes_product() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (_, created) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Product deleted successfully"})
    );
    assert!(list(&app).await.is_empty());

    // 再次删除同一个 ID 仍然成功
    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_storage_failures_map_to_server_error() {
    let app = app_with(Arc::new(BrokenStore));
    let expected = json!({"success": false, "message": "Server Error"});

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, body) = create(
        &app,
        json!({"name": "Desk Lamp", "price": 19.99, "image": "http://x/img.png"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let uri = "/api/products/507f1f77bcf86cd799439011";
    let (status, body) = send(&app, Method::PUT, uri, Some(json!({"price": 3}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, body) = send(&app, Method::DELETE, uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_check() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}
