//! 商品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};
use validator::Validate;

use super::{
    model::{NewProduct, Product, ProductUpdate},
    service::ProductService,
};
use crate::core::{
    error::{CoreError, EMPTY_FIELDS, FILL_ALL_FIELDS},
    response::ApiResponse,
};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self { product_service }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let products = state.product_service.list_products().await?;
    debug!("返回 {} 个商品", products.len());
    Ok(Json(ApiResponse::success(products)))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let Json(payload) = payload.map_err(|_| CoreError::BadRequest(FILL_ALL_FIELDS))?;
    let draft = payload
        .validated()
        .map_err(|_| CoreError::BadRequest(FILL_ALL_FIELDS))?;

    let product = state.product_service.create_product(draft).await?;
    info!("创建商品: {} ({})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// 路径参数无法解码（如非 UTF-8）同样视为无效 ID
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, CoreError> {
    let Path(id) = path.map_err(|_| CoreError::InvalidProductId)?;
    Ok(id)
}

/// 更新商品：先校验 ID，再校验请求体
///
/// 记录不存在时返回 200 且 `data` 为 `null`。
pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Option<Product>>>, CoreError> {
    let id = state.product_service.product_id(&path_id(path)?)?;
    let Json(update) = payload.map_err(|_| CoreError::BadRequest(EMPTY_FIELDS))?;
    update
        .validate()
        .map_err(|_| CoreError::BadRequest(EMPTY_FIELDS))?;

    let product = state.product_service.update_product(id, update).await?;
    match &product {
        Some(product) => info!("更新商品: {} ({})", product.name, product.id),
        None => info!("更新商品: {} 不存在", id),
    }

    Ok(Json(ApiResponse::success(product)))
}

/// 删除商品，记录是否存在都返回成功
pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, CoreError> {
    let id = state.product_service.product_id(&path_id(path)?)?;
    let deleted = state.product_service.delete_product(id).await?;
    info!("删除商品: {} (存在: {})", id, deleted.is_some());

    Ok(Json(ApiResponse::message("Product deleted successfully")))
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, CoreError> {
    state.product_service.ping().await?;

    Ok(Json(json!({
        "status": "healthy",
        "store": state.product_service.backend(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
