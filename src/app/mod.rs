//! 应用层

pub mod product;

use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HttpConfig;
use crate::core::middleware::request_logging_middleware;
use product::handler::{self, AppState};

/// 商品接口的挂载路径
pub const PRODUCTS_PATH: &str = "/api/products";

/// 组装完整的路由与中间件
pub fn router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(handler::health_check))
        .nest(PRODUCTS_PATH, product::routes())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_seconds)))
        .with_state(state)
}
