//! 商品模块：`/api/products` 下的四个 CRUD 接口

pub mod handler;
pub mod model;
pub mod service;

use axum::{
    routing::{get, put},
    Router,
};

use handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_products).post(handler::create_product))
        .route(
            "/:id",
            put(handler::update_product).delete(handler::delete_product),
        )
}
