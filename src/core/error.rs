//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::ApiResponse;
use crate::infrastructure::StoreError;

pub const FILL_ALL_FIELDS: &str = "Please fill all the fields";
pub const EMPTY_FIELDS: &str = "Product fields cannot be empty";
pub const INVALID_PRODUCT_ID: &str = "Invalid Product ID";
pub const SERVER_ERROR: &str = "Server Error";

/// 核心错误类型
///
/// 校验错误和 ID 错误在访问存储之前产生；存储错误只记录日志，
/// 客户端只会看到固定的 `Server Error`。
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{}", INVALID_PRODUCT_ID)]
    InvalidProductId,
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidProductId => StatusCode::NOT_FOUND,
            CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CoreError::BadRequest(msg) => *msg,
            CoreError::InvalidProductId => INVALID_PRODUCT_ID,
            CoreError::Storage(err) => {
                error!("存储操作失败: {}", err);
                SERVER_ERROR
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
