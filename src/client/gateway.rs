//! 商品接口客户端
//!
//! 每个操作发出一次请求，并把服务端信封归一化为 [`Outcome`]。
//! 传输层失败（连接、超时、读取响应体）返回 [`ClientError`]，不会伪装成信封；
//! 收到响应但响应体不是信封时，按失败结果返回 HTTP 状态描述。

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::app::product::model::{NewProduct, Product, ProductUpdate};
use crate::app::PRODUCTS_PATH;
use crate::config::ClientConfig;
use crate::core::response::ApiResponse;

pub const FILL_IN_ALL_FIELDS: &str = "Please fill in all fields";
pub const PRODUCT_CREATED: &str = "Product created successfully";

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("无效的服务端地址: {0}")]
    InvalidBaseUrl(String),
}

/// 归一化后的操作结果
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(message: Option<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }

    pub fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
            data: None,
        }
    }

    /// 丢弃数据，只保留成功标志和消息
    pub fn without_data(self) -> Outcome<()> {
        Outcome {
            success: self.success,
            message: self.message,
            data: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductClient {
    http: Client,
    base_url: Url,
}

impl ProductClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("catalog-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self { http, base_url })
    }

    /// 商品集合地址，`id` 作为单独的路径段追加并做百分号编码
    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(PRODUCTS_PATH.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiResponse<T>, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            Ok(envelope) => {
                debug!("响应 {}: success={}", status, envelope.success);
                Ok(envelope)
            }
            Err(e) => {
                debug!("响应 {} 不是信封: {}", status, e);
                Ok(ApiResponse::failure(
                    status.canonical_reason().unwrap_or("Unexpected Response"),
                ))
            }
        }
    }

    /// 创建商品；缺少字段时不发请求
    pub async fn create(&self, product: &NewProduct) -> Result<Outcome<Product>, ClientError> {
        if product.clone().validated().is_err() {
            return Ok(Outcome::failed(Some(FILL_IN_ALL_FIELDS.to_string())));
        }

        let response = self
            .http
            .post(self.endpoint(None))
            .json(product)
            .send()
            .await?;
        let envelope = Self::envelope::<Product>(response).await?;

        if !envelope.success {
            return Ok(Outcome::failed(envelope.message));
        }
        Ok(Outcome::ok(Some(PRODUCT_CREATED.to_string()), envelope.data))
    }

    pub async fn fetch_all(&self) -> Result<Outcome<Vec<Product>>, ClientError> {
        let response = self.http.get(self.endpoint(None)).send().await?;
        let envelope = Self::envelope::<Vec<Product>>(response).await?;

        if !envelope.success {
            return Ok(Outcome::failed(envelope.message));
        }
        Ok(Outcome::ok(
            envelope.message,
            Some(envelope.data.unwrap_or_default()),
        ))
    }

    /// 更新商品；服务端找不到记录时 `data` 为 `None`
    pub async fn update(
        &self,
        id: &str,
        product: &ProductUpdate,
    ) -> Result<Outcome<Product>, ClientError> {
        let response = self.http.put(self.endpoint(Some(id))).json(product).send().await?;
        let envelope = Self::envelope::<Product>(response).await?;

        if !envelope.success {
            return Ok(Outcome::failed(envelope.message));
        }
        Ok(Outcome::ok(envelope.message, envelope.data))
    }

    pub async fn delete(&self, id: &str) -> Result<Outcome<()>, ClientError> {
        let response = self.http.delete(self.endpoint(Some(id))).send().await?;
        let envelope = Self::envelope::<serde_json::Value>(response).await?;

        if !envelope.success {
            return Ok(Outcome::failed(envelope.message));
        }
        Ok(Outcome::ok(envelope.message, None))
    }
}
