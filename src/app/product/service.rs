//! 商品仓储服务
//!
//! 只负责 ID 格式校验，其余校验由处理器完成；存储错误原样上抛。

use std::sync::Arc;

use super::model::{Product, ProductDraft, ProductId, ProductUpdate};
use crate::core::error::CoreError;
use crate::infrastructure::ProductStore;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// 校验 ID 格式，不检查记录是否存在
    pub fn product_id(&self, raw: &str) -> Result<ProductId, CoreError> {
        ProductId::parse(raw).map_err(|_| CoreError::InvalidProductId)
    }

    pub async fn ping(&self) -> Result<(), CoreError> {
        Ok(self.store.ping().await?)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, CoreError> {
        Ok(self.store.insert(draft).await?)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, CoreError> {
        Ok(self.store.find_by_id_and_update(id, update).await?)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, CoreError> {
        Ok(self.store.find_by_id_and_delete(id).await?)
    }
}
