//! 商品存储抽象

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::memory::MemoryStore;
use crate::app::product::model::{Product, ProductDraft, ProductId, ProductUpdate};
use crate::config::{StoreBackend, StoreConfig};

/// 存储层错误，原样向上传播，不做重试
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("存储连接失败: {0}")]
    Connection(String),
    #[error("存储操作失败: {0}")]
    Query(String),
    #[error("存储数据损坏: {0}")]
    Corrupted(String),
}

/// 商品记录存储
///
/// 按 ID 的操作都接收已经通过格式校验的 [`ProductId`]。
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 后端名称，用于日志和健康检查
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    /// 按创建顺序返回全部商品
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// 写入新商品，分配 ID 和时间戳
    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// 更新已提供的字段，返回更新后的记录；记录不存在时返回 `None`
    async fn find_by_id_and_update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError>;

    /// 删除并返回被删除的记录；记录不存在时返回 `None`
    async fn find_by_id_and_delete(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}

/// 按配置创建存储后端
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("使用内存存储");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => connect_postgres(config).await,
    }
}

#[cfg(feature = "database")]
async fn connect_postgres(config: &StoreConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::Connection("未配置 database_url".to_string()))?;
    let store = super::database::PgProductStore::connect(url, config.max_connections).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "database"))]
async fn connect_postgres(_config: &StoreConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    Err(StoreError::Connection(
        "postgres 后端需要启用 database 特性".to_string(),
    ))
}
