//! 商品列表状态容器
//!
//! 持有当前商品列表，调用 [`ProductClient`] 并在服务端确认成功后同步本地列表：
//! 创建时追加，更新时按 ID 替换，删除时按 ID 移除。订阅者通过
//! [`CatalogState::subscribe`] 观察每一次变化。

use tokio::sync::watch;
use tracing::debug;

use super::gateway::{ClientError, Outcome, ProductClient};
use crate::app::product::model::{NewProduct, Product, ProductId, ProductUpdate};

pub struct CatalogState {
    client: ProductClient,
    products: watch::Sender<Vec<Product>>,
}

impl CatalogState {
    pub fn new(client: ProductClient) -> Self {
        let (products, _) = watch::channel(Vec::new());
        Self { client, products }
    }

    /// 当前商品列表的快照
    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.products.subscribe()
    }

    pub fn set_products(&self, products: Vec<Product>) {
        self.products.send_replace(products);
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Outcome<()>, ClientError> {
        let outcome = self.client.create(product).await?;
        if outcome.success {
            if let Some(created) = outcome.data.clone() {
                debug!("本地追加商品 {}", created.id);
                self.products.send_modify(|products| products.push(created));
            }
        }
        Ok(outcome.without_data())
    }

    pub async fn fetch_products(&self) -> Result<Outcome<()>, ClientError> {
        let outcome = self.client.fetch_all().await?;
        if outcome.success {
            let products = outcome.data.clone().unwrap_or_default();
            debug!("本地载入 {} 个商品", products.len());
            self.set_products(products);
        }
        Ok(outcome.without_data())
    }

    pub async fn update_product(
        &self,
        id: &str,
        product: &ProductUpdate,
    ) -> Result<Outcome<()>, ClientError> {
        let outcome = self.client.update(id, product).await?;
        if outcome.success {
            if let Some(updated) = outcome.data.clone() {
                self.products.send_modify(|products| {
                    for existing in products.iter_mut().filter(|p| p.id == updated.id) {
                        *existing = updated.clone();
                    }
                });
            }
        }
        Ok(outcome.without_data())
    }

    pub async fn delete_product(&self, id: &str) -> Result<Outcome<()>, ClientError> {
        let outcome = self.client.delete(id).await?;
        if outcome.success {
            if let Ok(id) = ProductId::parse(id) {
                self.products
                    .send_modify(|products| products.retain(|p| p.id != id));
            }
        }
        Ok(outcome.without_data())
    }
}
