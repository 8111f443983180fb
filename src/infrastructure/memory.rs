//! 进程内商品存储

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{ProductStore, StoreError};
use crate::app::product::model::{Product, ProductDraft, ProductId, ProductUpdate};

/// 基于 `Vec` 的内存存储，保持插入顺序
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let product = Product::from_draft(ProductId::new(), draft, Utc::now());
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id_and_update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            update.apply_to(product, Utc::now());
            product.clone()
        }))
    }

    async fn find_by_id_and_delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price,
            image: format!("http://img/{}.png", name),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_all_keeps_order() {
        let store = MemoryStore::new();
        let lamp = store.insert(draft("lamp", 19.99)).await.unwrap();
        let desk = store.insert(draft("desk", 120.0)).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![lamp, desk]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_record_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .find_by_id_and_update(ProductId::new(), ProductUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let lamp = store.insert(draft("lamp", 19.99)).await.unwrap();

        let updated = store
            .find_by_id_and_update(
                lamp.id,
                ProductUpdate {
                    name: Some("reading lamp".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "reading lamp");
        assert_eq!(updated.price, 19.99);

        let deleted = store.find_by_id_and_delete(lamp.id).await.unwrap();
        assert_eq!(deleted.map(|p| p.id), Some(lamp.id));
        assert!(store.is_empty().await);
        assert!(store
            .find_by_id_and_delete(lamp.id)
            .await
            .unwrap()
            .is_none());
    }
}
