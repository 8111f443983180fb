//! PostgreSQL 商品存储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use super::store::{ProductStore, StoreError};
use crate::app::product::model::{Product, ProductDraft, ProductId, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, name, price, image, created_at, updated_at";

pub struct PgProductStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = ProductId::parse(&row.id).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        Ok(Product {
            id,
            name: row.name,
            price: row.price,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl PgProductStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!(
            "连接数据库: {}",
            database_url.split('@').last().unwrap_or(database_url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY CHECK (char_length(id) = 24),
                name TEXT NOT NULL CHECK (name <> ''),
                price DOUBLE PRECISION NOT NULL CHECK (price <> 0),
                image TEXT NOT NULL CHECK (image <> ''),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("products 表已就绪");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY created_at, id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let id = ProductId::new();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (id, name, price, image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id.to_string())
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id_and_update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                price = COALESCE($3, price), \
                image = COALESCE($4, image), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id.to_string())
        .bind(update.name)
        .bind(update.price)
        .bind(update.image)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_by_id_and_delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }
}
