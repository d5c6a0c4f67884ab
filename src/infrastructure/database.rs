//! 数据库基础设施

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::DatabaseConfig;
use crate::app::product::model::Product;
use crate::core::error::StoreError;
use crate::core::repository::EntityStore;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let database_url = config
            .url
            .as_deref()
            .ok_or_else(|| sqlx::Error::Configuration("缺少 database.url".into()))?;

        info!("Connecting to database: {}", redact(database_url));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    // 创建表（在实际应用中应该使用迁移）
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database tables ready");
        Ok(())
    }
}

/// 隐藏连接串中的密码
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

/// 基于 PostgreSQL 的产品存储
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Product> for PgProductStore {
    async fn list(&self, cancel: &CancellationToken) -> Result<Vec<Product>, StoreError> {
        let query = sqlx::query_as::<_, Product>(
            "SELECT id, name, description FROM products ORDER BY id",
        );

        tokio::select! {
            _ = cancel.cancelled() => Err(StoreError::Cancelled),
            rows = query.fetch_all(&self.pool) => Ok(rows?),
        }
    }

    async fn find_by_key(&self, id: i32) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert(&self, item: Product) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&item.name)
        .bind(&item.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, item: &Product) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE products SET name = $1, description = $2 WHERE id = $3")
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Concurrency(item.id));
        }
        Ok(())
    }

    async fn remove(&self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
