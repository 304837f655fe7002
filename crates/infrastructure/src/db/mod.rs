//! PostgreSQL 连接与 Repository 实现

pub mod repositories;

pub use repositories::*;

use std::time::Duration;

use config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// 创建 PostgreSQL 连接池
pub async fn create_pg_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
}
