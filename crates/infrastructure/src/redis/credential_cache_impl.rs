//! 凭据缓存实现
//!
//! 成员镜像存成 member:{id} 的 hash。缓存不是权威来源，
//! 三个操作都幂等，统一走超时 + 有界重试。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CredentialCache, DomainError, DomainResult};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::retry::{with_retry, RetryPolicy};

/// Redis 凭据缓存
pub struct RedisCredentialCache {
    conn: ConnectionManager,
    retry: RetryPolicy,
}

impl RedisCredentialCache {
    /// 建立连接；连接断开后 ConnectionManager 会自动重连
    pub async fn connect(url: &str, retry: RetryPolicy) -> DomainResult<Self> {
        let client = redis::Client::open(url).map_err(map_redis_err)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(map_redis_err)?;
        Ok(Self { conn, retry })
    }

    fn member_key(member_id: &str) -> String {
        format!("member:{member_id}")
    }
}

fn map_redis_err(err: redis::RedisError) -> DomainError {
    DomainError::infrastructure(err.to_string())
}

#[async_trait]
impl CredentialCache for RedisCredentialCache {
    async fn exists(&self, member_id: &str) -> DomainResult<bool> {
        let key = Self::member_key(member_id);
        with_retry(&self.retry, || {
            let mut conn = self.conn.clone();
            let key = key.clone();
            async move { conn.exists::<_, bool>(&key).await.map_err(map_redis_err) }
        })
        .await
    }

    async fn save_member(
        &self,
        member_id: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let key = Self::member_key(member_id);
        let fields = [
            ("password_hash", password_hash.to_string()),
            ("created_at", created_at.to_rfc3339()),
        ];
        with_retry(&self.retry, || {
            let mut conn = self.conn.clone();
            let key = key.clone();
            let fields = fields.clone();
            async move {
                conn.hset_multiple::<_, _, _, ()>(&key, &fields)
                    .await
                    .map_err(map_redis_err)
            }
        })
        .await
    }

    async fn remove(&self, member_id: &str) -> DomainResult<()> {
        let key = Self::member_key(member_id);
        with_retry(&self.retry, || {
            let mut conn = self.conn.clone();
            let key = key.clone();
            async move { conn.del::<_, ()>(&key).await.map_err(map_redis_err) }
        })
        .await
    }
}
