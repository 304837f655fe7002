//! 凭据缓存接口定义

use crate::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 凭据缓存接口
///
/// 低延迟的二级索引，只用于加速重复注册检查。
/// 非权威、尽力而为：可能落后于持久库，写入失败不应
/// 影响持久库的写入结果。
#[async_trait]
pub trait CredentialCache: Send + Sync {
    /// 成员 ID 是否在缓存中
    async fn exists(&self, member_id: &str) -> DomainResult<bool>;

    /// 写入成员镜像（幂等）
    async fn save_member(
        &self,
        member_id: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// 移除成员镜像（幂等）
    async fn remove(&self, member_id: &str) -> DomainResult<()>;
}
