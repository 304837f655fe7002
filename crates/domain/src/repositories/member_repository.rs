//! 成员持久库接口定义

use crate::entities::member::Member;
use crate::errors::DomainResult;
use async_trait::async_trait;

/// 成员持久库接口
///
/// 持久库是成员记录的唯一权威来源，成员 ID 的唯一性
/// 最终由它的存储级约束保证。
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 成员 ID 是否已存在
    async fn exists_by_id(&self, member_id: &str) -> DomainResult<bool>;

    /// 根据 ID 查找成员
    async fn find_by_id(&self, member_id: &str) -> DomainResult<Option<Member>>;

    /// 持久化新成员
    ///
    /// ID 冲突时返回 `DomainError::DuplicateMemberId`——存储级
    /// 唯一约束是并发注册下的最终防线。
    async fn save(&self, member: &Member) -> DomainResult<Member>;

    /// 更新密码哈希
    async fn update_password_hash(&self, member_id: &str, password_hash: &str)
        -> DomainResult<()>;

    /// 删除成员
    async fn delete(&self, member_id: &str) -> DomainResult<()>;
}
