use std::sync::Arc;

use chrono::Utc;
use domain::{CredentialCache, DomainError, Member, MemberRepository, TokenIssuer};
use tracing::{info, warn};

use crate::{
    dto::{MemberView, TokenResponse},
    error::ApplicationResult,
    password::PasswordHasher,
};

pub struct MemberServiceDependencies {
    pub member_repository: Arc<dyn MemberRepository>,
    pub credential_cache: Arc<dyn CredentialCache>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_issuer: Arc<TokenIssuer>,
}

/// 身份服务：注册、登录、用户信息维护
pub struct MemberService {
    deps: MemberServiceDependencies,
}

impl MemberService {
    pub fn new(deps: MemberServiceDependencies) -> Self {
        Self { deps }
    }

    /// 注册新成员
    ///
    /// 校验在任何 I/O 之前完成。重复检查先查缓存再查持久库，
    /// 但真正的防线是持久库的唯一约束：并发注册下第二个写入
    /// 会在存储层被拒绝并映射为 DuplicateMemberId。
    pub async fn register(
        &self,
        member_id: String,
        raw_password: String,
    ) -> ApplicationResult<MemberView> {
        Member::validate_member_id(&member_id)?;
        Member::validate_password(&raw_password)?;

        self.check_duplicate_id(&member_id).await?;

        let password_hash = self.deps.password_hasher.hash(&raw_password).await?;
        let member = Member::new(member_id, password_hash, Utc::now())?;
        let stored = self.deps.member_repository.save(&member).await?;
        info!(member_id = %stored.member_id, "registered member persisted");

        // 镜像写入失败只记日志：持久库保持权威，缓存允许落后
        if let Err(err) = self
            .deps
            .credential_cache
            .save_member(&stored.member_id, &stored.password_hash, stored.created_at)
            .await
        {
            warn!(member_id = %stored.member_id, error = %err, "credential cache mirror write failed");
        }

        Ok(MemberView::from(&stored))
    }

    /// 登录：只查持久库，校验通过后签发令牌
    ///
    /// 两个失败分支对调用方只暴露固定的错误类别，不提供
    /// 额外的区分信号。
    pub async fn authenticate(
        &self,
        member_id: String,
        raw_password: String,
    ) -> ApplicationResult<TokenResponse> {
        let member = self
            .deps
            .member_repository
            .find_by_id(&member_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        let matches = self
            .deps
            .password_hasher
            .verify(&raw_password, &member.password_hash)
            .await?;
        if !matches {
            return Err(DomainError::CredentialMismatch.into());
        }

        let token = self.deps.token_issuer.issue(&member.member_id)?;
        info!(member_id = %member.member_id, "member authenticated");

        Ok(TokenResponse {
            member_id: member.member_id,
            token,
        })
    }

    /// 查询用户信息
    pub async fn member_info(&self, member_id: &str) -> ApplicationResult<MemberView> {
        let member = self
            .deps
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;
        Ok(MemberView::from(&member))
    }

    /// 修改密码：验证旧密码后以新哈希覆盖，并刷新缓存镜像
    pub async fn change_password(
        &self,
        member_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> ApplicationResult<MemberView> {
        Member::validate_password(new_password)?;

        let member = self
            .deps
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        let matches = self
            .deps
            .password_hasher
            .verify(current_password, &member.password_hash)
            .await?;
        if !matches {
            return Err(DomainError::CredentialMismatch.into());
        }

        let new_hash = self.deps.password_hasher.hash(new_password).await?;
        self.deps
            .member_repository
            .update_password_hash(&member.member_id, &new_hash)
            .await?;
        info!(member_id = %member.member_id, "member password updated");

        if let Err(err) = self
            .deps
            .credential_cache
            .save_member(&member.member_id, &new_hash, member.created_at)
            .await
        {
            warn!(member_id = %member.member_id, error = %err, "credential cache mirror refresh failed");
        }

        Ok(MemberView::from(&member))
    }

    /// 注销成员：删除持久记录，尽力清理缓存镜像
    pub async fn remove_member(&self, member_id: &str) -> ApplicationResult<()> {
        let member = self
            .deps
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        self.deps.member_repository.delete(&member.member_id).await?;
        info!(member_id = %member.member_id, "member deleted");

        if let Err(err) = self.deps.credential_cache.remove(&member.member_id).await {
            warn!(member_id = %member.member_id, error = %err, "credential cache eviction failed");
        }

        Ok(())
    }

    /// 重复 ID 预检：缓存命中或持久库命中都算重复
    ///
    /// check-then-act，本层不加锁；漏网的并发注册由持久库
    /// 唯一约束兜底。缓存查询失败按未命中处理，继续查持久库。
    async fn check_duplicate_id(&self, member_id: &str) -> ApplicationResult<()> {
        match self.deps.credential_cache.exists(member_id).await {
            Ok(true) => return Err(DomainError::DuplicateMemberId.into()),
            Ok(false) => {}
            Err(err) => {
                warn!(member_id, error = %err, "credential cache lookup failed, falling back to store");
            }
        }
        if self.deps.member_repository.exists_by_id(member_id).await? {
            return Err(DomainError::DuplicateMemberId.into());
        }
        Ok(())
    }
}
