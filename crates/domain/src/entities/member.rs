//! 成员实体定义
//!
//! 成员 ID 为 5-15 位字母数字，创建后不可变，全局唯一。
//! 密码只以 bcrypt 哈希形式保存，明文永不落地。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 成员 ID 最小长度
pub const MEMBER_ID_MIN_LEN: usize = 5;
/// 成员 ID 最大长度
pub const MEMBER_ID_MAX_LEN: usize = 15;
/// 密码最小长度
pub const PASSWORD_MIN_LEN: usize = 8;

/// 成员实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// 成员 ID（自然键，全局唯一）
    pub member_id: String,
    /// 密码哈希（敏感信息，不在序列化中包含）
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// 创建新成员，ID 不合法时返回校验错误
    pub fn new(
        member_id: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let member_id = member_id.into();
        Self::validate_member_id(&member_id)?;

        Ok(Self {
            member_id,
            password_hash: password_hash.into(),
            created_at,
        })
    }

    /// 校验成员 ID：5-15 位 ASCII 字母或数字
    pub fn validate_member_id(member_id: &str) -> DomainResult<()> {
        let len_ok = (MEMBER_ID_MIN_LEN..=MEMBER_ID_MAX_LEN).contains(&member_id.len());
        if !len_ok || !member_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "member_id",
                "must be 5-15 alphanumeric characters",
            ));
        }
        Ok(())
    }

    /// 校验明文密码策略：长度至少 8，至少一个大写字母和一个数字
    pub fn validate_password(password: &str) -> DomainResult<()> {
        let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(long_enough && has_upper && has_digit) {
            return Err(DomainError::validation(
                "member_password",
                "must be at least 8 characters with an uppercase letter and a digit",
            ));
        }
        Ok(())
    }
}
