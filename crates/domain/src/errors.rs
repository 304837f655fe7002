//! 领域模型错误定义
//!
//! 闭合的错误分类：校验、重复注册、凭据、房间、令牌，
//! 以及兜底的基础设施错误。对外消息固定，不泄露内部细节。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 入参校验错误，在任何 I/O 之前同步抛出
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    /// 成员 ID 已存在（缓存、持久库任一命中）
    #[error("member id already exists")]
    DuplicateMemberId,

    /// 成员不存在
    #[error("member not found")]
    MemberNotFound,

    /// ID 或密码不匹配
    #[error("id or password do not match")]
    CredentialMismatch,

    /// 房间不存在
    #[error("room not found")]
    RoomNotFound,

    /// 房间密码错误
    #[error("invalid room password")]
    InvalidRoomPassword,

    /// 令牌无效（签名、格式）
    #[error("invalid token")]
    InvalidToken,

    /// 令牌已过期
    #[error("token expired")]
    ExpiredToken,

    /// 基础设施错误，细节只进日志不出边界
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// 创建校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建基础设施错误
    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::Infrastructure(message.into())
    }

    /// 是否为可重试的瞬时故障
    ///
    /// 领域层面的失败（不存在、重复、凭据不符）重试没有意义，
    /// 只有基础设施故障可能是瞬时的。
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Infrastructure(_))
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
