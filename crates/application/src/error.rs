use domain::DomainError;
use thiserror::Error;

use crate::password::PasswordHasherError;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("password error: {0}")]
    Password(#[from] PasswordHasherError),
}

impl ApplicationError {
    /// 取出领域错误（若是）
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(err) => Some(err),
            ApplicationError::Password(_) => None,
        }
    }
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;
