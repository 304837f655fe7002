use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("hash error: {0}")]
    Hash(String),
    #[error("verify error: {0}")]
    Verify(String),
}

impl PasswordHasherError {
    pub fn hash_error(message: impl Into<String>) -> Self {
        Self::Hash(message.into())
    }

    pub fn verify_error(message: impl Into<String>) -> Self {
        Self::Verify(message.into())
    }
}

/// 自适应加盐哈希的接口
///
/// 哈希代价因子由实现方在构造时固定，运行期间不变。
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError>;
    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError>;
}
