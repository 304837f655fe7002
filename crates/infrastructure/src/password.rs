//! bcrypt 密码哈希实现
//!
//! bcrypt 是 CPU 密集操作，放到阻塞线程池执行，
//! 避免占住异步工作线程。

use application::{PasswordHasher, PasswordHasherError};
use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

#[derive(Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// cost 为 None 时使用库默认值
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(DEFAULT_COST),
        }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hash(plaintext, cost))
            .await
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHasherError::hash_error(err.to_string())))
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || verify(plaintext, &hashed))
            .await
            .map_err(|err| PasswordHasherError::verify_error(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHasherError::verify_error(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试用低 cost，生产区间校验在 config 层
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(Some(4))
    }

    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let hasher = hasher();
        let hashed = hasher.hash("Passw0rd!").await.unwrap();

        assert_ne!(hashed, "Passw0rd!");
        assert!(hasher.verify("Passw0rd!", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let hasher = hasher();
        let hashed = hasher.hash("Passw0rd!").await.unwrap();

        assert!(!hasher.verify("Passw0rd", &hashed).await.unwrap());
        assert!(!hasher.verify("", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently_per_salt() {
        let hasher = hasher();
        let first = hasher.hash("Passw0rd!").await.unwrap();
        let second = hasher.hash("Passw0rd!").await.unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Passw0rd!", &second).await.unwrap());
    }
}
