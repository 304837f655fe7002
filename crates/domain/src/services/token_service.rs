//! 令牌签发服务
//!
//! 无状态的 JWT 签发/校验组件。签名密钥在进程启动时加载一次，
//! 之后只读，可被任意数量的并发调用共享。

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 主题：成员 ID
    pub sub: String,
    /// 签发时间 (Unix timestamp)
    pub iat: i64,
    /// 过期时间 (Unix timestamp)
    pub exp: i64,
}

/// 令牌签发器
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_minutes: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiration_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_minutes,
        }
    }

    /// 为成员签发令牌，有效期 = 当前时间 + 配置的有效窗口
    pub fn issue(&self, subject: &str) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.expiration_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| DomainError::infrastructure(format!("token encoding failed: {err}")))
    }

    /// 校验令牌，返回主题（成员 ID）
    pub fn verify(&self, token: &str) -> DomainResult<String> {
        let mut validation = Validation::default();
        // 过期判定精确到秒，不留余量
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => DomainError::ExpiredToken,
                _ => DomainError::InvalidToken,
            })
    }
}
