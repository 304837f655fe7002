//! 存储调用的超时与有界重试
//!
//! 每次尝试都套一层超时；只有瞬时的基础设施故障才会重试，
//! 领域层面的失败（不存在、重复、凭据不符）立即返回。
//! 适用对象仅限幂等调用——新成员的首次持久化不在此列。

use std::future::Future;
use std::time::Duration;

use config::RetryConfig;
use domain::{DomainError, DomainResult};
use tokio::time::{sleep, timeout};
use tracing::warn;

/// 重试策略：最大尝试次数、指数退避基准、单次调用超时
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    op_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, op_timeout: Duration) -> Self {
        Self {
            // 至少尝试一次
            max_attempts: max_attempts.max(1),
            base_delay,
            op_timeout,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.op_timeout_ms),
        )
    }

    fn delay_at(&self, attempt: u32) -> Duration {
        let exp = std::cmp::min(attempt.saturating_sub(1), 20);
        let factor = 1u32 << exp;
        self.base_delay.saturating_mul(factor)
    }
}

/// 以策略执行幂等操作：超时 + 有界指数退避重试
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut op: F) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match timeout(policy.op_timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                if !err.is_transient() || attempt >= policy.max_attempts {
                    return Err(err);
                }
                warn!(attempt, error = %err, "transient store error, retrying");
            }
            Err(_elapsed) => {
                if attempt >= policy.max_attempts {
                    return Err(DomainError::infrastructure("store call timed out"));
                }
                warn!(attempt, "store call timed out, retrying");
            }
        }
        sleep(policy.delay_at(attempt)).await;
    }
}
