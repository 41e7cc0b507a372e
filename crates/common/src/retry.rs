//! 启动期重试
//!
//! 数据库等外部依赖在容器编排中往往晚于服务就绪，启动时按指数退避重连

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 重试策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier: default_multiplier(),
        }
    }

    /// 第 `attempt` 次失败后的等待时间，不超过 `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis((delay_ms as u64).min(self.max_delay.as_millis() as u64))
    }
}

/// 视为瞬时故障的错误片段
pub const TRANSIENT_ERROR_PATTERNS: &[&str] = &[
    "connection refused",
    "connection reset",
    "connection timed out",
    "timeout",
    "timed out",
    "temporarily unavailable",
    "too many connections",
    "the database system is starting up",
    "econnrefused",
    "broken pipe",
    "could not connect",
    "no route to host",
    "server closed the connection",
    "pool timed out",
];

/// 根据错误文本判断是否值得重试
pub fn is_retryable_error(error: &str) -> bool {
    let error_lower = error.to_lowercase();
    TRANSIENT_ERROR_PATTERNS
        .iter()
        .any(|pattern| error_lower.contains(pattern))
}

/// 所有错误都重试，直到耗尽 `max_attempts`
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_conditional_retry(config, operation_name, operation, |_| true).await
}

/// 仅当 `should_retry` 返回 true 时重试，否则立即返回错误
pub async fn with_conditional_retry<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        error = %e,
                        "Operation failed with non-retryable error"
                    );
                    return Err(e);
                }
                if attempt + 1 >= max_attempts {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_attempts,
                        error = %e,
                        "Operation failed, no more retries"
                    );
                    return Err(e);
                }

                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
