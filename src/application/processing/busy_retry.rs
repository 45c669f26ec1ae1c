//! Busy Retry - 后端繁忙时的重试装饰器

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{HandlerError, Sleeper, TaskHandler};

/// 繁忙重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyRetryPolicy {
    /// 总尝试次数（包括第一次）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub backoff: Duration,
}

impl Default for BusyRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(60),
        }
    }
}

/// 繁忙重试装饰器
///
/// 内层处理器返回 `HandlerError::Busy` 时等待后重试同一载荷，
/// 最后一次尝试之后不再等待，直接返回繁忙错误。其它错误立即返回。
pub struct BusyRetryHandler {
    inner: Arc<dyn TaskHandler>,
    policy: BusyRetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl BusyRetryHandler {
    pub fn new(
        inner: Arc<dyn TaskHandler>,
        policy: BusyRetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }
}

#[async_trait]
impl TaskHandler for BusyRetryHandler {
    async fn handle(&self, payload: Value) -> Result<Value, HandlerError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.handle(payload.clone()).await {
                Err(e) if e.is_busy() && attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        backoff_secs = self.policy.backoff.as_secs(),
                        error = %e,
                        "TTS backend busy, retrying"
                    );
                    self.sleeper.sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(e) if e.is_busy() => {
                    tracing::error!(attempts = attempt, "TTS backend still busy, giving up");
                    return Err(e);
                }
                other => return other,
            }
        }
    }
}
