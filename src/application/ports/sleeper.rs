//! Sleeper Port - 退避等待

use async_trait::async_trait;
use std::time::Duration;

/// 繁忙重试之间的等待
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
