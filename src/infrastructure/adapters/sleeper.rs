//! Tokio Sleeper - 基于 tokio 定时器的 Sleeper 实现

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::Sleeper;

/// 使用 `tokio::time::sleep` 等待
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
