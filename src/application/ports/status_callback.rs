//! Status Change Callback Port - 状态变更持久化回调

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::JobStatus;

/// 回调错误
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Status Change Callback Port
///
/// 由应用层提供，在 QueueManager 每次状态变更时被同步调用。
/// 返回的错误只会被记录日志，不会回滚内存中的状态。
#[async_trait]
pub trait StatusChangeCallback: Send + Sync {
    async fn on_transition(
        &self,
        task_id: &str,
        status: JobStatus,
        payload: Option<&Value>,
    ) -> Result<(), CallbackError>;
}
