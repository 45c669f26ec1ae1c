//! Task Handler Port - 任务执行器
//!
//! Worker 出队后调用的执行接口

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::TtsRequest;

/// 任务执行错误
#[derive(Debug, Error)]
pub enum HandlerError {
    /// 合成后端繁忙，可重试
    #[error("TTS backend busy: {0}")]
    Busy(String),

    #[error("Invalid task payload: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn is_busy(&self) -> bool {
        matches!(self, HandlerError::Busy(_))
    }
}

/// 入队的 TTS 任务载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsTaskPayload {
    pub request: TtsRequest,
    pub created_at: DateTime<Utc>,
}

impl TtsTaskPayload {
    pub fn new(request: TtsRequest) -> Self {
        Self {
            request,
            created_at: Utc::now(),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: Value) -> Result<Self, HandlerError> {
        serde_json::from_value(value).map_err(|e| HandlerError::InvalidPayload(e.to_string()))
    }
}

/// Task Handler Port
///
/// 执行一次任务，返回的结果会原样写入 succeeded 状态
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, payload: Value) -> Result<Value, HandlerError>;
}
