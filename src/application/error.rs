//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{AudioStorageError, QueueError, RepositoryError};
use crate::domain::{JobError, VoiceError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效（例如对已完成的任务执行取消）
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 队列错误
    #[error("Queue error: {0}")]
    QueueError(String),

    /// 不支持的上传文件类型
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// 上传文件过大
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<QueueError> for ApplicationError {
    fn from(err: QueueError) -> Self {
        Self::QueueError(err.to_string())
    }
}

impl From<JobError> for ApplicationError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::InvalidRequest(_) => Self::ValidationError(err.to_string()),
            JobError::NotCancellable(_) | JobError::NotRetryable(_) | JobError::MissingRequest(_) => {
                Self::InvalidState(err.to_string())
            }
        }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::UnsupportedExtension(_) | VoiceError::UnsupportedContentType(_) => {
                Self::UnsupportedMediaType(err.to_string())
            }
            VoiceError::TooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            VoiceError::MissingFileName
            | VoiceError::MissingContentType
            | VoiceError::InvalidName(_) => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        Self::InternalError(err.to_string())
    }
}
