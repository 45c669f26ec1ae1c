//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, AudioStorageError, RepositoryError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义（与 HTTP 状态码一致）
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const PAYLOAD_TOO_LARGE: i32 = 413;
    pub const UNSUPPORTED_MEDIA_TYPE: i32 = 415;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    ServiceUnavailable(String),
}

impl ApiError {
    fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::PayloadTooLarge(_) => errno::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => errno::UNSUPPORTED_MEDIA_TYPE,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnsupportedMediaType(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = self.message().to_string();

        match &self {
            ApiError::NotFound(_) => {
                tracing::warn!(errno, error = %msg, "Resource not found");
            }
            ApiError::BadRequest(_) => {
                tracing::warn!(errno, error = %msg, "Bad request");
            }
            ApiError::Conflict(_) => {
                tracing::warn!(errno, error = %msg, "Resource conflict");
            }
            ApiError::PayloadTooLarge(_) | ApiError::UnsupportedMediaType(_) => {
                tracing::warn!(errno, error = %msg, "Rejected upload");
            }
            ApiError::Internal(_) => {
                tracing::error!(errno, error = %msg, "Internal server error");
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno, error = %msg, "Service unavailable");
            }
        }

        let status = StatusCode::from_u16(errno as u16).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Duplicate(msg) => ApiError::Conflict(msg),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::InvalidState(msg) => ApiError::BadRequest(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::QueueError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::UnsupportedMediaType(msg) => ApiError::UnsupportedMediaType(msg),
            ApplicationError::PayloadTooLarge(msg) => ApiError::PayloadTooLarge(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AudioStorageError> for ApiError {
    fn from(e: AudioStorageError) -> Self {
        match e {
            AudioStorageError::FileNotFound(name) => {
                ApiError::NotFound(format!("Audio file not found: {}", name))
            }
            AudioStorageError::InvalidFileName(name) => {
                ApiError::BadRequest(format!("Invalid file name: {}", name))
            }
            AudioStorageError::IoError(msg) => ApiError::Internal(msg),
        }
    }
}
