//! Job Context - Errors

use thiserror::Error;

use super::JobStatus;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Cannot cancel job with status: {0}")]
    NotCancellable(JobStatus),

    #[error("Cannot retry job with status: {0}")]
    NotRetryable(JobStatus),

    #[error("Cannot retry job without request data: {0}")]
    MissingRequest(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
