//! Job Context - 合成任务限界上下文
//!
//! 职责:
//! - 任务状态机（queued -> running -> succeeded | failed | cancelled）
//! - 取消 / 重试的前置条件
//! - 合成请求的基本校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::TtsJob;
pub use errors::JobError;
pub use value_objects::{JobFailure, JobResult, JobStatus, JobType, TtsMode, TtsRequest};
