//! Queue Manager Port - 任务队列与状态管理
//!
//! 定义队列管理的抽象接口，具体实现在 infrastructure/memory 层

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::StatusChangeCallback;
use crate::domain::JobStatus;

/// Queue 错误
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Task queue is closed")]
    Closed,
}

/// 任务状态记录
///
/// `result` 只在 succeeded 时存在，`error` 只在 failed 时存在
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusRecord {
    pub status: Option<JobStatus>,
    pub result: Option<Value>,
    pub error: Option<String>,
}

/// 任务状态查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    /// 从未入队（也从未取消）的 task_id
    NotFound,
    /// 已登记的任务
    Tracked(StatusRecord),
}

impl TaskStatus {
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            TaskStatus::NotFound => None,
            TaskStatus::Tracked(record) => record.status,
        }
    }

    /// 对外展示的状态名，未知任务为 `not_found`
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotFound => "not_found",
            TaskStatus::Tracked(record) => record.status.map(|s| s.as_str()).unwrap_or("unknown"),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            TaskStatus::NotFound => None,
            TaskStatus::Tracked(record) => record.result.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TaskStatus::NotFound => None,
            TaskStatus::Tracked(record) => record.error.as_deref(),
        }
    }
}

/// Queue Manager Port
///
/// 单并发任务代理的门面：入队、取消、状态查询，以及所有状态变更的唯一入口。
/// 每一次状态变更都会同步（await）调用已注册的 StatusChangeCallback。
#[async_trait]
pub trait QueueManagerPort: Send + Sync {
    /// 注册状态变更回调（覆盖之前的回调）
    fn set_callback(&self, callback: Arc<dyn StatusChangeCallback>);

    /// 登记一个新任务并置为 queued，返回 task_id，此时任务尚未进入队列
    async fn register(&self) -> String;

    /// 把已登记的任务放入队列，之后 Worker 才可能取到它
    ///
    /// 失败时任务被置为 failed
    async fn publish(&self, task_id: &str, payload: Value) -> Result<(), QueueError>;

    /// 登记并立即入队
    async fn enqueue(&self, payload: Value) -> Result<String, QueueError> {
        let task_id = self.register().await;
        self.publish(&task_id, payload).await?;
        Ok(task_id)
    }

    /// 查询任务状态，未知任务返回 `TaskStatus::NotFound`
    fn status(&self, task_id: &str) -> TaskStatus;

    /// 覆盖任务状态并调用回调
    ///
    /// failed 状态下 `payload` 为错误信息字符串，succeeded 状态下为结果
    async fn set_status(&self, task_id: &str, status: JobStatus, payload: Option<Value>);

    /// 协作式取消：只标记状态，不从队列移除
    async fn cancel(&self, task_id: &str);

    /// 开始执行任务：未被取消则标记为 running 并记录为当前任务，返回 true
    async fn start(&self, task_id: &str) -> bool;

    /// 清除当前任务
    fn clear_running(&self);

    /// 当前正在执行的 task_id
    fn running_job_id(&self) -> Option<String>;

    /// 尚未出队的任务数（不含正在执行的任务）
    fn queue_length(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_label() {
        let status = TaskStatus::NotFound;
        assert_eq!(status.label(), "not_found");
        assert!(status.result().is_none());
        assert!(status.status().is_none());
    }

    #[test]
    fn test_tracked_label() {
        let status = TaskStatus::Tracked(StatusRecord {
            status: Some(JobStatus::Failed),
            result: None,
            error: Some("boom".to_string()),
        });
        assert_eq!(status.label(), "failed");
        assert_eq!(status.error(), Some("boom"));
    }
}
