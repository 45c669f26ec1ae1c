//! Queue Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::ports::QueueManagerPort;
use crate::application::queries::GetQueueStatus;

/// Worker 并发数，固定为 1
pub const MAX_CONCURRENCY: u32 = 1;

/// 队列状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatusView {
    pub max_concurrency: u32,
    pub running_job_id: Option<String>,
    /// 尚未出队的任务数（不含正在执行的任务）
    pub queue_length: usize,
    /// 暂不统计
    pub average_wait_seconds: Option<f64>,
}

/// GetQueueStatus Handler
pub struct GetQueueStatusHandler {
    queue_manager: Arc<dyn QueueManagerPort>,
}

impl GetQueueStatusHandler {
    pub fn new(queue_manager: Arc<dyn QueueManagerPort>) -> Self {
        Self { queue_manager }
    }

    pub fn handle(&self, _query: GetQueueStatus) -> QueueStatusView {
        QueueStatusView {
            max_concurrency: MAX_CONCURRENCY,
            running_job_id: self.queue_manager.running_job_id(),
            queue_length: self.queue_manager.queue_length(),
            average_wait_seconds: None,
        }
    }
}
