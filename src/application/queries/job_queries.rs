//! Job Queries - 任务与队列查询

use crate::domain::JobStatus;

/// 获取任务详情查询
#[derive(Debug, Clone)]
pub struct GetJob {
    pub job_id: String,
}

/// 列出任务查询
#[derive(Debug, Clone, Default)]
pub struct ListJobs {
    pub status: Option<JobStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// 队列状态查询
#[derive(Debug, Clone)]
pub struct GetQueueStatus;
