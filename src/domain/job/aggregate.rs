//! Job Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobError, JobFailure, JobResult, JobStatus, JobType, TtsRequest};

/// TTS 任务聚合根
///
/// 不变量:
/// - id 与队列中的 task_id 相同
/// - 状态只通过队列的状态回调（以及取消用例）变更，Worker 不直接修改
/// - 重试永远生成新任务，原任务作为历史记录保持不变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsJob {
    pub id: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub request: Option<TtsRequest>,
    pub result: Option<JobResult>,
    pub error: Option<JobFailure>,
}

impl TtsJob {
    /// 创建一个刚入队的任务
    pub fn queued(id: impl Into<String>, request: TtsRequest) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            job_type: JobType::Tts,
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
            request: Some(request),
            result: None,
            error: None,
        }
    }

    /// 检查是否允许取消
    pub fn ensure_cancellable(&self) -> Result<(), JobError> {
        if self.status.can_cancel() {
            Ok(())
        } else {
            Err(JobError::NotCancellable(self.status))
        }
    }

    /// 检查是否允许重试，返回需要重新提交的请求
    pub fn retry_request(&self) -> Result<&TtsRequest, JobError> {
        if !self.status.can_retry() {
            return Err(JobError::NotRetryable(self.status));
        }
        self.request
            .as_ref()
            .ok_or_else(|| JobError::MissingRequest(self.id.clone()))
    }

    /// 基于当前任务生成重试任务（新 id，状态 queued）
    pub fn retried_as(&self, new_id: impl Into<String>) -> Result<Self, JobError> {
        let request = self.retry_request()?.clone();
        let mut job = Self::queued(new_id, request);
        job.job_type = self.job_type;
        Ok(job)
    }

    /// 标记为已取消
    pub fn mark_cancelled(&mut self) {
        self.status = JobStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::TtsMode;

    fn sample_job(status: JobStatus) -> TtsJob {
        let mut job = TtsJob::queued("job-1", TtsRequest::new("hello", TtsMode::Speaker, "v1"));
        job.status = status;
        job
    }

    #[test]
    fn test_cancel_rules() {
        assert!(sample_job(JobStatus::Queued).ensure_cancellable().is_ok());
        assert!(sample_job(JobStatus::Running).ensure_cancellable().is_ok());
        assert!(matches!(
            sample_job(JobStatus::Succeeded).ensure_cancellable(),
            Err(JobError::NotCancellable(JobStatus::Succeeded))
        ));
    }

    #[test]
    fn test_retry_creates_fresh_job() {
        let mut original = sample_job(JobStatus::Failed);
        original.error = Some(JobFailure::tts("boom"));

        let retried = original.retried_as("job-2").unwrap();
        assert_eq!(retried.id, "job-2");
        assert_eq!(retried.status, JobStatus::Queued);
        assert_eq!(retried.request, original.request);
        assert!(retried.error.is_none());

        // 原任务保持不变
        assert_eq!(original.status, JobStatus::Failed);
        assert_eq!(original.id, "job-1");
    }

    #[test]
    fn test_retry_rejected_for_running_job() {
        let job = sample_job(JobStatus::Running);
        assert!(matches!(
            job.retried_as("job-2"),
            Err(JobError::NotRetryable(JobStatus::Running))
        ));
    }

    #[test]
    fn test_retry_without_request() {
        let mut job = sample_job(JobStatus::Cancelled);
        job.request = None;
        assert!(matches!(job.retry_request(), Err(JobError::MissingRequest(_))));
    }
}
