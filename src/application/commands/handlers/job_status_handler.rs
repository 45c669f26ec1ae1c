//! Job Status Handler - 把队列状态变更写入任务仓储

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::{
    CallbackError, JobRepositoryPort, JobUpdate, StatusChangeCallback,
};
use crate::domain::{JobFailure, JobResult, JobStatus};

/// 任务状态回调
///
/// 注册到 QueueManager，每次状态变更时同步更新任务记录。
/// 任务记录不存在时只记录日志：登记时的 queued 回调总是早于 add。
pub struct JobStatusHandler {
    job_repo: Arc<dyn JobRepositoryPort>,
}

impl JobStatusHandler {
    pub fn new(job_repo: Arc<dyn JobRepositoryPort>) -> Self {
        Self { job_repo }
    }

    fn build_update(status: JobStatus, payload: Option<&Value>) -> Result<JobUpdate, CallbackError> {
        let update = JobUpdate::status(status);

        let update = match status {
            JobStatus::Succeeded => {
                let payload = payload.ok_or_else(|| {
                    CallbackError::InvalidPayload("succeeded without result".to_string())
                })?;
                let result: JobResult = serde_json::from_value(payload.clone())
                    .map_err(|e| CallbackError::InvalidPayload(e.to_string()))?;
                update.with_result(result)
            }
            JobStatus::Failed => {
                let message = match payload {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => "unknown error".to_string(),
                };
                update.with_error(JobFailure::tts(message))
            }
            JobStatus::Queued | JobStatus::Running | JobStatus::Cancelled => update,
        };

        Ok(update)
    }
}

#[async_trait]
impl StatusChangeCallback for JobStatusHandler {
    async fn on_transition(
        &self,
        task_id: &str,
        status: JobStatus,
        payload: Option<&Value>,
    ) -> Result<(), CallbackError> {
        let update = Self::build_update(status, payload)?;

        let updated = self
            .job_repo
            .update(task_id, update)
            .await
            .map_err(|e| CallbackError::Persistence(e.to_string()))?;

        if updated {
            tracing::debug!(job_id = %task_id, status = %status, "Job status persisted");
        } else if status == JobStatus::Queued {
            tracing::debug!(job_id = %task_id, "Job row not written yet, skipping queued update");
        } else {
            tracing::warn!(
                job_id = %task_id,
                status = %status,
                "Job not found, skipping status update"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{speaker_request, InMemoryJobRepository};
    use crate::domain::TtsJob;
    use serde_json::json;

    async fn setup() -> (Arc<InMemoryJobRepository>, JobStatusHandler) {
        let repo = Arc::new(InMemoryJobRepository::default());
        repo.add(&TtsJob::queued("job-1", speaker_request("v1")))
            .await
            .unwrap();
        let handler = JobStatusHandler::new(repo.clone());
        (repo, handler)
    }

    #[tokio::test]
    async fn test_succeeded_stores_result() {
        let (repo, handler) = setup().await;
        let payload = json!({
            "audio_url": "/api/v1/audio/x.wav",
            "duration_seconds": null,
            "format": "wav"
        });

        handler
            .on_transition("job-1", JobStatus::Succeeded, Some(&payload))
            .await
            .unwrap();

        let job = repo.snapshot("job-1").unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.result.unwrap().audio_url, "/api/v1/audio/x.wav");
        assert!(job.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_stores_tts_error() {
        let (repo, handler) = setup().await;

        handler
            .on_transition("job-1", JobStatus::Failed, Some(&json!("TTS backend busy: 503")))
            .await
            .unwrap();

        let job = repo.snapshot("job-1").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error, Some(JobFailure::tts("TTS backend busy: 503")));
    }

    #[tokio::test]
    async fn test_running_only_changes_status() {
        let (repo, handler) = setup().await;

        handler
            .on_transition("job-1", JobStatus::Running, None)
            .await
            .unwrap();

        let job = repo.snapshot("job-1").unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_missing_job_is_skipped() {
        let (repo, handler) = setup().await;

        handler
            .on_transition("ghost", JobStatus::Queued, None)
            .await
            .unwrap();

        assert!(repo.snapshot("ghost").is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_result_is_rejected() {
        let (repo, handler) = setup().await;

        let err = handler
            .on_transition("job-1", JobStatus::Succeeded, Some(&json!({"nope": true})))
            .await
            .unwrap_err();

        assert!(matches!(err, CallbackError::InvalidPayload(_)));
        assert_eq!(repo.snapshot("job-1").unwrap().status, JobStatus::Queued);
    }
}
