//! Job Command Handlers

use serde_json::Value;
use std::sync::Arc;

use crate::application::commands::{CancelJob, CreateJob, RetryJob};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    JobRepositoryPort, QueueManagerPort, TtsTaskPayload, VoiceRepositoryPort,
};
use crate::domain::{JobStatus, TtsJob, TtsRequest};

/// 登记任务、写入任务记录，最后才放入队列
///
/// 任务记录先于入队写入，Worker 的状态回调总能找到对应的行。
/// 写入失败时任务在队列侧被标记为 failed，不会被执行。
async fn submit(
    queue_manager: &dyn QueueManagerPort,
    job_repo: &dyn JobRepositoryPort,
    request: &TtsRequest,
    build: impl FnOnce(String) -> Result<TtsJob, ApplicationError>,
) -> Result<TtsJob, ApplicationError> {
    let payload = TtsTaskPayload::new(request.clone())
        .to_value()
        .map_err(|e| ApplicationError::internal(e.to_string()))?;

    let task_id = queue_manager.register().await;

    let persisted = match build(task_id.clone()) {
        Ok(job) => job_repo.add(&job).await.map(|_| job).map_err(ApplicationError::from),
        Err(e) => Err(e),
    };
    let job = match persisted {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!(task_id = %task_id, error = %e, "Failed to persist job");
            queue_manager
                .set_status(&task_id, JobStatus::Failed, Some(Value::String(e.to_string())))
                .await;
            return Err(e);
        }
    };

    queue_manager.publish(&task_id, payload).await?;
    Ok(job)
}

// ============================================================================
// CreateJob
// ============================================================================

/// CreateJob Handler
pub struct CreateJobHandler {
    queue_manager: Arc<dyn QueueManagerPort>,
    job_repo: Arc<dyn JobRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl CreateJobHandler {
    pub fn new(
        queue_manager: Arc<dyn QueueManagerPort>,
        job_repo: Arc<dyn JobRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
    ) -> Self {
        Self {
            queue_manager,
            job_repo,
            voice_repo,
        }
    }

    pub async fn handle(&self, command: CreateJob) -> Result<TtsJob, ApplicationError> {
        let request = command.request;
        request.validate()?;

        if self.voice_repo.find_by_id(&request.voice_id).await?.is_none() {
            return Err(ApplicationError::validation(format!(
                "Voice {} not found",
                request.voice_id
            )));
        }

        let job = submit(
            self.queue_manager.as_ref(),
            self.job_repo.as_ref(),
            &request,
            |job_id| Ok(TtsJob::queued(job_id, request.clone())),
        )
        .await?;

        tracing::info!(
            job_id = %job.id,
            mode = job.request.as_ref().map(|r| r.mode.as_str()).unwrap_or("-"),
            "Job created"
        );

        Ok(job)
    }
}

// ============================================================================
// CancelJob
// ============================================================================

/// CancelJob Handler
///
/// 只对 queued / running 的任务生效。running 的任务不会被中断，
/// 合成完成后其终态会覆盖 cancelled。
///
/// 任务记录只经由队列的状态回调更新，与 Worker 的终态写入在同一把锁下串行。
pub struct CancelJobHandler {
    queue_manager: Arc<dyn QueueManagerPort>,
    job_repo: Arc<dyn JobRepositoryPort>,
}

impl CancelJobHandler {
    pub fn new(queue_manager: Arc<dyn QueueManagerPort>, job_repo: Arc<dyn JobRepositoryPort>) -> Self {
        Self {
            queue_manager,
            job_repo,
        }
    }

    pub async fn handle(&self, command: CancelJob) -> Result<TtsJob, ApplicationError> {
        let mut job = self
            .job_repo
            .get(&command.job_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job", &command.job_id))?;

        job.ensure_cancellable()?;

        self.queue_manager.cancel(&job.id).await;
        job.mark_cancelled();

        tracing::info!(job_id = %job.id, "Job cancelled");

        Ok(job)
    }
}

// ============================================================================
// RetryJob
// ============================================================================

/// RetryJob Handler
///
/// 以原请求创建一个新任务，原任务记录保持不变
pub struct RetryJobHandler {
    queue_manager: Arc<dyn QueueManagerPort>,
    job_repo: Arc<dyn JobRepositoryPort>,
}

impl RetryJobHandler {
    pub fn new(queue_manager: Arc<dyn QueueManagerPort>, job_repo: Arc<dyn JobRepositoryPort>) -> Self {
        Self {
            queue_manager,
            job_repo,
        }
    }

    pub async fn handle(&self, command: RetryJob) -> Result<TtsJob, ApplicationError> {
        let original = self
            .job_repo
            .get(&command.job_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job", &command.job_id))?;

        let request = original.retry_request()?;
        let job = submit(
            self.queue_manager.as_ref(),
            self.job_repo.as_ref(),
            request,
            |new_id| Ok(original.retried_as(new_id)?),
        )
        .await?;

        tracing::info!(
            job_id = %job.id,
            retried_from = %original.id,
            "Job retried"
        );

        Ok(job)
    }
}
