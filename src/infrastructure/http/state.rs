//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CancelJobHandler, CreateJobHandler, CreateUploadHandler, CreateVoiceHandler,
    DeleteVoiceHandler, RetryJobHandler,
    // Query handlers
    GetJobHandler, GetQueueStatusHandler, GetVoiceHandler, ListJobsHandler, ListVoicesHandler,
    // Ports
    AudioStoragePort, JobRepositoryPort, QueueManagerPort, UploadRepositoryPort,
    VoiceRepositoryPort,
};

/// 应用状态
///
/// QueueManager 在 main 中创建，与 Worker 共享同一个实例
pub struct AppState {
    // ========== Ports ==========
    pub queue_manager: Arc<dyn QueueManagerPort>,
    pub audio_storage: Arc<dyn AudioStoragePort>,

    // ========== Command Handlers ==========
    pub create_job_handler: CreateJobHandler,
    pub cancel_job_handler: CancelJobHandler,
    pub retry_job_handler: RetryJobHandler,
    pub create_upload_handler: CreateUploadHandler,
    pub create_voice_handler: CreateVoiceHandler,
    pub delete_voice_handler: DeleteVoiceHandler,

    // ========== Query Handlers ==========
    pub get_job_handler: GetJobHandler,
    pub list_jobs_handler: ListJobsHandler,
    pub queue_status_handler: GetQueueStatusHandler,
    pub get_voice_handler: GetVoiceHandler,
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        queue_manager: Arc<dyn QueueManagerPort>,
        job_repo: Arc<dyn JobRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        upload_repo: Arc<dyn UploadRepositoryPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            // Ports
            queue_manager: queue_manager.clone(),
            audio_storage: audio_storage.clone(),

            // Command handlers
            create_job_handler: CreateJobHandler::new(
                queue_manager.clone(),
                job_repo.clone(),
                voice_repo.clone(),
            ),
            cancel_job_handler: CancelJobHandler::new(queue_manager.clone(), job_repo.clone()),
            retry_job_handler: RetryJobHandler::new(queue_manager.clone(), job_repo.clone()),
            create_upload_handler: CreateUploadHandler::new(
                upload_repo.clone(),
                audio_storage.clone(),
            ),
            create_voice_handler: CreateVoiceHandler::new(voice_repo.clone(), upload_repo.clone()),
            delete_voice_handler: DeleteVoiceHandler::new(
                voice_repo.clone(),
                upload_repo,
                audio_storage,
            ),

            // Query handlers
            get_job_handler: GetJobHandler::new(job_repo.clone()),
            list_jobs_handler: ListJobsHandler::new(job_repo),
            queue_status_handler: GetQueueStatusHandler::new(queue_manager),
            get_voice_handler: GetVoiceHandler::new(voice_repo.clone()),
            list_voices_handler: ListVoicesHandler::new(voice_repo),
        }
    }
}
