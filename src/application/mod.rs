//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（QueueManager、TaskHandler、Repository、TtsEngine、AudioStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - processing: Worker 执行的任务处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod processing;
pub mod queries;

#[cfg(test)]
pub mod test_support;

// Re-exports
pub use commands::{
    handlers::{
        CancelJobHandler, CreateJobHandler, CreateUploadHandler, CreateVoiceHandler,
        DeleteVoiceHandler, JobStatusHandler, RetryJobHandler,
    },
    CancelJob, CreateJob, CreateUpload, CreateVoice, DeleteVoice, RetryJob,
};

pub use error::ApplicationError;

pub use ports::{
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    // Queue
    CallbackError,
    HandlerError,
    QueueError,
    QueueManagerPort,
    Sleeper,
    StatusChangeCallback,
    StatusRecord,
    TaskHandler,
    TaskStatus,
    TtsTaskPayload,
    // Repositories
    JobFilter,
    JobRepositoryPort,
    JobUpdate,
    RepositoryError,
    UploadRepositoryPort,
    VoiceRepositoryPort,
    // TTS engine
    SynthesisRequest,
    SynthesisResponse,
    TtsEnginePort,
    TtsError,
};

pub use processing::{BusyRetryHandler, BusyRetryPolicy, TtsTaskProcessor};

pub use queries::{
    handlers::{
        GetJobHandler, GetQueueStatusHandler, GetVoiceHandler, ListJobsHandler,
        ListVoicesHandler, QueueStatusView,
    },
    GetJob, GetQueueStatus, GetVoice, ListJobs, ListVoices,
};
