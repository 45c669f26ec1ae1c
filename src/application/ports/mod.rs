//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod queue_manager;
mod repositories;
mod sleeper;
mod status_callback;
mod task_handler;
mod tts_engine;

pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use queue_manager::{QueueError, QueueManagerPort, StatusRecord, TaskStatus};
pub use repositories::{
    JobFilter, JobRepositoryPort, JobUpdate, RepositoryError, UploadRepositoryPort,
    VoiceRepositoryPort,
};
pub use sleeper::Sleeper;
pub use status_callback::{CallbackError, StatusChangeCallback};
pub use task_handler::{HandlerError, TaskHandler, TtsTaskPayload};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
