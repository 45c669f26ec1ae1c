//! Domain Layer - 领域层
//!
//! 限界上下文:
//! - Job Context: TTS 合成任务的状态机与请求模型
//! - Voice Context: 音色与上传的参考音频

pub mod job;
pub mod voice;

pub use job::{
    JobError, JobFailure, JobResult, JobStatus, JobType, TtsJob, TtsMode, TtsRequest,
};
pub use voice::{AudioFormat, Upload, Voice, VoiceError, MAX_UPLOAD_BYTES};
