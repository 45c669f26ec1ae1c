//! Job Commands - TTS 任务命令

use crate::domain::TtsRequest;

/// 创建 TTS 任务命令
#[derive(Debug, Clone)]
pub struct CreateJob {
    pub request: TtsRequest,
}

/// 取消任务命令
#[derive(Debug, Clone)]
pub struct CancelJob {
    pub job_id: String,
}

/// 重试任务命令（生成新任务）
#[derive(Debug, Clone)]
pub struct RetryJob {
    pub job_id: String,
}
