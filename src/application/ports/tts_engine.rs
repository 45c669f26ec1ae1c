//! TTS Engine Port - TTS 合成引擎抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TtsMode;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    /// 后端达到自身并发上限，稍后可重试
    #[error("TTS service busy: {0}")]
    Busy(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// TTS 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 合成模式
    pub mode: TtsMode,
    /// 要合成的文本内容
    pub text: String,
    /// 音色参考音频（WAV 字节）
    pub speaker_audio: Vec<u8>,
    /// 情感参考音频（reference 模式）
    pub emotion_audio: Option<Vec<u8>>,
    /// 情感向量（vector 模式）
    pub emotion_factors: Option<Vec<f32>>,
    /// 情感描述（text 模式）
    pub emotion_text: Option<String>,
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// 合成的 WAV 数据
    pub audio_data: Vec<u8>,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行一次 TTS 合成
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;
}
