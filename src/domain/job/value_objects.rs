//! Job Context - Value Objects

use serde::{Deserialize, Serialize};

use super::JobError;

/// 任务状态
///
/// 初始状态为 `Queued`，终态为 `Succeeded` / `Failed` / `Cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 排队中
    Queued,
    /// 合成中
    Running,
    /// 合成成功
    Succeeded,
    /// 合成失败
    Failed,
    /// 已取消
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(JobStatus::Queued),
            "running" => Some(JobStatus::Running),
            "succeeded" => Some(JobStatus::Succeeded),
            "failed" => Some(JobStatus::Failed),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// 只有排队中或合成中的任务可以取消
    pub fn can_cancel(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// 只有失败或已取消的任务可以重试
    pub fn can_retry(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Tts,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Tts => "tts",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tts" => Some(JobType::Tts),
            _ => None,
        }
    }
}

/// 合成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsMode {
    /// 音色克隆
    Speaker,
    /// 参考音频情感
    Reference,
    /// 情感向量
    Vector,
    /// 情感描述文本
    Text,
}

impl TtsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsMode::Speaker => "speaker",
            TtsMode::Reference => "reference",
            TtsMode::Vector => "vector",
            TtsMode::Text => "text",
        }
    }
}

/// 情感向量维度
pub const EMOTION_VECTOR_LEN: usize = 8;

/// 合成请求
///
/// 创建任务时的原始请求，重试时原样克隆到新任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    pub mode: TtsMode,
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_audio_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_factors: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_text: Option<String>,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>, mode: TtsMode, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode,
            voice_id: voice_id.into(),
            emotion_audio_id: None,
            emotion_factors: None,
            emotion_text: None,
        }
    }

    /// 校验请求参数与模式是否匹配
    pub fn validate(&self) -> Result<(), JobError> {
        if self.text.trim().is_empty() {
            return Err(JobError::InvalidRequest("text cannot be empty".to_string()));
        }
        if self.voice_id.is_empty() {
            return Err(JobError::InvalidRequest("voice_id is required".to_string()));
        }

        match self.mode {
            TtsMode::Speaker => {
                if self.emotion_audio_id.is_some()
                    || self.emotion_factors.is_some()
                    || self.emotion_text.is_some()
                {
                    return Err(JobError::InvalidRequest(
                        "speaker mode does not accept emotion parameters".to_string(),
                    ));
                }
            }
            TtsMode::Reference => {
                if self.emotion_audio_id.is_none() {
                    return Err(JobError::InvalidRequest(
                        "emotion_audio_id is required for reference mode".to_string(),
                    ));
                }
            }
            TtsMode::Vector => match &self.emotion_factors {
                Some(factors) if factors.len() == EMOTION_VECTOR_LEN => {}
                Some(factors) => {
                    return Err(JobError::InvalidRequest(format!(
                        "emotion_factors must have {} values, got {}",
                        EMOTION_VECTOR_LEN,
                        factors.len()
                    )));
                }
                None => {
                    return Err(JobError::InvalidRequest(
                        "emotion_factors is required for vector mode".to_string(),
                    ));
                }
            },
            TtsMode::Text => {
                if self
                    .emotion_text
                    .as_deref()
                    .map(|t| t.trim().is_empty())
                    .unwrap_or(true)
                {
                    return Err(JobError::InvalidRequest(
                        "emotion_text is required for text mode".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// 合成结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub audio_url: String,
    pub duration_seconds: Option<f64>,
    pub format: String,
}

/// 任务失败信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub code: String,
    pub message: String,
}

impl JobFailure {
    pub const TTS_ERROR: &'static str = "TTS_ERROR";

    pub fn tts(message: impl Into<String>) -> Self {
        Self {
            code: Self::TTS_ERROR.to_string(),
            message: message.into(),
        }
    }
}
