//! TTS Task Processor - 执行一次 TTS 合成任务

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    AudioStorageError, AudioStoragePort, HandlerError, SynthesisRequest, TaskHandler,
    TtsEnginePort, TtsError, TtsTaskPayload, UploadRepositoryPort, VoiceRepositoryPort,
};
use crate::domain::{JobResult, TtsMode};

/// TTS 任务处理器
///
/// 流程：解析载荷 → 查找音色 → 读取参考音频 → 调用合成引擎 → 保存音频
pub struct TtsTaskProcessor {
    tts_engine: Arc<dyn TtsEnginePort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    upload_repo: Arc<dyn UploadRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl TtsTaskProcessor {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        upload_repo: Arc<dyn UploadRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            tts_engine,
            voice_repo,
            upload_repo,
            storage,
        }
    }

    /// 按上传 ID 读取音频内容
    async fn read_upload(&self, upload_id: &str) -> Result<Vec<u8>, HandlerError> {
        let upload = self
            .upload_repo
            .get(upload_id)
            .await
            .map_err(|e| HandlerError::Failed(e.to_string()))?
            .ok_or_else(|| HandlerError::Failed(format!("Upload {} not found", upload_id)))?;

        self.storage
            .read_upload(&upload.stored_name())
            .await
            .map_err(storage_error)
    }

    async fn build_request(&self, payload: TtsTaskPayload) -> Result<SynthesisRequest, HandlerError> {
        let request = payload.request;
        request
            .validate()
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;

        let voice = self
            .voice_repo
            .find_by_id(&request.voice_id)
            .await
            .map_err(|e| HandlerError::Failed(e.to_string()))?
            .ok_or_else(|| HandlerError::Failed(format!("Voice {} not found", request.voice_id)))?;

        let speaker_audio = self.read_upload(&voice.upload_id).await?;

        let emotion_audio = match (request.mode, request.emotion_audio_id.as_deref()) {
            (TtsMode::Reference, Some(upload_id)) => Some(self.read_upload(upload_id).await?),
            _ => None,
        };

        Ok(SynthesisRequest {
            mode: request.mode,
            text: request.text,
            speaker_audio,
            emotion_audio,
            emotion_factors: request.emotion_factors,
            emotion_text: request.emotion_text,
        })
    }
}

#[async_trait]
impl TaskHandler for TtsTaskProcessor {
    async fn handle(&self, payload: Value) -> Result<Value, HandlerError> {
        let payload = TtsTaskPayload::from_value(payload)?;
        let synthesis = self.build_request(payload).await?;

        tracing::debug!(
            mode = synthesis.mode.as_str(),
            text_len = synthesis.text.chars().count(),
            "Synthesizing"
        );

        let response = self
            .tts_engine
            .synthesize(synthesis)
            .await
            .map_err(engine_error)?;

        let file_name = self
            .storage
            .save_output(&Uuid::new_v4().to_string(), &response.audio_data)
            .await
            .map_err(storage_error)?;

        tracing::info!(
            file = %file_name,
            bytes = response.audio_data.len(),
            "Audio saved"
        );

        let result = JobResult {
            audio_url: format!("/api/v1/audio/{}", file_name),
            duration_seconds: response.duration_ms.map(|ms| ms as f64 / 1000.0),
            format: "wav".to_string(),
        };

        serde_json::to_value(&result).map_err(|e| HandlerError::Failed(e.to_string()))
    }
}

/// 只有 Busy 可重试，其它引擎错误都是终态失败
fn engine_error(err: TtsError) -> HandlerError {
    match err {
        TtsError::Busy(msg) => HandlerError::Busy(msg),
        other => HandlerError::Failed(other.to_string()),
    }
}

fn storage_error(err: AudioStorageError) -> HandlerError {
    HandlerError::Failed(err.to_string())
}
