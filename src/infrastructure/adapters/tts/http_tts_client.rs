//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST {base_url}/synthesize/{speaker|reference|vector|text}
//! Request: {"text": "...", "prompt_audio": "<base64 wav>", ...}  (JSON)
//! Response: "<base64 wav>"  (JSON string)
//! 429 / 503 表示服务繁忙

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// 每段最大 token 数（服务端默认值）
const MAX_TEXT_TOKENS_PER_SEGMENT: u32 = 120;
/// reference 模式的情感权重
const EMOTION_WEIGHT: f32 = 0.8;

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest {
    /// 要合成的文本
    text: String,
    /// 音色参考音频（base64）
    prompt_audio: String,
    max_text_tokens_per_segment: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion_audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion_weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion_factors: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion_random: Option<bool>,
}

impl TtsHttpRequest {
    fn from_synthesis(request: SynthesisRequest) -> Self {
        let emotion_weight = request.emotion_audio.as_ref().map(|_| EMOTION_WEIGHT);
        let emotion_random = (request.emotion_factors.is_some() || request.emotion_text.is_some())
            .then_some(false);

        Self {
            text: request.text,
            prompt_audio: BASE64.encode(&request.speaker_audio),
            max_text_tokens_per_segment: MAX_TEXT_TOKENS_PER_SEGMENT,
            emotion_audio: request.emotion_audio.map(|audio| BASE64.encode(audio)),
            emotion_weight,
            emotion_factors: request.emotion_factors,
            emotion_text: request.emotion_text,
            emotion_random,
        }
    }
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
///
/// 通过 HTTP 调用外部 TTS 服务。繁忙重试由应用层的 BusyRetryHandler 负责，
/// 这里只负责把 429 / 503 识别为 `TtsError::Busy`。
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn synthesize_url(&self, mode: &str) -> String {
        format!(
            "{}/synthesize/{}",
            self.config.base_url.trim_end_matches('/'),
            mode
        )
    }
}

/// 服务端并发已满
fn is_busy_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

/// 响应体是 base64 编码的 WAV 字符串
fn decode_audio(body: &str) -> Result<Vec<u8>, TtsError> {
    let encoded: String = serde_json::from_str(body)
        .map_err(|e| TtsError::InvalidResponse(format!("Expected base64 string: {}", e)))?;
    BASE64
        .decode(encoded.trim())
        .map_err(|e| TtsError::InvalidResponse(format!("Invalid base64 audio: {}", e)))
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let url = self.synthesize_url(request.mode.as_str());
        let http_request = TtsHttpRequest::from_synthesis(request);

        tracing::debug!(
            url = %url,
            text_len = http_request.text.len(),
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(&url)
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if is_busy_status(status) {
            return Err(TtsError::Busy(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        let audio_data = decode_audio(&body)?;

        tracing::info!(audio_size = audio_data.len(), "TTS synthesis completed");

        Ok(SynthesisResponse {
            audio_data,
            duration_ms: None,
        })
    }
}
