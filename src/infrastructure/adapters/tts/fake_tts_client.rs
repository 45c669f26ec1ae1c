//! Fake TTS Client - 用于开发和测试的 TTS 客户端
//!
//! 不调用 TTS 服务，返回一段静音 WAV

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 返回的音频时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 模拟合成延迟
    pub delay: Duration,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            sample_rate: 22050,
            delay: Duration::from_millis(200),
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 预先生成的音频数据
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        let audio_data = silent_wav(config.sample_rate, config.duration_ms);
        tracing::info!(
            duration_ms = config.duration_ms,
            sample_rate = config.sample_rate,
            "FakeTtsClient initialized"
        );
        Self { config, audio_data }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }
}

/// 生成 16-bit 单声道静音 WAV
fn silent_wav(sample_rate: u32, duration_ms: u64) -> Vec<u8> {
    let samples = (sample_rate as u64 * duration_ms / 1000) as u32;
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        tracing::debug!(
            mode = request.mode.as_str(),
            text_len = request.text.len(),
            "FakeTtsClient: returning silent audio"
        );

        tokio::time::sleep(self.config.delay).await;

        Ok(SynthesisResponse {
            audio_data: self.audio_data.clone(),
            duration_ms: Some(self.config.duration_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TtsMode;

    #[test]
    fn test_silent_wav_header() {
        let wav = silent_wav(8000, 500);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 8000 * 0.5s * 2 bytes
        assert_eq!(wav.len(), 44 + 8000);
        assert!(wav[44..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_synthesize_returns_audio() {
        let client = FakeTtsClient::new(FakeTtsClientConfig {
            delay: Duration::ZERO,
            ..Default::default()
        });
        let response = client
            .synthesize(SynthesisRequest {
                mode: TtsMode::Speaker,
                text: "hello".to_string(),
                speaker_audio: Vec::new(),
                emotion_audio: None,
                emotion_factors: None,
                emotion_text: None,
            })
            .await
            .unwrap();

        assert_eq!(response.duration_ms, Some(1000));
        assert_eq!(&response.audio_data[0..4], b"RIFF");
    }
}
