//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 单个上传文件的大小上限（20MB）
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: [&str; 3] = ["audio/wav", "audio/mpeg", "audio/mp4"];

/// 允许上传的音频格式，与文件扩展名一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Mp4,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Mp4 => "mp4",
        }
    }

    /// 扩展名不区分大小写
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            "mp4" => Some(AudioFormat::Mp4),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// 只比较 MIME 主体部分，忽略 `; codecs=...` 之类的参数
pub fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
}
