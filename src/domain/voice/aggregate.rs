//! Voice Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_allowed_content_type, AudioFormat, VoiceError, MAX_UPLOAD_BYTES};

/// 上传的音频文件
///
/// 磁盘上的文件名为 `<id>.<ext>`，`file_name` 只保留客户端给出的原始名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    pub format: AudioFormat,
    pub size_bytes: u64,
    /// 暂不分析音频时长
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Upload {
    /// 校验文件名、类型和大小，通过后生成新的上传记录
    ///
    /// 校验顺序：文件名 → 扩展名 → Content-Type → 大小
    pub fn accept(
        file_name: Option<&str>,
        content_type: Option<&str>,
        size_bytes: usize,
    ) -> Result<Self, VoiceError> {
        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(VoiceError::MissingFileName)?;
        let format = AudioFormat::from_file_name(file_name)
            .ok_or_else(|| VoiceError::UnsupportedExtension(file_name.to_string()))?;

        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .ok_or(VoiceError::MissingContentType)?;
        if !is_allowed_content_type(content_type) {
            return Err(VoiceError::UnsupportedContentType(content_type.to_string()));
        }

        if size_bytes > MAX_UPLOAD_BYTES {
            return Err(VoiceError::TooLarge {
                size: size_bytes,
                max: MAX_UPLOAD_BYTES,
            });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            format,
            size_bytes: size_bytes as u64,
            duration_seconds: None,
            created_at: Utc::now(),
        })
    }

    /// 存储层使用的文件名
    pub fn stored_name(&self) -> String {
        format!("{}.{}", self.id, self.format.extension())
    }
}

/// 音色
///
/// 不变量:
/// - 名称去除首尾空白后非空，且全局唯一（唯一性由应用层检查）
/// - 参考音频是一个已存在的上传文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub upload_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Voice {
    pub fn new(
        name: &str,
        description: Option<String>,
        upload_id: impl Into<String>,
    ) -> Result<Self, VoiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VoiceError::InvalidName("name must not be empty".to_string()));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            upload_id: upload_id.into(),
            created_at: now,
            updated_at: now,
        })
    }
}
