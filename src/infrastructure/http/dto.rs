//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::{JobFailure, JobResult, TtsJob, TtsRequest, Upload, Voice};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Job DTOs
// ============================================================================

/// 创建任务请求，字段与 TtsRequest 相同
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(flatten)]
    pub request: TtsRequest,
}

/// 任务列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: &'static str,
    pub status: &'static str,
    pub created_at: String,
    pub updated_at: String,
    pub request: Option<TtsRequest>,
    pub result: Option<JobResult>,
    pub error: Option<JobFailure>,
}

impl From<TtsJob> for JobResponse {
    fn from(job: TtsJob) -> Self {
        Self {
            id: job.id,
            job_type: job.job_type.as_str(),
            status: job.status.as_str(),
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            request: job.request,
            result: job.result,
            error: job.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<JobResponse>,
}

// ============================================================================
// Upload / Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub duration_seconds: Option<f64>,
    pub created_at: String,
}

impl From<Upload> for UploadResponse {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            file_name: upload.file_name,
            content_type: upload.content_type,
            size_bytes: upload.size_bytes,
            duration_seconds: upload.duration_seconds,
            created_at: upload.created_at.to_rfc3339(),
        }
    }
}

/// 创建音色请求
#[derive(Debug, Deserialize)]
pub struct CreateVoiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub upload_id: String,
}

/// 音色列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListVoicesParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub upload_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Voice> for VoiceResponse {
    fn from(voice: Voice) -> Self {
        Self {
            id: voice.id,
            name: voice.name,
            description: voice.description,
            upload_id: voice.upload_id,
            created_at: voice.created_at.to_rfc3339(),
            updated_at: voice.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub total: usize,
    pub voices: Vec<VoiceResponse>,
}
