//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{JobFailure, JobResult, JobStatus, TtsJob, Upload, Voice};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Job Repository
// ============================================================================

/// 任务部分更新，未设置的字段保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub result: Option<JobResult>,
    pub error: Option<JobFailure>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn with_result(mut self, result: JobResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: JobFailure) -> Self {
        self.error = Some(error);
        self
    }
}

/// 任务列表过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: 100,
            offset: 0,
        }
    }
}

/// Job Repository Port
#[async_trait]
pub trait JobRepositoryPort: Send + Sync {
    /// 根据 ID 查找任务
    async fn get(&self, id: &str) -> Result<Option<TtsJob>, RepositoryError>;

    /// 新增任务
    async fn add(&self, job: &TtsJob) -> Result<(), RepositoryError>;

    /// 部分更新任务
    ///
    /// 任务不存在时不做任何修改并返回 `Ok(false)`：
    /// 登记任务时的 queued 回调早于应用层的 `add`
    async fn update(&self, id: &str, update: JobUpdate) -> Result<bool, RepositoryError>;

    /// 按创建时间倒序列出任务
    async fn list(&self, filter: JobFilter) -> Result<Vec<TtsJob>, RepositoryError>;
}

// ============================================================================
// Voice Repository
// ============================================================================

/// Voice Repository Port
#[async_trait]
pub trait VoiceRepositoryPort: Send + Sync {
    /// 新增音色，名称重复时返回 `Duplicate`
    async fn save(&self, voice: &Voice) -> Result<(), RepositoryError>;

    /// 根据 ID 查找音色
    async fn find_by_id(&self, id: &str) -> Result<Option<Voice>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Voice>, RepositoryError>;

    /// 按创建时间倒序分页列出音色
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Voice>, RepositoryError>;

    /// 删除音色，返回是否存在
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Upload Repository
// ============================================================================

/// Upload Repository Port
#[async_trait]
pub trait UploadRepositoryPort: Send + Sync {
    async fn add(&self, upload: &Upload) -> Result<(), RepositoryError>;

    async fn get(&self, id: &str) -> Result<Option<Upload>, RepositoryError>;

    /// 删除上传记录，返回是否存在
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}
