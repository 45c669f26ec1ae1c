//! SQLite Job Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{JobFilter, JobRepositoryPort, JobUpdate, RepositoryError};
use crate::domain::{JobStatus, JobType, TtsJob};

/// SQLite Job Repository
///
/// request / result / error 以 JSON 文本存储
pub struct SqliteJobRepository {
    pool: DbPool,
}

impl SqliteJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct JobRow {
    id: String,
    #[sqlx(rename = "type")]
    job_type: String,
    status: String,
    created_at: String,
    updated_at: String,
    request: Option<String>,
    result: Option<String>,
    error: Option<String>,
}

/// 固定精度，保证按文本排序与时间顺序一致
pub(super) fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(super) fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
        .with_timezone(&Utc))
}

fn to_json<T: Serialize>(value: &Option<T>) -> Result<Option<String>, RepositoryError> {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(value: Option<String>) -> Result<Option<T>, RepositoryError> {
    value
        .map(|v| serde_json::from_str(&v))
        .transpose()
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<JobRow> for TtsJob {
    type Error = RepositoryError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(TtsJob {
            job_type: JobType::parse(&row.job_type).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown job type: {}", row.job_type))
            })?,
            status: JobStatus::parse(&row.status).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown job status: {}", row.status))
            })?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
            request: from_json(row.request)?,
            result: from_json(row.result)?,
            error: from_json(row.error)?,
            id: row.id,
        })
    }
}

const JOB_COLUMNS: &str = "id, type, status, created_at, updated_at, request, result, error";

#[async_trait]
impl JobRepositoryPort for SqliteJobRepository {
    async fn get(&self, id: &str) -> Result<Option<TtsJob>, RepositoryError> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {} FROM tts_jobs WHERE id = ?", JOB_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(TtsJob::try_from).transpose()
    }

    async fn add(&self, job: &TtsJob) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO tts_jobs (id, type, status, created_at, updated_at, request, result, error)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(job.job_type.as_str())
        .bind(job.status.as_str())
        .bind(format_time(&job.created_at))
        .bind(format_time(&job.updated_at))
        .bind(to_json(&job.request)?)
        .bind(to_json(&job.result)?)
        .bind(to_json(&job.error)?)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(job.id.clone())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        })?;

        Ok(())
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE tts_jobs SET
                status = COALESCE(?, status),
                result = COALESCE(?, result),
                error = COALESCE(?, error),
                updated_at = COALESCE(?, updated_at)
            WHERE id = ?
            "#,
        )
        .bind(update.status.map(|s| s.as_str()))
        .bind(to_json(&update.result)?)
        .bind(to_json(&update.error)?)
        .bind(update.updated_at.as_ref().map(format_time))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: JobFilter) -> Result<Vec<TtsJob>, RepositoryError> {
        let status = filter.status.map(|s| s.as_str());

        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tts_jobs WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC LIMIT ? OFFSET ?",
            JOB_COLUMNS
        ))
        .bind(status)
        .bind(status)
        .bind(filter.limit as i64)
        .bind(filter.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TtsJob::try_from).collect()
    }
}
