//! SQLite Upload Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::job_repo::{format_time, parse_time};
use super::DbPool;
use crate::application::ports::{RepositoryError, UploadRepositoryPort};
use crate::domain::{AudioFormat, Upload};

/// SQLite Upload Repository
pub struct SqliteUploadRepository {
    pool: DbPool,
}

impl SqliteUploadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UploadRow {
    id: String,
    file_name: String,
    content_type: String,
    format: String,
    size_bytes: i64,
    duration_seconds: Option<f64>,
    created_at: String,
}

impl TryFrom<UploadRow> for Upload {
    type Error = RepositoryError;

    fn try_from(row: UploadRow) -> Result<Self, Self::Error> {
        let format = AudioFormat::from_extension(&row.format).ok_or_else(|| {
            RepositoryError::SerializationError(format!("Unknown audio format: {}", row.format))
        })?;

        Ok(Upload {
            id: row.id,
            file_name: row.file_name,
            content_type: row.content_type,
            format,
            size_bytes: row.size_bytes.max(0) as u64,
            duration_seconds: row.duration_seconds,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

#[async_trait]
impl UploadRepositoryPort for SqliteUploadRepository {
    async fn add(&self, upload: &Upload) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO uploads (id, file_name, content_type, format, size_bytes, duration_seconds, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&upload.id)
        .bind(&upload.file_name)
        .bind(&upload.content_type)
        .bind(upload.format.extension())
        .bind(upload.size_bytes as i64)
        .bind(upload.duration_seconds)
        .bind(format_time(&upload.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(upload.id.clone())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        })?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Upload>, RepositoryError> {
        let row: Option<UploadRow> = sqlx::query_as(
            r#"
            SELECT id, file_name, content_type, format, size_bytes, duration_seconds, created_at
            FROM uploads WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Upload::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
