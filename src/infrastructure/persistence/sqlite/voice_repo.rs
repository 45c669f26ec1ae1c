//! SQLite Voice Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::job_repo::{format_time, parse_time};
use super::DbPool;
use crate::application::ports::{RepositoryError, VoiceRepositoryPort};
use crate::domain::Voice;

const VOICE_COLUMNS: &str = "id, name, description, upload_id, created_at, updated_at";

/// SQLite Voice Repository
pub struct SqliteVoiceRepository {
    pool: DbPool,
}

impl SqliteVoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VoiceRow {
    id: String,
    name: String,
    description: Option<String>,
    upload_id: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<VoiceRow> for Voice {
    type Error = RepositoryError;

    fn try_from(row: VoiceRow) -> Result<Self, Self::Error> {
        Ok(Voice {
            id: row.id,
            name: row.name,
            description: row.description,
            upload_id: row.upload_id,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl VoiceRepositoryPort for SqliteVoiceRepository {
    async fn save(&self, voice: &Voice) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO voices (id, name, description, upload_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&voice.id)
        .bind(&voice.name)
        .bind(&voice.description)
        .bind(&voice.upload_id)
        .bind(format_time(&voice.created_at))
        .bind(format_time(&voice.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(voice.name.clone())
            }
            other => db_error(other),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Voice>, RepositoryError> {
        let row: Option<VoiceRow> =
            sqlx::query_as(&format!("SELECT {} FROM voices WHERE id = ?", VOICE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(Voice::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Voice>, RepositoryError> {
        let row: Option<VoiceRow> =
            sqlx::query_as(&format!("SELECT {} FROM voices WHERE name = ?", VOICE_COLUMNS))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(Voice::try_from).transpose()
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Voice>, RepositoryError> {
        let rows: Vec<VoiceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM voices ORDER BY created_at DESC LIMIT ? OFFSET ?",
            VOICE_COLUMNS
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Voice::try_from).collect()
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM voices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn repo() -> SqliteVoiceRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteVoiceRepository::new(pool)
    }

    #[tokio::test]
    async fn test_save_and_find_voice() {
        let repo = repo().await;

        let voice = Voice::new("Narrator", Some("calm".to_string()), "up-1").unwrap();
        repo.save(&voice).await.unwrap();

        let found = repo.find_by_id(&voice.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Narrator");
        assert_eq!(found.description.as_deref(), Some("calm"));
        assert_eq!(found.upload_id, "up-1");

        let by_name = repo.find_by_name("Narrator").await.unwrap().unwrap();
        assert_eq!(by_name.id, voice.id);
        assert!(repo.find_by_id("other").await.unwrap().is_none());
        assert!(repo.find_by_name("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repo = repo().await;
        repo.save(&Voice::new("Narrator", None, "up-1").unwrap())
            .await
            .unwrap();

        let err = repo
            .save(&Voice::new("Narrator", None, "up-2").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let repo = repo().await;
        let base = chrono::Utc::now();
        for i in 0..3 {
            let mut voice = Voice::new(&format!("voice-{}", i), None, "up").unwrap();
            voice.created_at = base + Duration::seconds(i);
            voice.updated_at = voice.created_at;
            repo.save(&voice).await.unwrap();
        }

        let names: Vec<String> = repo
            .list(2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["voice-2", "voice-1"]);
        assert_eq!(repo.list(20, 2).await.unwrap().len(), 1);

        let oldest = repo.list(1, 2).await.unwrap().remove(0);
        assert!(repo.delete(&oldest.id).await.unwrap());
        assert!(!repo.delete(&oldest.id).await.unwrap());
        assert_eq!(repo.list(20, 0).await.unwrap().len(), 2);
    }
}
