//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateUpload, CreateVoice, DeleteVoice};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, RepositoryError, UploadRepositoryPort, VoiceRepositoryPort,
};
use crate::domain::{Upload, Voice};

// ============================================================================
// CreateUpload
// ============================================================================

/// CreateUpload Handler
///
/// 先写文件再写记录，记录写入失败时删除刚写入的文件
pub struct CreateUploadHandler {
    upload_repo: Arc<dyn UploadRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl CreateUploadHandler {
    pub fn new(upload_repo: Arc<dyn UploadRepositoryPort>, storage: Arc<dyn AudioStoragePort>) -> Self {
        Self {
            upload_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: CreateUpload) -> Result<Upload, ApplicationError> {
        let upload = Upload::accept(
            command.file_name.as_deref(),
            command.content_type.as_deref(),
            command.data.len(),
        )?;
        let stored_name = upload.stored_name();

        self.storage.save_upload(&stored_name, &command.data).await?;

        if let Err(e) = self.upload_repo.add(&upload).await {
            if let Err(cleanup) = self.storage.delete_upload(&stored_name).await {
                tracing::warn!(file = %stored_name, error = %cleanup, "Failed to remove orphan upload");
            }
            return Err(e.into());
        }

        tracing::info!(
            upload_id = %upload.id,
            file_name = %upload.file_name,
            bytes = upload.size_bytes,
            "Upload saved"
        );

        Ok(upload)
    }
}

// ============================================================================
// CreateVoice
// ============================================================================

/// CreateVoice Handler
pub struct CreateVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    upload_repo: Arc<dyn UploadRepositoryPort>,
}

impl CreateVoiceHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        upload_repo: Arc<dyn UploadRepositoryPort>,
    ) -> Self {
        Self {
            voice_repo,
            upload_repo,
        }
    }

    pub async fn handle(&self, command: CreateVoice) -> Result<Voice, ApplicationError> {
        if self.upload_repo.get(&command.upload_id).await?.is_none() {
            return Err(ApplicationError::validation(format!(
                "Upload {} does not exist",
                command.upload_id
            )));
        }

        let voice = Voice::new(&command.name, command.description, command.upload_id)?;

        if self.voice_repo.find_by_name(&voice.name).await?.is_some() {
            return Err(ApplicationError::validation("Voice name already exists"));
        }

        // 并发创建同名音色时由唯一索引兜底
        self.voice_repo.save(&voice).await.map_err(|e| match e {
            RepositoryError::Duplicate(_) => ApplicationError::validation("Voice name already exists"),
            other => other.into(),
        })?;

        tracing::info!(voice_id = %voice.id, name = %voice.name, "Voice created");

        Ok(voice)
    }
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler
///
/// 删除音色、其上传记录和磁盘文件。文件删除失败只记录警告。
pub struct DeleteVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    upload_repo: Arc<dyn UploadRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteVoiceHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        upload_repo: Arc<dyn UploadRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            voice_repo,
            upload_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let voice = self
            .voice_repo
            .find_by_id(&command.voice_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Voice", &command.voice_id))?;

        self.voice_repo.delete(&voice.id).await?;

        match self.upload_repo.get(&voice.upload_id).await? {
            Some(upload) => {
                self.upload_repo.delete(&upload.id).await?;
                if let Err(e) = self.storage.delete_upload(&upload.stored_name()).await {
                    tracing::warn!(
                        upload_id = %upload.id,
                        error = %e,
                        "Failed to delete reference audio file"
                    );
                }
            }
            None => {
                tracing::warn!(upload_id = %voice.upload_id, "Reference upload already gone");
            }
        }

        tracing::info!(voice_id = %voice.id, "Voice deleted");

        Ok(())
    }
}
