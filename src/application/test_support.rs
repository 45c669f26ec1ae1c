//! Test-only in-memory implementations of the repository and storage ports.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{
    AudioStorageError, AudioStoragePort, JobFilter, JobRepositoryPort, JobUpdate,
    QueueManagerPort, RepositoryError, UploadRepositoryPort, VoiceRepositoryPort,
};
use crate::domain::{AudioFormat, TtsJob, TtsMode, TtsRequest, Upload, Voice};
use crate::infrastructure::memory::{task_queue, InMemoryQueueManager, TaskQueueReceiver};

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: DashMap<String, TtsJob>,
}

impl InMemoryJobRepository {
    pub fn snapshot(&self, id: &str) -> Option<TtsJob> {
        self.jobs.get(id).map(|j| j.clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

#[async_trait]
impl JobRepositoryPort for InMemoryJobRepository {
    async fn get(&self, id: &str) -> Result<Option<TtsJob>, RepositoryError> {
        Ok(self.snapshot(id))
    }

    async fn add(&self, job: &TtsJob) -> Result<(), RepositoryError> {
        if self.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Duplicate(job.id.clone()));
        }
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<bool, RepositoryError> {
        let Some(mut job) = self.jobs.get_mut(id) else {
            return Ok(false);
        };
        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(result) = update.result {
            job.result = Some(result);
        }
        if let Some(error) = update.error {
            job.error = Some(error);
        }
        if let Some(updated_at) = update.updated_at {
            job.updated_at = updated_at;
        }
        Ok(true)
    }

    async fn list(&self, filter: JobFilter) -> Result<Vec<TtsJob>, RepositoryError> {
        let mut jobs: Vec<TtsJob> = self
            .jobs
            .iter()
            .map(|j| j.clone())
            .filter(|j| filter.status.map(|s| s == j.status).unwrap_or(true))
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryVoiceRepository {
    voices: DashMap<String, Voice>,
}

impl InMemoryVoiceRepository {
    /// 预置一个音色，其参考音频为 `upload-<id>`
    pub fn with_voice(id: &str) -> Self {
        let repo = Self::default();
        repo.voices.insert(id.to_string(), sample_voice(id));
        repo
    }

    pub fn contains(&self, id: &str) -> bool {
        self.voices.contains_key(id)
    }
}

#[async_trait]
impl VoiceRepositoryPort for InMemoryVoiceRepository {
    async fn save(&self, voice: &Voice) -> Result<(), RepositoryError> {
        if self.voices.iter().any(|v| v.name == voice.name) {
            return Err(RepositoryError::Duplicate(voice.name.clone()));
        }
        self.voices.insert(voice.id.clone(), voice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Voice>, RepositoryError> {
        Ok(self.voices.get(id).map(|v| v.clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Voice>, RepositoryError> {
        Ok(self.voices.iter().find(|v| v.name == name).map(|v| v.clone()))
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Voice>, RepositoryError> {
        let mut voices: Vec<Voice> = self.voices.iter().map(|v| v.clone()).collect();
        voices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(voices
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.voices.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryUploadRepository {
    pub uploads: DashMap<String, Upload>,
}

impl InMemoryUploadRepository {
    pub fn with_upload(id: &str) -> Self {
        let repo = Self::default();
        repo.uploads.insert(id.to_string(), sample_upload(id));
        repo
    }

    pub fn contains(&self, id: &str) -> bool {
        self.uploads.contains_key(id)
    }
}

#[async_trait]
impl UploadRepositoryPort for InMemoryUploadRepository {
    async fn add(&self, upload: &Upload) -> Result<(), RepositoryError> {
        self.uploads.insert(upload.id.clone(), upload.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Upload>, RepositoryError> {
        Ok(self.uploads.get(id).map(|u| u.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.uploads.remove(id).is_some())
    }
}

/// 内存音频存储，合成结果和上传文件分开保存
#[derive(Default)]
pub struct InMemoryAudioStorage {
    pub outputs: DashMap<String, Vec<u8>>,
    pub uploads: DashMap<String, Vec<u8>>,
}

impl InMemoryAudioStorage {
    pub fn with_upload(stored_name: &str, data: &[u8]) -> Self {
        let storage = Self::default();
        storage.uploads.insert(stored_name.to_string(), data.to_vec());
        storage
    }
}

#[async_trait]
impl AudioStoragePort for InMemoryAudioStorage {
    async fn save_output(&self, stem: &str, data: &[u8]) -> Result<String, AudioStorageError> {
        let file_name = format!("{}.wav", stem);
        self.outputs.insert(file_name.clone(), data.to_vec());
        Ok(file_name)
    }

    fn output_path(&self, file_name: &str) -> Result<PathBuf, AudioStorageError> {
        if file_name.contains("..") || file_name.contains('/') {
            return Err(AudioStorageError::InvalidFileName(file_name.to_string()));
        }
        Ok(PathBuf::from("/nonexistent").join(file_name))
    }

    async fn save_upload(&self, stored_name: &str, data: &[u8]) -> Result<(), AudioStorageError> {
        self.uploads.insert(stored_name.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_upload(&self, stored_name: &str) -> Result<Vec<u8>, AudioStorageError> {
        self.uploads
            .get(stored_name)
            .map(|d| d.clone())
            .ok_or_else(|| AudioStorageError::FileNotFound(stored_name.to_string()))
    }

    async fn delete_upload(&self, stored_name: &str) -> Result<(), AudioStorageError> {
        self.uploads
            .remove(stored_name)
            .map(|_| ())
            .ok_or_else(|| AudioStorageError::FileNotFound(stored_name.to_string()))
    }
}

pub fn sample_upload(id: &str) -> Upload {
    Upload {
        id: id.to_string(),
        file_name: format!("{}.wav", id),
        content_type: "audio/wav".to_string(),
        format: AudioFormat::Wav,
        size_bytes: 16,
        duration_seconds: None,
        created_at: Utc::now(),
    }
}

pub fn sample_voice(id: &str) -> Voice {
    let now = Utc::now();
    Voice {
        id: id.to_string(),
        name: format!("voice {}", id),
        description: None,
        upload_id: format!("upload-{}", id),
        created_at: now,
        updated_at: now,
    }
}

/// 队列管理器加上未被消费的接收端（保持队列打开）
pub fn queue_manager() -> (Arc<InMemoryQueueManager>, TaskQueueReceiver) {
    let (tx, rx) = task_queue();
    (Arc::new(InMemoryQueueManager::new(tx)), rx)
}

pub fn as_port(manager: &Arc<InMemoryQueueManager>) -> Arc<dyn QueueManagerPort> {
    manager.clone()
}

pub fn speaker_request(voice_id: &str) -> TtsRequest {
    TtsRequest::new("测试文本", TtsMode::Speaker, voice_id)
}
