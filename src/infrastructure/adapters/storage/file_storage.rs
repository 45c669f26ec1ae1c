//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioStorageError, AudioStoragePort};

/// 文件系统音频存储
///
/// - output_dir: 合成结果 `<stem>.wav`
/// - uploads_dir: 上传文件 `<upload_id>.<ext>`
pub struct FileAudioStorage {
    output_dir: PathBuf,
    uploads_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储（目录不存在时自动创建）
    pub async fn new(
        output_dir: impl AsRef<Path>,
        uploads_dir: impl AsRef<Path>,
    ) -> Result<Self, AudioStorageError> {
        let storage = Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            uploads_dir: uploads_dir.as_ref().to_path_buf(),
        };

        for dir in [&storage.output_dir, &storage.uploads_dir] {
            fs::create_dir_all(dir).await.map_err(io_error)?;
        }

        Ok(storage)
    }

    fn upload_path(&self, stored_name: &str) -> Result<PathBuf, AudioStorageError> {
        check_file_name(stored_name)?;
        Ok(self.uploads_dir.join(stored_name))
    }
}

fn io_error(e: std::io::Error) -> AudioStorageError {
    AudioStorageError::IoError(e.to_string())
}

fn not_found_or_io(e: std::io::Error, path: &Path) -> AudioStorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AudioStorageError::FileNotFound(path.to_string_lossy().to_string())
    } else {
        io_error(e)
    }
}

/// 只允许单层文件名，拒绝路径穿越
fn check_file_name(name: &str) -> Result<(), AudioStorageError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(AudioStorageError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn save_output(&self, stem: &str, data: &[u8]) -> Result<String, AudioStorageError> {
        let file_name = format!("{}.wav", stem);
        let path = self.output_path(&file_name)?;

        fs::write(&path, data).await.map_err(io_error)?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Saved audio"
        );

        Ok(file_name)
    }

    fn output_path(&self, file_name: &str) -> Result<PathBuf, AudioStorageError> {
        check_file_name(file_name)?;
        Ok(self.output_dir.join(file_name))
    }

    async fn save_upload(&self, stored_name: &str, data: &[u8]) -> Result<(), AudioStorageError> {
        let path = self.upload_path(stored_name)?;
        fs::write(&path, data).await.map_err(io_error)?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved upload");
        Ok(())
    }

    async fn read_upload(&self, stored_name: &str) -> Result<Vec<u8>, AudioStorageError> {
        let path = self.upload_path(stored_name)?;
        fs::read(&path).await.map_err(|e| not_found_or_io(e, &path))
    }

    async fn delete_upload(&self, stored_name: &str) -> Result<(), AudioStorageError> {
        let path = self.upload_path(stored_name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, &path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(root: &Path) -> FileAudioStorage {
        FileAudioStorage::new(root.join("audio"), root.join("uploads"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_output() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;

        let file_name = storage.save_output("job-1", b"fake wav data").await.unwrap();
        assert_eq!(file_name, "job-1.wav");

        let path = storage.output_path(&file_name).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"fake wav data");
    }

    #[tokio::test]
    async fn test_upload_lifecycle() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;

        storage.save_upload("up-1.mp3", b"emotion").await.unwrap();
        assert!(temp_dir.path().join("uploads/up-1.mp3").exists());
        assert_eq!(storage.read_upload("up-1.mp3").await.unwrap(), b"emotion");

        storage.delete_upload("up-1.mp3").await.unwrap();
        assert!(matches!(
            storage.read_upload("up-1.mp3").await,
            Err(AudioStorageError::FileNotFound(_))
        ));
        assert!(matches!(
            storage.delete_upload("up-1.mp3").await,
            Err(AudioStorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;

        for name in ["../secret.wav", "a/b.wav", ".hidden", ""] {
            assert!(matches!(
                storage.output_path(name),
                Err(AudioStorageError::InvalidFileName(_))
            ));
        }
        assert!(storage.read_upload("../../etc/passwd").await.is_err());
        assert!(storage.save_upload("../escape.wav", b"x").await.is_err());
        assert!(storage.delete_upload("..").await.is_err());
    }
}
