//! Audio Storage Port - 出站端口
//!
//! 定义音频文件读写的抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port
///
/// 合成结果和上传文件分目录存放，文件名都由调用方生成
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 保存合成结果，返回文件名
    async fn save_output(&self, stem: &str, data: &[u8]) -> Result<String, AudioStorageError>;

    /// 合成结果的完整路径（文件名不合法时返回错误）
    fn output_path(&self, file_name: &str) -> Result<PathBuf, AudioStorageError>;

    /// 保存上传文件
    async fn save_upload(&self, stored_name: &str, data: &[u8]) -> Result<(), AudioStorageError>;

    /// 读取上传文件（音色参考音频、情感参考音频）
    async fn read_upload(&self, stored_name: &str) -> Result<Vec<u8>, AudioStorageError>;

    /// 删除上传文件
    async fn delete_upload(&self, stored_name: &str) -> Result<(), AudioStorageError>;
}
