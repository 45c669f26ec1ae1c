//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::BusyRetryPolicy;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 队列配置
    #[serde(default)]
    pub queue: QueueConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 使用本地静音引擎代替 TTS 服务（开发用）
    #[serde(default)]
    pub fake: bool,

    /// 静音引擎的模拟延迟（毫秒）
    #[serde(default = "default_fake_delay")]
    pub fake_delay_ms: u64,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    300
}

fn default_fake_delay() -> u64 {
    200
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            fake: false,
            fake_delay_ms: default_fake_delay(),
        }
    }
}

/// 队列配置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// TTS 服务繁忙时的最大尝试次数
    #[serde(default = "default_busy_max_attempts")]
    pub busy_max_attempts: u32,

    /// 繁忙重试间隔（秒）
    #[serde(default = "default_busy_backoff")]
    pub busy_backoff_secs: u64,
}

fn default_busy_max_attempts() -> u32 {
    10
}

fn default_busy_backoff() -> u64 {
    60
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            busy_max_attempts: default_busy_max_attempts(),
            busy_backoff_secs: default_busy_backoff(),
        }
    }
}

impl QueueConfig {
    pub fn busy_retry_policy(&self) -> BusyRetryPolicy {
        BusyRetryPolicy {
            max_attempts: self.busy_max_attempts,
            backoff: Duration::from_secs(self.busy_backoff_secs),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/ttsq.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 合成音频输出目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// 上传音频目录（音色参考音频、情感参考音频）
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.tts.url, "http://localhost:8000");
        assert!(!config.tts.fake);
        assert_eq!(config.database.path, "data/ttsq.db");
        assert_eq!(config.queue.busy_max_attempts, 10);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/ttsq.db?mode=rwc");
    }

    #[test]
    fn test_busy_retry_policy() {
        let config = QueueConfig {
            busy_max_attempts: 3,
            busy_backoff_secs: 5,
        };
        let policy = config.busy_retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(5));
    }
}
