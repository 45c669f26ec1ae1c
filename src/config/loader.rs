//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "TTSQ";

/// 加载应用配置
///
/// # 环境变量示例
/// - `TTSQ_SERVER__PORT=9000`
/// - `TTSQ_TTS__URL=http://tts-server:8000`
/// - `TTSQ_TTS__FAKE=true`
/// - `TTSQ_QUEUE__BUSY_BACKOFF_SECS=30`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索当前目录下的 config.toml / config.local.toml
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 300)?
        .set_default("tts.fake", false)?
        .set_default("tts.fake_delay_ms", 200)?
        .set_default("queue.busy_max_attempts", 10)?
        .set_default("queue.busy_backoff_secs", 60)?
        .set_default("database.path", "data/ttsq.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.audio_dir", "data/audio")?
        .set_default("storage.uploads_dir", "data/uploads")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符为双下划线，例如 TTSQ_TTS__URL
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !config.tts.fake && config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.queue.busy_max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Busy retry attempts must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.tts.fake {
        tracing::info!("TTS: fake engine ({}ms delay)", config.tts.fake_delay_ms);
    } else {
        tracing::info!("TTS URL: {}", config.tts.url);
        tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    }
    tracing::info!(
        "Busy Retry: {} attempts, {}s backoff",
        config.queue.busy_max_attempts,
        config.queue.busy_backoff_secs
    );
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Uploads Directory: {:?}", config.storage.uploads_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
