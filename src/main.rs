//! ttsq - 单并发 TTS 任务代理
//!
//! 启动顺序：配置 → 日志 → 数据库 → 适配器 → 队列与 Worker → HTTP 服务

use std::sync::Arc;
use std::time::Duration;

use ttsq::application::ports::{
    AudioStoragePort, JobRepositoryPort, QueueManagerPort, TaskHandler, TtsEnginePort,
    UploadRepositoryPort, VoiceRepositoryPort,
};
use ttsq::application::{BusyRetryHandler, JobStatusHandler, TtsTaskProcessor};
use ttsq::config::{load_config, print_config, LogConfig};
use ttsq::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FileAudioStorage, HttpTtsClient, HttpTtsClientConfig,
    TokioSleeper,
};
use ttsq::infrastructure::http::{AppState, HttpServer, ServerConfig};
use ttsq::infrastructure::memory::{task_queue, InMemoryQueueManager};
use ttsq::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteJobRepository, SqliteUploadRepository,
    SqliteVoiceRepository,
};
use ttsq::infrastructure::worker::TaskWorker;

fn init_tracing(config: &LogConfig) {
    let log_filter = format!("{},ttsq={},tower_http=debug", config.level, config.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    tracing::info!("ttsq - TTS job broker v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let job_repo: Arc<dyn JobRepositoryPort> = Arc::new(SqliteJobRepository::new(pool.clone()));
    let voice_repo: Arc<dyn VoiceRepositoryPort> =
        Arc::new(SqliteVoiceRepository::new(pool.clone()));
    let upload_repo: Arc<dyn UploadRepositoryPort> = Arc::new(SqliteUploadRepository::new(pool));

    // TTS 引擎
    let tts_engine: Arc<dyn TtsEnginePort> = if config.tts.fake {
        Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            delay: Duration::from_millis(config.tts.fake_delay_ms),
            ..Default::default()
        }))
    } else {
        let tts_config =
            HttpTtsClientConfig::new(&config.tts.url).with_timeout(config.tts.timeout_secs);
        Arc::new(HttpTtsClient::new(tts_config)?)
    };

    let audio_storage: Arc<dyn AudioStoragePort> = Arc::new(
        FileAudioStorage::new(&config.storage.audio_dir, &config.storage.uploads_dir).await?,
    );

    // 队列与状态回调
    let (queue_tx, queue_rx) = task_queue();
    let queue_manager = Arc::new(InMemoryQueueManager::new(queue_tx));
    queue_manager.set_callback(Arc::new(JobStatusHandler::new(job_repo.clone())));
    let queue_port: Arc<dyn QueueManagerPort> = queue_manager;

    // TTS 处理器外包一层繁忙重试
    let processor: Arc<dyn TaskHandler> = Arc::new(TtsTaskProcessor::new(
        tts_engine,
        voice_repo.clone(),
        upload_repo.clone(),
        audio_storage.clone(),
    ));
    let handler: Arc<dyn TaskHandler> = Arc::new(BusyRetryHandler::new(
        processor,
        config.queue.busy_retry_policy(),
        Arc::new(TokioSleeper),
    ));

    let worker = TaskWorker::new(queue_rx, queue_port.clone(), handler).spawn();

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(queue_port, job_repo, voice_repo, upload_repo, audio_storage);
    let server = HttpServer::new(server_config, state);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
    };

    if let Err(e) = server.run_with_shutdown(shutdown).await {
        tracing::error!(error = %e, "HTTP server error");
    }

    worker.shutdown().await;
    tracing::info!("ttsq stopped");

    Ok(())
}
