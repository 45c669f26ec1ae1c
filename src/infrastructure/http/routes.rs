//! HTTP Routes
//!
//! API Endpoints:
//! - /api/v1/tts/jobs              POST  提交 TTS 任务（202）
//! - /api/v1/tts/jobs              GET   列出任务（status / limit / offset）
//! - /api/v1/tts/jobs/:id          GET   任务详情
//! - /api/v1/tts/jobs/:id/cancel   POST  取消任务
//! - /api/v1/tts/jobs/:id/retry    POST  重试任务（201，返回新任务）
//! - /api/v1/uploads               POST  上传音频（multipart，201）
//! - /api/v1/voices                POST  创建音色（201）
//! - /api/v1/voices                GET   列出音色（limit / offset）
//! - /api/v1/voices/:id            GET   音色详情
//! - /api/v1/voices/:id            DELETE 删除音色及其参考音频
//! - /api/v1/queue/status          GET   队列状态
//! - /api/v1/audio/:file           GET   下载合成音频
//! - /api/v1/ping                  GET   健康检查

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;
use crate::domain::MAX_UPLOAD_BYTES;

/// multipart 分隔符和字段头的余量
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api/v1", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/tts", tts_routes())
        .route(
            "/uploads",
            post(handlers::create_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/voices", post(handlers::create_voice).get(handlers::list_voices))
        .route(
            "/voices/:voice_id",
            get(handlers::get_voice).delete(handlers::delete_voice),
        )
        .route("/queue/status", get(handlers::queue_status))
        .route("/audio/:file_name", get(handlers::get_audio))
}

/// TTS Job 路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", post(handlers::create_job).get(handlers::list_jobs))
        .route("/jobs/:job_id", get(handlers::get_job))
        .route("/jobs/:job_id/cancel", post(handlers::cancel_job))
        .route("/jobs/:job_id/retry", post(handlers::retry_job))
}
