//! Queue Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetQueueStatus, QueueStatusView};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 队列状态
pub async fn queue_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<QueueStatusView>> {
    Json(ApiResponse::success(
        state.queue_status_handler.handle(GetQueueStatus),
    ))
}
