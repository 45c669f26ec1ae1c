//! Audio Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 下载合成结果
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.audio_storage.output_path(&file_name)?;

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("Audio file not found: {}", file_name)));
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, "audio/wav")], body).into_response())
}
