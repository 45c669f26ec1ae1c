//! Voice / Upload Handlers

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::{CreateUpload, CreateVoice, DeleteVoice, GetVoice, ListVoices};
use crate::infrastructure::http::dto::{
    ApiResponse, CreateVoiceRequest, ListVoicesParams, UploadResponse, VoiceListResponse,
    VoiceResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    }
}

/// 上传音频文件（201），multipart 字段名为 `file`
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let mut command: Option<CreateUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        command = Some(CreateUpload {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let command = command.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let upload = state.create_upload_handler.handle(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UploadResponse::from(upload))),
    ))
}

/// 创建音色（201）
pub async fn create_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VoiceResponse>>), ApiError> {
    let voice = state
        .create_voice_handler
        .handle(CreateVoice {
            name: req.name,
            description: req.description,
            upload_id: req.upload_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VoiceResponse::from(voice))),
    ))
}

/// 列出音色
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVoicesParams>,
) -> Result<Json<ApiResponse<VoiceListResponse>>, ApiError> {
    let voices = state
        .list_voices_handler
        .handle(ListVoices {
            limit: params.limit,
            offset: params.offset,
        })
        .await?;

    let voices: Vec<VoiceResponse> = voices.into_iter().map(VoiceResponse::from).collect();
    Ok(Json(ApiResponse::success(VoiceListResponse {
        total: voices.len(),
        voices,
    })))
}

/// 获取音色详情
pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<String>,
) -> Result<Json<ApiResponse<VoiceResponse>>, ApiError> {
    let voice = state.get_voice_handler.handle(GetVoice { voice_id }).await?;
    Ok(Json(ApiResponse::success(VoiceResponse::from(voice))))
}

/// 删除音色及其参考音频
pub async fn delete_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .delete_voice_handler
        .handle(DeleteVoice { voice_id })
        .await?;
    Ok(Json(ApiResponse::success(())))
}
