//! TTS Job Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::{CancelJob, CreateJob, GetJob, ListJobs, RetryJob};
use crate::domain::JobStatus;
use crate::infrastructure::http::dto::{
    ApiResponse, CreateJobRequest, JobListResponse, JobResponse, ListJobsParams,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 提交 TTS 任务（202）
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobResponse>>), ApiError> {
    let job = state
        .create_job_handler
        .handle(CreateJob {
            request: req.request,
        })
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(JobResponse::from(job))),
    ))
}

/// 获取任务详情
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<JobResponse>>, ApiError> {
    let job = state.get_job_handler.handle(GetJob { job_id }).await?;
    Ok(Json(ApiResponse::success(JobResponse::from(job))))
}

/// 列出任务
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListJobsParams>,
) -> Result<Json<ApiResponse<JobListResponse>>, ApiError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            JobStatus::parse(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {}", s)))?,
        ),
    };

    let jobs = state
        .list_jobs_handler
        .handle(ListJobs {
            status,
            limit: params.limit,
            offset: params.offset,
        })
        .await?;

    let jobs: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok(Json(ApiResponse::success(JobListResponse {
        total: jobs.len(),
        jobs,
    })))
}

/// 取消任务
pub async fn cancel_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<JobResponse>>, ApiError> {
    let job = state.cancel_job_handler.handle(CancelJob { job_id }).await?;
    Ok(Json(ApiResponse::success(JobResponse::from(job))))
}

/// 重试任务（201，返回新任务）
pub async fn retry_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<JobResponse>>), ApiError> {
    let job = state.retry_job_handler.handle(RetryJob { job_id }).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(JobResponse::from(job))),
    ))
}
