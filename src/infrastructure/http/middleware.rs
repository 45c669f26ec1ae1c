//! HTTP Middleware
//!
//! 请求日志：为每个请求分配 request id，并按响应状态选择日志级别

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 请求日志中间件
///
/// 沿用客户端传入的 `x-request-id`，没有时生成一个，并写回响应头。
/// 5xx 记 error，4xx 记 warn，其余记 debug。日志只带路径，不带查询串。
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, request_id = %request_id, "Request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, request_id = %request_id, "Request rejected");
    } else {
        tracing::debug!(%method, %path, status, elapsed_ms, request_id = %request_id, "Request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
