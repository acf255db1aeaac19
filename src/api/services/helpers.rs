//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use super::error_code::ErrorCode;
use super::types::ApiResponse;
use crate::errors::ShortlyError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 错误类型到 HTTP 状态码的映射
pub fn http_status(err: &ShortlyError) -> StatusCode {
    match err {
        ShortlyError::InvalidUrl(_)
        | ShortlyError::InvalidValidity(_)
        | ShortlyError::InvalidCode(_)
        | ShortlyError::TooManyRows(_) => StatusCode::BAD_REQUEST,
        ShortlyError::CodeConflict(_) => StatusCode::CONFLICT,
        ShortlyError::UnknownCode(_) => StatusCode::NOT_FOUND,
        ShortlyError::GenerationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        ShortlyError::Config(_) | ShortlyError::FileOperation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 从 ShortlyError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_shortly(err: &ShortlyError) -> HttpResponse {
    error_response(http_status(err), ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, ShortlyError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_shortly(&e),
    }
}
