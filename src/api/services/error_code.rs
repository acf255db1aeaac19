//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ShortlyError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    InternalServerError = 1005,
    BatchSizeTooLarge = 1010,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalidUrl = 3002,
    LinkInvalidValidity = 3003,
    LinkInvalidCode = 3007,
    LinkCodeExhausted = 3008,
}

impl From<&ShortlyError> for ErrorCode {
    fn from(err: &ShortlyError) -> Self {
        match err {
            ShortlyError::InvalidUrl(_) => ErrorCode::LinkInvalidUrl,
            ShortlyError::InvalidValidity(_) => ErrorCode::LinkInvalidValidity,
            ShortlyError::InvalidCode(_) => ErrorCode::LinkInvalidCode,
            ShortlyError::CodeConflict(_) => ErrorCode::LinkAlreadyExists,
            ShortlyError::GenerationExhausted(_) => ErrorCode::LinkCodeExhausted,
            ShortlyError::UnknownCode(_) => ErrorCode::LinkNotFound,
            ShortlyError::TooManyRows(_) => ErrorCode::BatchSizeTooLarge,
            ShortlyError::Config(_) | ShortlyError::FileOperation(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
