//! API 类型定义

use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;
use crate::services::{CreatedLink, RowError, ShortenRequest};
use crate::storage::{LinkRecord, LinkStats};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 批量缩短请求体
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct BatchShortenBody {
    pub links: Vec<ShortenRequest>,
}

/// 单行失败信息
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RowErrorItem {
    pub row: usize,
    pub error_code: ErrorCode,
    pub message: String,
}

impl From<&RowError> for RowErrorItem {
    fn from(err: &RowError) -> Self {
        Self {
            row: err.row,
            error_code: ErrorCode::from(&err.error),
            message: err.message(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct BatchShortenResponse {
    pub successes: Vec<CreatedLink>,
    pub errors: Vec<RowErrorItem>,
}

/// 链接详情（带展示用短链接与过期标记）
#[derive(Serialize, Clone, Debug)]
pub struct LinkView {
    #[serde(flatten)]
    pub record: LinkRecord,
    pub short_url: String,
    pub expired: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct StatsView {
    #[serde(flatten)]
    pub stats: LinkStats,
    pub short_url: String,
    pub expired: bool,
}
