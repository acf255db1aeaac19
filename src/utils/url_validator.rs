//! URL 验证模块
//!
//! 只做语法检查：必须是带 scheme 和 host 的绝对 URL。

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    MissingHost(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::MissingHost(url) => write!(f, "URL has no host: {}", url),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL 是否为合法的绝对 URL
///
/// 检查项目：
/// 1. URL 不为空（首尾空白忽略）
/// 2. 能被解析为绝对 URL（相对路径在这里会解析失败）
/// 3. 带有非空 host，`mailto:`、`data:`、`file:///` 之类因此被拒绝
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(UrlValidationError::MissingHost(url.to_string())),
    }
}
