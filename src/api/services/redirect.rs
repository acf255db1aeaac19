use std::borrow::Cow;
use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use tracing::{debug, trace, warn};

use crate::config::ClickSettings;
use crate::errors::ShortlyError;
use crate::services::LinkService;
use crate::storage::LinkRecord;
use crate::utils::is_code_char;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
        clicks: web::Data<ClickSettings>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if code.is_empty() || !code.chars().all(is_code_char) {
            // 非法短码，直接 404（不查注册表）
            trace!("Invalid short code rejected: {}", &code);
            return Self::not_found_response();
        }

        let link = match service.resolve(&code) {
            Ok(link) => link,
            Err(_) => {
                debug!("Redirect link not found: {}", &code);
                return Self::not_found_response();
            }
        };

        if LinkService::is_expired(&link, Utc::now()) {
            debug!("Expired link requested: {}", &code);
            return Self::gone_response();
        }

        // HEAD 多来自链接预览与探活，不计入点击
        if *req.method() != Method::HEAD {
            Self::update_click(&service, &clicks, &code, &req);
        }
        Self::finish_redirect(link)
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }

    #[inline]
    fn gone_response() -> HttpResponse {
        HttpResponse::build(StatusCode::GONE)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Link Expired")
    }

    fn finish_redirect(link: LinkRecord) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", link.original_url))
            .finish()
    }

    /// 用真实请求信息记录点击
    fn update_click(service: &LinkService, clicks: &ClickSettings, code: &str, req: &HttpRequest) {
        let referrer = req.headers().get("referer").and_then(|h| h.to_str().ok());
        let source = Self::derive_source(req.uri().query(), referrer);
        let location = Self::derive_location(req, &clicks.location_header);

        match service.record_click(code, &source, &location) {
            Ok(()) => trace!("Click recorded for {} ({}, {})", code, source, location),
            // 只会在解析与记录之间链接消失时发生
            Err(ShortlyError::UnknownCode(_)) => debug!("Click dropped for vanished code {}", code),
            Err(e) => warn!("Failed to record click for {}: {}", code, e),
        }
    }

    /// 推导流量来源：utm_source > ref:{域名} > direct
    pub fn derive_source(query: Option<&str>, referrer: Option<&str>) -> String {
        if let Some(query) = query
            && let Some(utm_source) = Self::extract_query_param(query, "utm_source")
            && !utm_source.is_empty()
        {
            return utm_source.into_owned();
        }

        if let Some(referer_url) = referrer
            && let Some(domain) = Self::extract_domain(referer_url)
        {
            return format!("ref:{}", domain);
        }

        "direct".to_string()
    }

    fn derive_location(req: &HttpRequest, header: &str) -> String {
        req.headers()
            .get(header)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }

    /// 从 query string 提取指定参数值
    #[inline]
    fn extract_query_param<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
        for part in query.split('&') {
            if let Some(value) = part.strip_prefix(key).and_then(|s| s.strip_prefix('=')) {
                // urlencoding::decode 返回 Cow，未编码时零分配
                return urlencoding::decode(value).ok();
            }
        }
        None
    }

    /// 从 URL 提取域名
    #[inline]
    fn extract_domain(url: &str) -> Option<&str> {
        let without_scheme = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);

        // 取到第一个 / 或 : 或 ? 或 # 为止
        without_scheme
            .split(&['/', ':', '?', '#'][..])
            .next()
            .filter(|s| !s.is_empty())
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
