//! Link API
//!
//! JSON endpoints over `LinkService`: batch shortening, resolution and stats.

use std::sync::Arc;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use tracing::{info, warn};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_shortly, error_response, success_response};
use super::types::{BatchShortenBody, BatchShortenResponse, LinkView, RowErrorItem, StatsView};
use crate::services::LinkService;
use crate::storage::LinkStats;

/// 批量缩短链接
pub async fn shorten_batch(
    body: web::Json<BatchShortenBody>,
    service: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    let body = body.into_inner();
    info!("API: batch shorten request - {} rows", body.links.len());

    match service.shorten_batch(&body.links) {
        Ok(result) => success_response(BatchShortenResponse {
            errors: result.errors.iter().map(RowErrorItem::from).collect(),
            successes: result.successes,
        }),
        Err(e) => {
            warn!("API: batch shorten rejected: {}", e);
            error_from_shortly(&e)
        }
    }
}

/// 查询单个链接
pub async fn get_link(path: web::Path<String>, service: web::Data<Arc<LinkService>>) -> HttpResponse {
    let code = path.into_inner();
    api_result(service.resolve(&code).map(|record| LinkView {
        expired: LinkService::is_expired(&record, Utc::now()),
        short_url: service.short_url(&record.code),
        record,
    }))
}

/// 查询单个链接的点击统计
pub async fn get_link_stats(
    path: web::Path<String>,
    service: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    let code = path.into_inner();
    api_result(service.get_stats(&code).map(|stats| stats_view(&service, stats)))
}

/// 全部链接的统计，按创建顺序
pub async fn list_stats(service: web::Data<Arc<LinkService>>) -> HttpResponse {
    let views: Vec<StatsView> = service
        .all_stats()
        .into_iter()
        .map(|stats| stats_view(&service, stats))
        .collect();
    success_response(views)
}

fn stats_view(service: &LinkService, stats: LinkStats) -> StatsView {
    StatsView {
        expired: LinkService::is_expired(&stats.record, Utc::now()),
        short_url: service.short_url(&stats.record.code),
        stats,
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid request body: {}", err);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, response).into()
}

/// Link API 路由
pub fn link_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/links", web::post().to(shorten_batch))
        .route("/links/{code}", web::get().to(get_link))
        .route("/links/{code}/stats", web::get().to(get_link_stats))
        .route("/stats", web::get().to(list_stats))
}
