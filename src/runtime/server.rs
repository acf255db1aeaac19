//! Server mode
//!
//! Wires the link service into an actix-web application and runs it.

use std::sync::Arc;

use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::info;

use crate::api::services::{link_routes, redirect_routes};
use crate::config::StaticConfig;
use crate::services::LinkService;

/// Register the shared state and every route on an application
///
/// API routes are registered before the catch-all redirect route.
pub fn configure_app(
    service: Arc<LinkService>,
    config: &StaticConfig,
) -> impl Fn(&mut web::ServiceConfig) + Clone + use<> {
    let api_prefix = config.server.api_prefix.clone();
    let clicks = config.clicks.clone();

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(Arc::clone(&service)))
            .app_data(web::Data::new(clicks.clone()))
            .service(link_routes(&api_prefix))
            .service(redirect_routes());
    }
}

/// Run the HTTP server until it is stopped
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let service = Arc::new(LinkService::from_config(&config));
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    info!(
        "Short links are served as {}/<code>, API at {}",
        config.links.base_url.trim_end_matches('/'),
        config.server.api_prefix
    );
    info!("Starting server at http://{}", bind_address);

    let configure = configure_app(service, &config);
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .configure(configure.clone())
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    info!("Server stopped");
    Ok(())
}
