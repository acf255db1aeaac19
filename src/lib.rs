//! Shortly - a URL shortener core with click analytics
//!
//! Turns long URLs into unique short codes, enforces validity windows and
//! records click events against each link.
//!
//! # Architecture
//! - `storage`: link records, click events and the per-code locked registry
//! - `services`: code generation, batch intake and the `LinkService` boundary
//! - `analytics`: click recording and read-side statistics
//! - `api`: actix-web handlers over `LinkService`
//! - `config`: TOML + environment configuration
//! - `runtime`: HTTP server wiring
//! - `system`: logging setup

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
