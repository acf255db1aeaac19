//! HTTP layer
//!
//! Thin actix-web handlers over `LinkService`; no business rules live here.

pub mod services;
