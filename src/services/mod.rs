//! Service layer for business logic
//!
//! Code generation, batch intake and the `LinkService` boundary shared by
//! the HTTP handlers and library callers.

mod batch;
mod code_generator;
mod link_service;

pub use batch::*;
pub use code_generator::CodeGenerator;
pub use link_service::LinkService;
