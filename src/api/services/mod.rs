pub mod error_code;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod types;

pub use links::link_routes;
pub use redirect::{RedirectService, redirect_routes};
