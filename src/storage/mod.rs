pub mod models;
pub mod registry;

pub use models::{ClickEvent, LinkRecord, LinkStats};
pub use registry::{LinkRegistry, validate_original_url, validate_validity};
