pub mod catalog_handler;
pub mod generation_handler;

pub use catalog_handler::{health_check, list_providers};
pub use generation_handler::{create_generation, download_markdown, download_package};
