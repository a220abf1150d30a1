pub mod llm;
pub mod request;
pub mod response;

pub use request::GenerationParams;
pub use response::{GenerationResponse, ModelInfo, ProviderCatalogEntry, RejectionDto};
