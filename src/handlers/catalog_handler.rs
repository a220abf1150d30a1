use actix_web::{get, HttpResponse};

use crate::models::dto::response::{ModelInfo, ProviderCatalogEntry};
use crate::providers::{self, Provider};

#[get("/api/providers")]
pub async fn list_providers() -> HttpResponse {
    let catalog: Vec<ProviderCatalogEntry> = Provider::all()
        .iter()
        .map(|provider| ProviderCatalogEntry {
            provider: *provider,
            label: provider.label().to_string(),
            default_model: provider.default_model().to_string(),
            models: provider
                .available_models()
                .iter()
                .map(|model| ModelInfo {
                    id: model.to_string(),
                    context_window: providers::token_limit(model),
                })
                .collect(),
        })
        .collect();

    HttpResponse::Ok().json(catalog)
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
