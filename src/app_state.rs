use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::{GenerationOutcome, GenerationService},
};

/// Artifacts of one completed generation, held in memory only. Files live in
/// the process output directory and are eligible for cleanup on exit.
#[derive(Clone, Debug)]
pub struct GeneratedArtifacts {
    /// Base name used for download filenames.
    pub download_stem: String,
    pub package_path: Option<PathBuf>,
    pub markdown_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generation_service: Arc<GenerationService>,
    artifacts: Arc<RwLock<HashMap<Uuid, GeneratedArtifacts>>>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.output_dir).map_err(|err| {
            AppError::InternalError(format!(
                "failed to create output directory {}: {}",
                config.output_dir.display(),
                err
            ))
        })?;

        let config = Arc::new(config);
        let generation_service = Arc::new(GenerationService::new(config.clone()));

        Ok(Self {
            config,
            generation_service,
            artifacts: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub async fn register_artifacts(&self, outcome: &GenerationOutcome) {
        let artifacts = GeneratedArtifacts {
            download_stem: sanitize_stem(&outcome.title),
            package_path: outcome.package_path.clone(),
            markdown_path: outcome.markdown_path.clone(),
        };
        self.artifacts.write().await.insert(outcome.id, artifacts);
    }

    pub async fn artifacts_for(&self, id: &Uuid) -> Option<GeneratedArtifacts> {
        self.artifacts.read().await.get(id).cloned()
    }
}

/// Keeps download filenames filesystem- and header-safe.
fn sanitize_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() {
        "generation".to_string()
    } else {
        stem
    }
}
