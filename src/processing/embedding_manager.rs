//! Catalogue, discovery and download of Model2Vec embedding models

use crate::error::{AnalyticaError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a model directory must hold before it can be loaded
const REQUIRED_FILES: &[&str] = &["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: &[&str] = &["README.md"];

/// Lookup order for auto-selection
const PREFERRED_MODELS: &[&str] = &["potion-base-8M", "m2v-base", "m2v-large"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub id: String,
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    catalogue: BTreeMap<String, EmbeddingModelInfo>,
    downloaded: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            AnalyticaError::ModelError(format!(
                "Failed to create models directory {}: {}",
                models_dir.display(),
                e
            ))
        })?;

        let mut manager = Self {
            models_dir,
            catalogue: default_catalogue(),
            downloaded: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if is_complete_model_dir(&entry.path()).await {
                self.downloaded
                    .insert(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(())
    }

    /// Fetch a catalogued model from the Hugging Face Hub into the models directory
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let info = self
            .catalogue
            .get(model_id)
            .cloned()
            .ok_or_else(|| AnalyticaError::ModelError(format!("Unknown embedding model: {}", model_id)))?;

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded.contains(model_id) {
            info!("Embedding model {} already present", model_id);
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            info.name, info.size_mb, info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            AnalyticaError::ModelError(format!("Failed to initialize Hugging Face client: {}", e))
        })?;
        let repo = api.repo(hf_hub::Repo::model(info.repo_id.clone()));

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES) {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        AnalyticaError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("  fetched {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("  optional file {} not available: {}", file, e);
                }
                Err(e) => {
                    return Err(AnalyticaError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded.insert(model_id.to_string());
        info!("Embedding model {} is ready", info.name);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        self.catalogue.values().collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded.contains(model_id)
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.catalogue.get(model_id)
    }

    /// First downloaded model in preference order, else the smallest default
    pub fn auto_select_model(&self) -> String {
        PREFERRED_MODELS
            .iter()
            .find(|id| self.downloaded.contains(**id))
            .unwrap_or(&PREFERRED_MODELS[0])
            .to_string()
    }

    /// Accepts a catalogue id, a Hugging Face repo id, or a display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.catalogue.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.catalogue
            .values()
            .find(|info| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|info| info.id.clone())
    }
}

async fn is_complete_model_dir(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

fn default_catalogue() -> BTreeMap<String, EmbeddingModelInfo> {
    let entries = [
        (
            "potion-base-8M",
            "Potion Base 8M",
            "minishlab/potion-base-8M",
            33,
            256,
            "Compact general-purpose static embeddings, the recommended default",
        ),
        (
            "m2v-base",
            "Model2Vec Base",
            "minishlab/M2V_base_output",
            90,
            256,
            "Original Model2Vec base distillation",
        ),
        (
            "m2v-large",
            "Model2Vec Large",
            "minishlab/M2V_large_output",
            250,
            512,
            "Larger Model2Vec distillation for higher accuracy",
        ),
    ];

    entries
        .into_iter()
        .map(|(id, name, repo_id, size_mb, dimensions, description)| {
            (
                id.to_string(),
                EmbeddingModelInfo {
                    id: id.to_string(),
                    name: name.to_string(),
                    repo_id: repo_id.to_string(),
                    size_mb,
                    dimensions,
                    description: description.to_string(),
                },
            )
        })
        .collect()
}
