//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{AnalyticaError, Result};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Turns text into dense vectors. One vector per input, same order.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None).map_err(|e| {
            AnalyticaError::Embedding(format!(
                "Failed to load model {}: {}",
                model_path.display(),
                e
            ))
        })?;

        info!("Model loaded in {:.2?}", start_time.elapsed());
        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Load the configured default model from the models directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_name = &config.models.default_embedding_model;
        let model_path = config.models_dir().join(model_name);
        if !model_path.exists() {
            return Err(AnalyticaError::ModelError(format!(
                "Embedding model '{}' is not downloaded. Run `resume-analytica models download {}`",
                model_name, model_name
            )));
        }
        Self::load(&model_path, model_name)
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.model.encode(texts);
        if embeddings.len() != texts.len() {
            return Err(AnalyticaError::Embedding(format!(
                "Expected {} embeddings, model returned {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity; zero vectors compare as 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AnalyticaError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]).unwrap() + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(AnalyticaError::Embedding(_))
        ));
    }

    #[test]
    fn test_missing_model_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.models.models_dir = temp_dir.path().to_path_buf();

        let err = Model2VecEmbedder::from_config(&config).err().unwrap();
        assert!(matches!(err, AnalyticaError::ModelError(_)));
    }
}
