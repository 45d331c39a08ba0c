//! Configuration management for resume analytica

use crate::error::{AnalyticaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub semantic: SemanticConfig,
    pub suggestions: SuggestionConfig,
    pub limits: LimitsConfig,
    pub keywords: KeywordConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    pub enabled: bool,
    pub chunk_max_chars: usize,
    pub max_chunks: usize,
    pub top_k: usize,
    pub max_matches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub enabled: bool,
    pub api_base_url: String,
    pub api_key_env: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_file_bytes: u64,
    pub resume_trim_chars: usize,
    pub job_trim_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Extra skills appended to the built-in technical vocabulary
    pub custom_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub max_matches_shown: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-analytica")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            semantic: SemanticConfig {
                enabled: true,
                chunk_max_chars: 300,
                max_chunks: 50,
                top_k: 3,
                max_matches: 20,
            },
            suggestions: SuggestionConfig {
                enabled: true,
                api_base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                model: "gpt-4".to_string(),
                max_tokens: 800,
                temperature: 0.7,
                timeout_secs: 60,
                max_suggestions: 5,
            },
            limits: LimitsConfig {
                max_file_bytes: 4_000_000,
                resume_trim_chars: 10_000,
                job_trim_chars: 5_000,
            },
            keywords: KeywordConfig {
                custom_skills: Vec::new(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                max_matches_shown: 5,
            },
        }
    }
}

impl Config {
    /// Load the configuration from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                AnalyticaError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            AnalyticaError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analytica")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Set a value by dotted key (e.g. `limits.max_file_bytes`).
    ///
    /// The value is parsed as a TOML literal first and falls back to a plain
    /// string. The updated document must still deserialize into a `Config`.
    pub fn set_value(&self, key: &str, raw_value: &str) -> Result<Config> {
        let mut document = toml::Value::try_from(self).map_err(|e| {
            AnalyticaError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| AnalyticaError::Configuration("Empty configuration key".to_string()))?;

        let mut table = &mut document;
        for part in parents {
            table = table
                .get_mut(*part)
                .ok_or_else(|| AnalyticaError::Configuration(format!("Unknown section: {}", part)))?;
        }

        let slot = table
            .get_mut(*last)
            .ok_or_else(|| AnalyticaError::Configuration(format!("Unknown key: {}", key)))?;
        *slot = parse_toml_literal(raw_value);

        document.try_into().map_err(|e: toml::de::Error| {
            AnalyticaError::Configuration(format!("Invalid value for {}: {}", key, e))
        })
    }
}

fn parse_toml_literal(raw: &str) -> toml::Value {
    let wrapped = format!("value = {}", raw);
    match toml::from_str::<toml::Table>(&wrapped) {
        Ok(mut table) => table
            .remove("value")
            .unwrap_or_else(|| toml::Value::String(raw.to_string())),
        Err(_) => toml::Value::String(raw.to_string()),
    }
}
