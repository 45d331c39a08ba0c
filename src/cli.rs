//! CLI interface for resume analytica

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "tex", "txt", "md", "markdown"];
pub const JOB_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-analytica")]
#[command(version)]
#[command(about = "Score how well a resume fits a job description")]
#[command(long_about = "Score resume fit against a job description using technical keyword coverage, \
semantic similarity and seniority/domain context, then suggest improvements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze(AnalyzeArgs),

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to job description file (TXT, MD)
    #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,

    /// Path to resume file (PDF, DOCX, TEX, TXT, MD)
    #[arg(short, long, required_unless_present = "resume_text")]
    pub resume: Option<PathBuf>,

    /// Resume text; takes precedence over --resume when not blank
    #[arg(long)]
    pub resume_text: Option<String>,

    /// Treat the resume as LaTeX and return an annotated copy
    #[arg(long)]
    pub latex: bool,

    /// Output format: console, json, markdown
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save output to a file (or into a directory with a generated name)
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Include context signals, diagnostics and run details
    #[arg(short, long)]
    pub detailed: bool,

    /// Use rule-based suggestions only
    #[arg(long)]
    pub no_ai: bool,

    /// Skip the embedding model; semantic similarity counts as 0
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List catalogued embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, name or Hugging Face repo id
        model: String,

        /// Download again even if the model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show model information
    Info {
        /// Model id, name or Hugging Face repo id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "limits.max_file_bytes")
        key: String,

        /// Configuration value
        value: String,
    },

    /// Check that the suggestion service answers
    Check,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if allowed_extensions.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            allowed_extensions.join(", ")
        )),
        None => Err("File has no extension".to_string()),
    }
}
