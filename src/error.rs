//! Error handling for the resume analytica application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("LaTeX extraction error: {0}")]
    LatexExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Keyword extraction error: {0}")]
    KeywordExtraction(String),

    #[error("Scoring setup error: {0}")]
    Scoring(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Suggestion service error: {0}")]
    Suggestion(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl AnalyticaError {
    /// Whether the error stems from what the caller supplied rather than from
    /// the environment the analysis ran in.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticaError::PdfExtraction(_)
                | AnalyticaError::DocxExtraction(_)
                | AnalyticaError::LatexExtraction(_)
                | AnalyticaError::UnsupportedFormat(_)
                | AnalyticaError::FileTooLarge { .. }
                | AnalyticaError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalyticaError>;
