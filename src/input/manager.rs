//! Input manager for turning uploaded files or pasted text into plain text

use crate::error::{AnalyticaError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, ExtractedText, LatexExtractor, MarkdownExtractor, PdfExtractor,
    PlainTextExtractor, TextExtractor,
};
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where the resume content comes from. Pasted text wins over a file when both
/// are present and the text is not blank.
#[derive(Debug, Clone, Default)]
pub struct ResumeSource {
    pub file: Option<PathBuf>,
    pub text: Option<String>,
}

impl ResumeSource {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            file: None,
            text: Some(text.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    pub fn file_type(&self) -> Option<FileType> {
        self.file.as_deref().map(FileType::from_path)
    }
}

pub struct InputManager {
    max_file_bytes: u64,
}

impl InputManager {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Resolve a resume source into plain text (and raw markup for LaTeX).
    ///
    /// A source with neither a file nor text yields empty text; the caller
    /// decides whether that is an error.
    pub async fn extract_resume(&self, source: &ResumeSource) -> Result<ExtractedText> {
        if let Some(text) = source.text.as_deref() {
            if !text.trim().is_empty() {
                return Ok(ExtractedText::plain(text.trim().to_string()));
            }
        }

        match source.file.as_deref() {
            Some(path) => self.extract_file(path).await,
            None => Ok(ExtractedText::plain(String::new())),
        }
    }

    /// Read a job description from a text or markdown file
    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        match FileType::from_path(path) {
            FileType::Text | FileType::Markdown => {
                let extracted = self.extract_file(path).await?;
                Ok(extracted.plain)
            }
            _ => Err(AnalyticaError::UnsupportedFormat(format!(
                "Job descriptions must be .txt or .md files: {}",
                path.display()
            ))),
        }
    }

    pub async fn extract_file(&self, path: &Path) -> Result<ExtractedText> {
        if !path.exists() {
            return Err(AnalyticaError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown {
            return Err(unsupported(path));
        }

        let size = fs::metadata(path).await?.len();
        if size > self.max_file_bytes {
            return Err(AnalyticaError::FileTooLarge {
                size,
                max: self.max_file_bytes,
            });
        }

        let bytes = fs::read(path).await?;
        info!("Processing {:?} file: {} ({} bytes)", file_type, path.display(), bytes.len());

        match file_type {
            FileType::Pdf => PdfExtractor.extract(&bytes),
            FileType::Docx => DocxExtractor.extract(&bytes),
            FileType::Latex => LatexExtractor.extract(&bytes),
            FileType::Text => PlainTextExtractor.extract(&bytes),
            FileType::Markdown => MarkdownExtractor.extract(&bytes),
            FileType::Unknown => Err(unsupported(path)),
        }
    }
}

fn unsupported(path: &Path) -> AnalyticaError {
    AnalyticaError::UnsupportedFormat(format!(
        "Unsupported file type for {}. Please upload PDF, DOCX, LaTeX, TXT or Markdown files.",
        path.display()
    ))
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(4_000_000)
    }
}
