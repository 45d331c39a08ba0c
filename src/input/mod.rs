//! Input processing module
//! Handles file detection, text extraction, and input management

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::{InputManager, ResumeSource};
pub use text_extractor::ExtractedText;
