//! Text processing and analysis module

pub mod analyzer;
pub mod embedding_manager;
pub mod embeddings;
pub mod semantic;
pub mod skill_matcher;

pub use analyzer::{AnalysisEngine, AnalysisRequest, AnalysisResult, EngineOptions};
