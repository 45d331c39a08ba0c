//! Resume analytica library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod scoring;

pub use config::Config;
pub use error::{AnalyticaError, Result};
pub use processing::{AnalysisEngine, AnalysisRequest, AnalysisResult};
