//! Fit scoring
//!
//! Combines keyword recall and precision, semantic similarity and a small
//! seniority/experience/domain adjustment into a 0-100 score. Everything in
//! here is pure and synchronous.

pub mod aggregator;
pub mod context;
pub mod cues;
pub mod explainer;

pub use aggregator::{ScoreAggregator, ScoreInput, ScoreReport, ScoreWeights};
pub use context::{ContextBonusCalculator, ContextBreakdown};
pub use explainer::explain;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four weighted signals, each already clamped to its range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub recall: f64,
    pub precision: f64,
    pub semantic: f64,
    pub context: f64,
}

impl ScoreComponents {
    pub const ZERO: ScoreComponents = ScoreComponents {
        recall: 0.0,
        precision: 0.0,
        semantic: 0.0,
        context: 0.0,
    };

    /// Copy with every component rounded for display or serialization
    pub fn rounded(&self, places: i32) -> Self {
        Self {
            recall: round_to(self.recall, places),
            precision: round_to(self.precision, places),
            semantic: round_to(self.semantic, places),
            context: round_to(self.context, places),
        }
    }
}

/// Integer fit score in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalScore(u8);

impl FinalScore {
    pub const ZERO: FinalScore = FinalScore(0);

    /// Scale a weighted sum in [0, 1] to a percentage. Rounds half away from zero.
    pub fn from_weighted(weighted: f64) -> Self {
        if !weighted.is_finite() {
            return Self::ZERO;
        }
        let percent = (weighted * 100.0).round().clamp(0.0, 100.0);
        FinalScore(percent as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStage {
    Seniority,
    Years,
    Domain,
    Aggregate,
}

impl fmt::Display for ScoringStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringStage::Seniority => "seniority",
            ScoringStage::Years => "years",
            ScoringStage::Domain => "domain",
            ScoringStage::Aggregate => "aggregate",
        };
        write!(f, "{}", name)
    }
}

/// A recoverable fault inside scoring. The stage that raised it contributes a
/// neutral value instead.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{stage} signal failed: {message}")]
pub struct Diagnostic {
    pub stage: ScoringStage,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: ScoringStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
