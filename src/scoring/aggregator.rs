//! Weighted combination of the scoring signals

use crate::error::Result;
use crate::scoring::context::{ContextBonusCalculator, ContextBreakdown, CONTEXT_BONUS_LIMIT};
use crate::scoring::{Diagnostic, FinalScore, ScoreComponents, ScoringStage};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub recall: f64,
    pub precision: f64,
    pub semantic: f64,
    pub context: f64,
}

impl ScoreWeights {
    pub const STANDARD: ScoreWeights = ScoreWeights {
        recall: 0.40,
        precision: 0.15,
        semantic: 0.35,
        context: 0.10,
    };

    pub fn combine(&self, components: &ScoreComponents) -> f64 {
        self.recall * components.recall
            + self.precision * components.precision
            + self.semantic * components.semantic
            + self.context * components.context
    }
}

/// Everything the aggregator reads. Keyword lists are compared by length only.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub job_keywords: &'a [String],
    pub found_keywords: &'a [String],
    pub missing_keywords: &'a [String],
    pub semantic_similarity: f64,
    pub job_text: &'a str,
    pub resume_text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unrounded; round with [`ScoreComponents::rounded`] for presentation
    pub components: ScoreComponents,
    pub final_score: FinalScore,
    pub context: ContextBreakdown,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScoreReport {
    fn zeroed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            components: ScoreComponents::ZERO,
            final_score: FinalScore::ZERO,
            context: ContextBreakdown::default(),
            diagnostics,
        }
    }
}

pub struct ScoreAggregator {
    weights: ScoreWeights,
    context: ContextBonusCalculator,
}

impl ScoreAggregator {
    pub fn new() -> Result<Self> {
        Ok(Self::with_context(ContextBonusCalculator::new()?))
    }

    pub fn with_context(context: ContextBonusCalculator) -> Self {
        Self {
            weights: ScoreWeights::STANDARD,
            context,
        }
    }

    /// Never fails: an internal fault yields an all-zero report carrying the
    /// diagnostic.
    pub fn compute_score(&self, input: &ScoreInput<'_>) -> ScoreReport {
        match self.try_compute(input) {
            Ok(report) => report,
            Err(diag) => {
                error!("Scoring failed, reporting zero: {}", diag);
                ScoreReport::zeroed(vec![diag])
            }
        }
    }

    fn try_compute(&self, input: &ScoreInput<'_>) -> std::result::Result<ScoreReport, Diagnostic> {
        if !input.semantic_similarity.is_finite() {
            return Err(Diagnostic::new(
                ScoringStage::Aggregate,
                format!("semantic similarity is not finite ({})", input.semantic_similarity),
            ));
        }

        let found = input.found_keywords.len();
        let recall = ratio(found, input.job_keywords.len());
        let precision = ratio(found, found + input.missing_keywords.len());
        let semantic = input.semantic_similarity.clamp(0.0, 1.0);

        let context = self.context.breakdown(input.job_text, input.resume_text);
        let components = ScoreComponents {
            recall,
            precision,
            semantic,
            context: context.total.clamp(-CONTEXT_BONUS_LIMIT, CONTEXT_BONUS_LIMIT),
        };

        let weighted = self.weights.combine(&components);
        if !weighted.is_finite() {
            return Err(Diagnostic::new(
                ScoringStage::Aggregate,
                format!("weighted sum is not finite ({})", weighted),
            ));
        }
        let final_score = FinalScore::from_weighted(weighted);

        let shown = components.rounded(3);
        info!(
            "Score {}: recall={} precision={} semantic={} context={:+}",
            final_score, shown.recall, shown.precision, shown.semantic, shown.context
        );

        let diagnostics = context.diagnostics.clone();
        if !diagnostics.is_empty() {
            warn!("Scored with {} degraded signal(s)", diagnostics.len());
        }

        Ok(ScoreReport {
            components,
            final_score,
            context,
            diagnostics,
        })
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
