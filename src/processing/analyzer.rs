//! Analysis engine tying extraction, keywords, semantics, scoring and suggestions together

use crate::config::{Config, LimitsConfig};
use crate::error::{AnalyticaError, Result};
use crate::input::file_detector::FileType;
use crate::input::{InputManager, ResumeSource};
use crate::llm::{ChatCompletionSuggester, RuleBasedSuggester, SuggestionContext, SuggestionGenerator};
use crate::output::latex::insert_suggestions_into_latex;
use crate::processing::embeddings::Model2VecEmbedder;
use crate::processing::semantic::{
    ChunkingOptions, EmbeddingComparator, OfflineComparator, SemanticComparator, SemanticMatch,
};
use crate::processing::skill_matcher::SkillMatcher;
use crate::scoring::{
    explain, ContextBreakdown, Diagnostic, FinalScore, ScoreAggregator, ScoreComponents, ScoreInput,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One resume to score against one job description
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume: ResumeSource,
    /// Treat the resume as LaTeX even when the file extension says otherwise
    pub is_latex: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub all_extracted_from_jd: Vec<String>,
    pub critical_missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisLimits {
    pub file_bytes_max: u64,
    /// Either document exceeded its soft length limit
    pub tokens_trimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub semantic_backend: String,
    pub suggestion_backend: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: FinalScore,
    /// Rounded to 3 decimals
    pub components: ScoreComponents,
    pub explanation: String,
    pub keywords: KeywordReport,
    pub semantic_matches: Vec<SemanticMatch>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latex_annotated: Option<String>,
    pub limits: AnalysisLimits,
    pub context: ContextBreakdown,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
    pub metadata: AnalysisMetadata,
}

/// How collaborators are picked when building from configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Skip the embedding model entirely
    pub offline: bool,
    /// Skip the chat completion service
    pub no_ai: bool,
}

pub struct AnalysisEngine {
    input: InputManager,
    skills: SkillMatcher,
    comparator: Box<dyn SemanticComparator>,
    suggester: Box<dyn SuggestionGenerator>,
    scorer: ScoreAggregator,
    limits: LimitsConfig,
}

impl AnalysisEngine {
    pub fn new(
        config: &Config,
        comparator: Box<dyn SemanticComparator>,
        suggester: Box<dyn SuggestionGenerator>,
    ) -> Result<Self> {
        let skills = SkillMatcher::with_custom_skills(&config.keywords.custom_skills)?;
        debug!("Keyword vocabulary: {} skills", skills.skill_count());

        Ok(Self {
            input: InputManager::new(config.limits.max_file_bytes),
            skills,
            comparator,
            suggester,
            scorer: ScoreAggregator::new()?,
            limits: config.limits.clone(),
        })
    }

    /// Build every collaborator from configuration. A missing embedding model
    /// degrades to offline comparison instead of failing.
    pub fn from_config(config: &Config, options: EngineOptions) -> Result<Self> {
        let comparator: Box<dyn SemanticComparator> = if options.offline || !config.semantic.enabled {
            info!("Semantic comparison disabled, running offline");
            Box::new(OfflineComparator)
        } else {
            match Model2VecEmbedder::from_config(config) {
                Ok(embedder) => Box::new(EmbeddingComparator::new(
                    embedder,
                    ChunkingOptions::from(&config.semantic),
                )),
                Err(e) => {
                    warn!("{}; semantic similarity will be reported as 0", e);
                    Box::new(OfflineComparator)
                }
            }
        };

        let rule_based = || Box::new(RuleBasedSuggester::new(config.suggestions.max_suggestions));
        let suggester: Box<dyn SuggestionGenerator> = if options.no_ai || !config.suggestions.enabled {
            rule_based()
        } else {
            let chat = ChatCompletionSuggester::from_config(&config.suggestions)?;
            if chat.is_configured() {
                Box::new(chat)
            } else {
                rule_based()
            }
        };

        Self::new(config, comparator, suggester)
    }

    /// Replace the scorer, e.g. to pin the current year
    pub fn with_scorer(mut self, scorer: ScoreAggregator) -> Self {
        self.scorer = scorer;
        self
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        if request.resume.is_empty() {
            return Err(AnalyticaError::InvalidInput(
                "Provide either a resume file or resume text".to_string(),
            ));
        }
        let job_text = request.job_description.as_str();
        if job_text.trim().is_empty() {
            return Err(AnalyticaError::InvalidInput(
                "Job description cannot be empty".to_string(),
            ));
        }

        info!("Parsing resume...");
        let extracted = self.input.extract_resume(&request.resume).await?;
        let resume_text = extracted.plain.as_str();
        if resume_text.trim().is_empty() {
            return Err(AnalyticaError::InvalidInput(
                "Could not extract text from resume".to_string(),
            ));
        }

        info!("Extracting keywords...");
        let job_keywords = self.skills.extract(job_text);
        let partition = self.skills.partition(&job_keywords.keywords, resume_text);

        info!("Comparing semantics with {}...", self.comparator.name());
        let semantic = self.comparator.compare(job_text, resume_text);

        info!("Computing match score...");
        let report = self.scorer.compute_score(&ScoreInput {
            job_keywords: &job_keywords.keywords,
            found_keywords: &partition.found,
            missing_keywords: &partition.missing,
            semantic_similarity: semantic.avg_similarity,
            job_text,
            resume_text,
        });

        info!("Generating suggestions with {}...", self.suggester.name());
        let suggestions = self
            .suggester
            .generate(&SuggestionContext {
                job_text,
                resume_text,
                missing_keywords: &partition.missing,
                matches: &semantic.matches,
            })
            .await;

        let wants_latex = request.is_latex || request.resume.file_type() == Some(FileType::Latex);
        let latex_annotated = if wants_latex {
            extracted
                .raw_markup
                .as_deref()
                .map(|raw| insert_suggestions_into_latex(raw, &suggestions))
        } else {
            None
        };

        let critical_missing = partition
            .missing
            .iter()
            .filter(|k| job_keywords.critical.contains(*k))
            .cloned()
            .collect();

        let components = report.components.rounded(3);
        let explanation = explain(&components, report.final_score);
        info!("Analysis complete. {}", explanation);

        Ok(AnalysisResult {
            score: report.final_score,
            components,
            explanation,
            keywords: KeywordReport {
                found: partition.found,
                missing: partition.missing,
                all_extracted_from_jd: job_keywords.keywords,
                critical_missing,
            },
            semantic_matches: semantic.matches,
            suggestions,
            latex_annotated,
            limits: AnalysisLimits {
                file_bytes_max: self.input.max_file_bytes(),
                tokens_trimmed: resume_text.chars().count() > self.limits.resume_trim_chars
                    || job_text.chars().count() > self.limits.job_trim_chars,
            },
            context: report.context,
            diagnostics: report.diagnostics,
            metadata: AnalysisMetadata {
                semantic_backend: self.comparator.name().to_string(),
                suggestion_backend: self.suggester.name().to_string(),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            },
        })
    }
}
