//! Integration tests for resume analytica

use resume_analytica::config::{Config, OutputFormat};
use resume_analytica::error::AnalyticaError;
use resume_analytica::input::{InputManager, ResumeSource};
use resume_analytica::llm::RuleBasedSuggester;
use resume_analytica::output::ReportGenerator;
use resume_analytica::processing::semantic::OfflineComparator;
use resume_analytica::processing::{AnalysisEngine, AnalysisRequest};
use resume_analytica::scoring::{ContextBonusCalculator, ScoreAggregator};
use std::path::Path;

const JOB_FIXTURE: &str = "tests/fixtures/sample_job.txt";

fn offline_engine() -> AnalysisEngine {
    AnalysisEngine::new(
        &Config::default(),
        Box::new(OfflineComparator),
        Box::new(RuleBasedSuggester::default()),
    )
    .unwrap()
    .with_scorer(ScoreAggregator::with_context(
        ContextBonusCalculator::with_current_year(2024).unwrap(),
    ))
}

async fn job_description() -> String {
    InputManager::new(4_000_000)
        .read_job_description(Path::new(JOB_FIXTURE))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource::from_file("tests/fixtures/sample_resume.txt");

    let extracted = manager.extract_resume(&source).await.unwrap();
    assert!(extracted.plain.contains("John Doe"));
    assert!(extracted.plain.contains("Software Engineer"));
    assert!(extracted.plain.contains("React"));
    assert!(extracted.plain.contains("Node.js"));
    assert!(extracted.raw_markup.is_none());
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource::from_file("tests/fixtures/sample_resume.md");

    let text = manager.extract_resume(&source).await.unwrap().plain;
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_latex_extraction_keeps_markup() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource::from_file("tests/fixtures/sample_resume.tex");

    let extracted = manager.extract_resume(&source).await.unwrap();
    assert!(extracted.plain.contains("John Doe"));
    assert!(!extracted.plain.contains("contact details"));
    assert!(extracted.raw_markup.unwrap().contains("\\begin{document}"));
}

#[tokio::test]
async fn test_pasted_text_wins_over_file() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource {
        file: Some("tests/fixtures/sample_resume.txt".into()),
        text: Some("  Pasted resume  ".to_string()),
    };

    let extracted = manager.extract_resume(&source).await.unwrap();
    assert_eq!(extracted.plain, "Pasted resume");
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource::from_file("tests/fixtures/unsupported.xyz");

    let err = manager.extract_resume(&source).await.unwrap_err();
    assert!(matches!(err, AnalyticaError::UnsupportedFormat(_)));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let manager = InputManager::new(4_000_000);
    let source = ResumeSource::from_file("tests/fixtures/nonexistent.txt");

    assert!(manager.extract_resume(&source).await.is_err());
}

#[tokio::test]
async fn test_file_over_limit_rejected() {
    let manager = InputManager::new(16);
    let source = ResumeSource::from_file("tests/fixtures/sample_resume.txt");

    let err = manager.extract_resume(&source).await.unwrap_err();
    assert!(matches!(err, AnalyticaError::FileTooLarge { max: 16, .. }));
}

#[tokio::test]
async fn test_job_description_must_be_text() {
    let manager = InputManager::new(4_000_000);
    let err = manager
        .read_job_description(Path::new("tests/fixtures/sample_resume.tex"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticaError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_offline_analysis_of_fixture_resume() {
    let request = AnalysisRequest {
        job_description: job_description().await,
        resume: ResumeSource::from_file("tests/fixtures/sample_resume.txt"),
        is_latex: false,
    };

    let result = offline_engine().analyze(&request).await.unwrap();

    assert_eq!(
        result.keywords.all_extracted_from_jd,
        vec!["aws", "docker", "kafka", "kubernetes", "postgresql", "python", "terraform"]
    );
    assert_eq!(result.keywords.found, vec!["aws", "docker", "postgresql", "python"]);
    assert_eq!(result.keywords.missing, vec!["kafka", "kubernetes", "terraform"]);
    assert!(result.keywords.critical_missing.contains(&"kubernetes".to_string()));
    assert!(result
        .keywords
        .critical_missing
        .iter()
        .all(|k| result.keywords.missing.contains(k)));

    assert_eq!(result.components.recall, 0.571);
    assert_eq!(result.components.semantic, 0.0);
    assert_eq!(result.context.seniority, 0.08);
    assert!(result.context.domain > 0.0);
    assert!(result.score.value() > 0 && result.score.value() <= 100);
    assert!(result.semantic_matches.is_empty());
    assert!((3..=5).contains(&result.suggestions.len()));
    assert!(result.explanation.starts_with(&format!("Score {}%", result.score.value())));
    assert!(result.latex_annotated.is_none());
    assert!(result.diagnostics.is_empty());
}

#[tokio::test]
async fn test_latex_resume_gets_annotated() {
    let request = AnalysisRequest {
        job_description: job_description().await,
        resume: ResumeSource::from_file("tests/fixtures/sample_resume.tex"),
        is_latex: false,
    };

    let result = offline_engine().analyze(&request).await.unwrap();
    let annotated = result.latex_annotated.unwrap();

    assert!(annotated.starts_with("\\documentclass{article}\n\\begin{document}\n% ====="));
    assert!(annotated.contains(&format!("% 1. {}", result.suggestions[0])));
    assert!(annotated.ends_with("\\end{document}\n"));
}

#[tokio::test]
async fn test_analysis_is_repeatable() {
    let engine = offline_engine();
    let request = AnalysisRequest {
        job_description: job_description().await,
        resume: ResumeSource::from_file("tests/fixtures/sample_resume.md"),
        is_latex: false,
    };

    let first = engine.analyze(&request).await.unwrap();
    let second = engine.analyze(&request).await.unwrap();
    assert_eq!(first.score, second.score);
    assert_eq!(first.components, second.components);
    assert_eq!(first.suggestions, second.suggestions);
}

#[tokio::test]
async fn test_missing_resume_is_rejected() {
    let request = AnalysisRequest {
        job_description: "Rust engineer".to_string(),
        resume: ResumeSource::from_text("   "),
        is_latex: false,
    };

    let err = offline_engine().analyze(&request).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        AnalyticaError::InvalidInput("Provide either a resume file or resume text".to_string()).to_string()
    );
}

#[tokio::test]
async fn test_json_report_round_trips_through_serde() {
    let request = AnalysisRequest {
        job_description: job_description().await,
        resume: ResumeSource::from_file("tests/fixtures/sample_resume.txt"),
        is_latex: false,
    };
    let result = offline_engine().analyze(&request).await.unwrap();

    let json = ReportGenerator::with_options(false, false, true, false, 5)
        .generate_report(&result, &OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["score"], result.score.value());
    assert_eq!(value["limits"]["file_bytes_max"], 4_000_000);
    assert_eq!(value["limits"]["tokens_trimmed"], false);
    assert_eq!(value["metadata"]["semantic_backend"], "offline");
}
