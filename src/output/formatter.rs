//! Output formatters for console, JSON and Markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::AnalysisResult;
use crate::scoring::ScoreWeights;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering an analysis result
pub trait OutputFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and a score badge
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    max_matches: usize,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    max_matches: usize,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn score_label(score: u8) -> (&'static str, Color) {
    match score {
        80..=100 => ("EXCELLENT", Color::Green),
        65..=79 => ("GOOD", Color::BrightGreen),
        50..=64 => ("FAIR", Color::Yellow),
        35..=49 => ("WEAK", Color::BrightYellow),
        _ => ("POOR", Color::Red),
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, max_matches: usize) -> Self {
        Self {
            use_colors,
            detailed,
            max_matches,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = score_label(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_keyword_list(&self, keywords: &[String], color: Color) -> String {
        if keywords.is_empty() {
            return self.colorize("(none)", Color::BrightBlack);
        }
        keywords
            .iter()
            .map(|k| self.colorize(k, color))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();
        let weights = ScoreWeights::STANDARD;
        let score = result.score.value();

        output.push_str(&self.format_header("RESUME FIT ANALYSIS", 1));
        output.push_str(&format!(
            "Match Score: {}% {}\n",
            self.colorize(&score.to_string(), score_label(score).1),
            self.format_score_badge(score)
        ));
        output.push_str(&format!("{}\n", self.colorize(&result.explanation, Color::Cyan)));

        output.push_str(&self.format_header("Score Breakdown", 2));
        let rows = [
            ("Keyword recall", result.components.recall, weights.recall),
            ("Keyword precision", result.components.precision, weights.precision),
            ("Semantic similarity", result.components.semantic, weights.semantic),
        ];
        for (name, value, weight) in rows {
            output.push_str(&format!(
                "  {:<20} {:>7} (weight: {:.0}%)\n",
                name,
                percent(value),
                weight * 100.0
            ));
        }
        output.push_str(&format!(
            "  {:<20} {:>+7.3} (weight: {:.0}%)\n",
            "Context bonus",
            result.components.context,
            weights.context * 100.0
        ));

        output.push_str(&self.format_header("Keywords", 2));
        output.push_str(&format!(
            "Found ({}/{}): {}\n",
            result.keywords.found.len(),
            result.keywords.all_extracted_from_jd.len(),
            self.format_keyword_list(&result.keywords.found, Color::Green)
        ));
        output.push_str(&format!(
            "Missing: {}\n",
            self.format_keyword_list(&result.keywords.missing, Color::Yellow)
        ));
        if !result.keywords.critical_missing.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("Critical gaps:", Color::Red),
                self.format_keyword_list(&result.keywords.critical_missing, Color::Red)
            ));
        }

        if !result.semantic_matches.is_empty() {
            output.push_str(&self.format_header("Closest Matches", 2));
            for m in result.semantic_matches.iter().take(self.max_matches) {
                output.push_str(&format!(
                    "  {} {}\n",
                    self.colorize(&format!("[{:.3}]", m.similarity), Color::Cyan),
                    m.resume
                ));
                output.push_str(&format!(
                    "          {}\n",
                    self.colorize(&format!("↳ {}", m.job), Color::BrightBlack)
                ));
            }
        }

        output.push_str(&self.format_header("Suggestions", 2));
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }

        if result.latex_annotated.is_some() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("Annotated LaTeX source is available in the JSON output.", Color::BrightBlack)
            ));
        }
        if result.limits.tokens_trimmed {
            output.push_str(&format!(
                "{}\n",
                self.colorize("Note: resume or job description exceeds the recommended length limit.", Color::Yellow)
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Context Signals", 3));
            output.push_str(&format!("  Seniority: {:+.2}\n", result.context.seniority));
            output.push_str(&format!("  Years:     {:+.2}\n", result.context.years));
            output.push_str(&format!("  Domain:    {:+.2}\n", result.context.domain));

            if !result.diagnostics.is_empty() {
                output.push_str(&self.format_header("Diagnostics", 3));
                for diagnostic in &result.diagnostics {
                    output.push_str(&format!("  • {}\n", self.colorize(&diagnostic.to_string(), Color::Yellow)));
                }
            }

            output.push_str(&self.format_header("Run Details", 3));
            output.push_str(&format!("  Semantic backend:   {}\n", result.metadata.semantic_backend));
            output.push_str(&format!("  Suggestion backend: {}\n", result.metadata.suggestion_backend));
            output.push_str(&format!("  Processing time:    {}ms\n", result.metadata.processing_time_ms));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, max_matches: usize) -> Self {
        Self {
            include_metadata,
            max_matches,
        }
    }

    fn code_list(keywords: &[String]) -> String {
        if keywords.is_empty() {
            "_none_".to_string()
        } else {
            format!("`{}`", keywords.join("`, `"))
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();
        let weights = ScoreWeights::STANDARD;
        let score = result.score.value();

        output.push_str("# Resume Fit Analysis\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                result.metadata.processing_time_ms
            ));
        }

        output.push_str(&format!("**Match Score:** {}% ({})\n\n", score, score_label(score).0));
        output.push_str(&format!("{}\n\n", result.explanation));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Component | Value | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!(
            "| Keyword recall | {} | {:.0}% |\n",
            percent(result.components.recall),
            weights.recall * 100.0
        ));
        output.push_str(&format!(
            "| Keyword precision | {} | {:.0}% |\n",
            percent(result.components.precision),
            weights.precision * 100.0
        ));
        output.push_str(&format!(
            "| Semantic similarity | {} | {:.0}% |\n",
            percent(result.components.semantic),
            weights.semantic * 100.0
        ));
        output.push_str(&format!(
            "| Context bonus | {:+.3} | {:.0}% |\n\n",
            result.components.context,
            weights.context * 100.0
        ));

        output.push_str("## Keywords\n\n");
        output.push_str(&format!("- **Found:** {}\n", Self::code_list(&result.keywords.found)));
        output.push_str(&format!("- **Missing:** {}\n", Self::code_list(&result.keywords.missing)));
        if !result.keywords.critical_missing.is_empty() {
            output.push_str(&format!(
                "- **Critical gaps:** {}\n",
                Self::code_list(&result.keywords.critical_missing)
            ));
        }
        output.push('\n');

        if !result.semantic_matches.is_empty() {
            output.push_str("## Closest Matches\n\n");
            output.push_str("| Similarity | Resume | Job description |\n");
            output.push_str("|------------|--------|-----------------|\n");
            for m in result.semantic_matches.iter().take(self.max_matches) {
                output.push_str(&format!(
                    "| {:.3} | {} | {} |\n",
                    m.similarity,
                    m.resume.replace('|', "\\|"),
                    m.job.replace('|', "\\|")
                ));
            }
            output.push('\n');
        }

        output.push_str("## Suggestions\n\n");
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }
        output.push('\n');

        if let Some(latex) = &result.latex_annotated {
            output.push_str("## Annotated LaTeX\n\n```latex\n");
            output.push_str(latex);
            if !latex.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n\n");
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by Resume Analytica v{} using {} + {}*\n",
                env!("CARGO_PKG_VERSION"),
                result.metadata.semantic_backend,
                result.metadata.suggestion_backend
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, 5)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        max_matches: usize,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, max_matches),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, max_matches),
        }
    }

    pub fn generate_report(&self, result: &AnalysisResult, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(result),
            OutputFormat::Json => self.json_formatter.format_report(result),
            OutputFormat::Markdown => self.markdown_formatter.format_report(result),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::{AnalysisLimits, AnalysisMetadata, KeywordReport};
    use crate::processing::semantic::SemanticMatch;
    use crate::scoring::{ContextBreakdown, Diagnostic, FinalScore, ScoreComponents, ScoringStage};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            score: FinalScore::from_weighted(0.36),
            components: ScoreComponents {
                recall: 0.333,
                precision: 0.333,
                semantic: 0.5,
                context: 0.02,
            },
            explanation: "Score 36%: Low keyword coverage, moderate semantic alignment.".to_string(),
            keywords: KeywordReport {
                found: strings(&["python"]),
                missing: strings(&["aws", "docker"]),
                all_extracted_from_jd: strings(&["aws", "docker", "python"]),
                critical_missing: strings(&["aws"]),
            },
            semantic_matches: vec![SemanticMatch {
                job: "Build python services".to_string(),
                resume: "Built tools in python".to_string(),
                similarity: 0.812,
            }],
            suggestions: strings(&["Include cloud and DevOps experience in your infrastructure work."]),
            latex_annotated: None,
            limits: AnalysisLimits {
                file_bytes_max: 4_000_000,
                tokens_trimmed: false,
            },
            context: ContextBreakdown {
                seniority: 0.0,
                years: 0.0,
                domain: 0.02,
                total: 0.02,
                diagnostics: Vec::new(),
            },
            diagnostics: vec![Diagnostic::new(ScoringStage::Years, "year out of range")],
            metadata: AnalysisMetadata {
                semantic_backend: "model2vec".to_string(),
                suggestion_backend: "rule-based".to_string(),
                processing_time_ms: 12,
            },
        }
    }

    #[test]
    fn test_console_plain_output() {
        let output = ConsoleFormatter::new(false, false, 5)
            .format_report(&sample_result())
            .unwrap();

        assert!(output.contains("Match Score: 36% [WEAK]"));
        assert!(output.contains("Found (1/3): python"));
        assert!(output.contains("Missing: aws, docker"));
        assert!(output.contains("Critical gaps: aws"));
        assert!(output.contains("[0.812] Built tools in python"));
        assert!(output.contains("1. Include cloud and DevOps"));
        assert!(!output.contains("Diagnostics"));
        assert!(!output.contains("length limit"));
    }

    #[test]
    fn test_console_notes_oversized_input() {
        let mut result = sample_result();
        result.limits.tokens_trimmed = true;
        let output = ConsoleFormatter::new(false, false, 5).format_report(&result).unwrap();

        assert!(output.contains("Note: resume or job description exceeds the recommended length limit."));
        assert!(!output.contains("trimmed"));
    }

    #[test]
    fn test_console_detailed_output() {
        let output = ConsoleFormatter::new(false, true, 5)
            .format_report(&sample_result())
            .unwrap();

        assert!(output.contains("Domain:    +0.02"));
        assert!(output.contains("years signal failed: year out of range"));
        assert!(output.contains("Semantic backend:   model2vec"));
    }

    #[test]
    fn test_json_output_parses() {
        let result = sample_result();
        let compact = JsonFormatter::new(false).format_report(&result).unwrap();
        assert!(!compact.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value["score"], 36);
        assert_eq!(value["keywords"]["missing"][1], "docker");
        assert_eq!(value["semantic_matches"][0]["jd"], "Build python services");
    }

    #[test]
    fn test_markdown_output() {
        let mut result = sample_result();
        result.latex_annotated = Some("\\begin{document}".to_string());
        let output = MarkdownFormatter::new(false, 5).format_report(&result).unwrap();

        assert!(output.starts_with("# Resume Fit Analysis"));
        assert!(output.contains("**Match Score:** 36% (WEAK)"));
        assert!(output.contains("| Keyword recall | 33.3% | 40% |"));
        assert!(output.contains("- **Missing:** `aws`, `docker`"));
        assert!(output.contains("```latex\n\\begin{document}\n```"));
        assert!(!output.contains("Generated by"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false, 5);
        let json = generator.generate_report(&sample_result(), &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let md = generator.generate_report(&sample_result(), &OutputFormat::Markdown).unwrap();
        assert!(md.starts_with('#'));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Json, "docs/jane_doe.pdf", false),
            "jane_doe_analysis.json"
        );
        assert_eq!(suggest_filename(&OutputFormat::Markdown, "", false), "resume_analysis.md");
        assert!(suggest_filename(&OutputFormat::Console, "cv.tex", true).starts_with("cv_analysis_"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
