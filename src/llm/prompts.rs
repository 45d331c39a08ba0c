//! Prompt construction for resume improvement suggestions

use crate::processing::semantic::SemanticMatch;
use log::debug;
use unicode_segmentation::UnicodeSegmentation;

pub const SYSTEM_MESSAGE: &str =
    "You are a helpful career coach specializing in technical resumes.";

/// Characters of each document sent to the model
pub const PROMPT_TEXT_CHARS: usize = 3000;
const PROMPT_KEYWORDS: usize = 10;
const PROMPT_MATCHES: usize = 5;
const MATCH_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system_message: String,
    pub suggestion_template: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system_message: SYSTEM_MESSAGE.to_string(),
            suggestion_template: SUGGESTION_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptParams<'a> {
    pub job_text: &'a str,
    pub resume_text: &'a str,
    pub missing_keywords: &'a [String],
    pub matches: &'a [SemanticMatch],
}

impl PromptTemplates {
    pub fn render_suggestion_prompt(&self, params: &PromptParams<'_>) -> String {
        let keywords = params
            .missing_keywords
            .iter()
            .take(PROMPT_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let matches = params
            .matches
            .iter()
            .take(PROMPT_MATCHES)
            .map(|m| {
                format!(
                    "• JD: '{}...' ↔ Resume: '{}...' (similarity: {})",
                    preview(&m.job, MATCH_PREVIEW_CHARS),
                    preview(&m.resume, MATCH_PREVIEW_CHARS),
                    m.similarity
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let job = trim_text(params.job_text, PROMPT_TEXT_CHARS);
        let resume = trim_text(params.resume_text, PROMPT_TEXT_CHARS);

        let prompt = fill_placeholders(&self.suggestion_template, |name| match name {
            "keywords" => Some(keywords.as_str()),
            "matches" => Some(matches.as_str()),
            "job" => Some(job.as_str()),
            "resume" => Some(resume.as_str()),
            _ => None,
        });

        debug!("Suggestion prompt is {} characters", prompt.chars().count());
        prompt
    }
}

/// Substitute `{name}` placeholders in one pass over `template`.
///
/// Inserted values are never rescanned. Unknown names stay as written.
fn fill_placeholders<'v>(template: &str, value: impl Fn(&str) -> Option<&'v str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| value(&after[..close]).map(|v| (close, v))) {
            Some((close, v)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// First `max` grapheme clusters of `text`
fn preview(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}

/// Collapse whitespace and shorten to `max_chars`.
///
/// Prefers cutting after a full stop; falls back to a hard cut with "..." when
/// that would throw away more than a fifth of the budget.
pub fn trim_text(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut trimmed = String::new();
    let mut trimmed_len = 0;
    for sentence in text.split('.') {
        let sentence_len = sentence.chars().count();
        if trimmed_len + sentence_len + 1 > max_chars {
            break;
        }
        trimmed.push_str(sentence);
        trimmed.push('.');
        trimmed_len += sentence_len + 1;
    }

    if trimmed_len as f64 > max_chars as f64 * 0.8 {
        trimmed
    } else {
        let mut cut = preview(&text, max_chars);
        cut.push_str("...");
        cut
    }
}

const SUGGESTION_TEMPLATE: &str = r#"You are an expert technical recruiter and career coach. Your goal is to provide 3-5 specific, actionable suggestions to improve this resume for the given job description.

FOCUS ON:
- Incorporating missing keywords naturally
- Strengthening weak semantic matches
- Adding quantified impact where possible
- Improving technical language alignment

MISSING KEYWORDS (prioritize these): {keywords}

TOP SEMANTIC MATCHES (strengthen these connections):
{matches}

=== JOB DESCRIPTION ===
{job}

=== CURRENT RESUME ===
{resume}

Provide 3-5 specific, actionable suggestions. Each should:
1. Target a specific section/bullet point
2. Include exact phrasing recommendations when possible
3. Incorporate relevant missing keywords naturally
4. Add quantified impact where appropriate

Format as a simple bullet list. Avoid generic advice."#;
