//! Deterministic suggestions used when no language model is reachable

use crate::llm::{SuggestionContext, SuggestionGenerator};
use async_trait::async_trait;

const KEYWORDS_CONSIDERED: usize = 8;
const KEYWORDS_LISTED: usize = 5;

struct KeywordTheme {
    members: &'static [&'static str],
    advice: &'static str,
}

const THEMES: &[KeywordTheme] = &[
    KeywordTheme {
        members: &["react", "vue", "angular", "javascript", "typescript"],
        advice: "Add frontend framework experience to your technical skills and project descriptions.",
    },
    KeywordTheme {
        members: &["python", "java", "node.js", "go"],
        advice: "Highlight backend programming language experience in your work history.",
    },
    KeywordTheme {
        members: &["aws", "docker", "kubernetes", "ci/cd"],
        advice: "Include cloud and DevOps experience in your infrastructure work.",
    },
    KeywordTheme {
        members: &["testing", "jest", "pytest", "tdd"],
        advice: "Add testing methodology experience to demonstrate code quality focus.",
    },
];

const GENERAL_ADVICE: &[&str] = &[
    "Quantify your impact with specific metrics (e.g., 'Improved performance by 30%').",
    "Use action verbs like 'Built', 'Implemented', 'Optimized', 'Led' to start bullet points.",
    "Align your technical language with the job description terminology.",
];

pub struct RuleBasedSuggester {
    max_suggestions: usize,
}

impl RuleBasedSuggester {
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }

    pub fn suggest(&self, missing_keywords: &[String]) -> Vec<String> {
        let mut suggestions: Vec<String> = Vec::new();
        let considered = &missing_keywords[..missing_keywords.len().min(KEYWORDS_CONSIDERED)];

        if !considered.is_empty() {
            for theme in THEMES {
                if considered.iter().any(|k| theme.members.contains(&k.as_str())) {
                    suggestions.push(theme.advice.to_string());
                }
            }

            let written = suggestions.join(" ");
            let remaining: Vec<&str> = considered
                .iter()
                .map(String::as_str)
                .filter(|k| !written.contains(k))
                .take(KEYWORDS_LISTED)
                .collect();
            if !remaining.is_empty() {
                suggestions.push(format!(
                    "Consider incorporating these technologies in relevant project descriptions: {}",
                    remaining.join(", ")
                ));
            }
        }

        suggestions.extend(GENERAL_ADVICE.iter().map(|s| s.to_string()));
        suggestions.truncate(self.max_suggestions);
        suggestions
    }
}

impl Default for RuleBasedSuggester {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl SuggestionGenerator for RuleBasedSuggester {
    async fn generate(&self, context: &SuggestionContext<'_>) -> Vec<String> {
        self.suggest(context.missing_keywords)
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}
