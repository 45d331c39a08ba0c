//! Resume improvement suggestions

pub mod client;
pub mod fallback;
pub mod prompts;

pub use client::ChatCompletionSuggester;
pub use fallback::RuleBasedSuggester;

use crate::processing::semantic::SemanticMatch;
use async_trait::async_trait;

/// What a suggester gets to look at
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext<'a> {
    pub job_text: &'a str,
    pub resume_text: &'a str,
    pub missing_keywords: &'a [String],
    pub matches: &'a [SemanticMatch],
}

/// Produces a short list of actionable suggestions. Implementations handle
/// their own failures and always return something usable.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn generate(&self, context: &SuggestionContext<'_>) -> Vec<String>;

    fn name(&self) -> &str;
}
