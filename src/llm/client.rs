//! Suggestions from an OpenAI-compatible chat completions endpoint

use crate::config::SuggestionConfig;
use crate::error::{AnalyticaError, Result};
use crate::llm::fallback::RuleBasedSuggester;
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::llm::{SuggestionContext, SuggestionGenerator};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Overrides the configured model name when set
pub const MODEL_ENV_VAR: &str = "OPENAI_MODEL";

const MIN_SUGGESTION_CHARS: usize = 20;
const PREAMBLE_PREFIXES: &[&str] = &["here", "suggestion", "improve"];
const BULLET_CHARS: &[char] = &['•', '-', '*', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '.', ' '];

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionSuggester {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_suggestions: usize,
    templates: PromptTemplates,
    fallback: RuleBasedSuggester,
}

impl ChatCompletionSuggester {
    /// Reads the API key from the configured environment variable. A missing
    /// key is not an error; every request then goes to the fallback.
    pub fn from_config(config: &SuggestionConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(
                "{} not set, AI suggestions are disabled and rule-based suggestions will be used",
                config.api_key_env
            );
        }

        let model = env::var(MODEL_ENV_VAR).unwrap_or_else(|_| config.model.clone());
        Self::new(config, api_key, model)
    }

    pub fn new(config: &SuggestionConfig, api_key: Option<String>, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_suggestions: config.max_suggestions,
            templates: PromptTemplates::default(),
            fallback: RuleBasedSuggester::new(config.max_suggestions),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether the service answers a trivial prompt
    pub async fn connection_check(&self) -> bool {
        if !self.is_configured() {
            return false;
        }

        match self
            .complete(None, "Say 'AI connection test successful'", 10, None)
            .await
        {
            Ok(content) => !content.is_empty(),
            Err(e) => {
                error!("AI connection test failed: {}", e);
                false
            }
        }
    }

    async fn try_generate(&self, context: &SuggestionContext<'_>) -> Result<Vec<String>> {
        let prompt = self.templates.render_suggestion_prompt(&PromptParams {
            job_text: context.job_text,
            resume_text: context.resume_text,
            missing_keywords: context.missing_keywords,
            matches: context.matches,
        });

        let content = self
            .complete(
                Some(&self.templates.system_message),
                &prompt,
                self.max_tokens,
                Some(self.temperature),
            )
            .await?;

        let suggestions = parse_suggestions(&content, self.max_suggestions);
        if suggestions.is_empty() {
            return Err(AnalyticaError::Suggestion(
                "Could not parse suggestions from the model response".to_string(),
            ));
        }
        Ok(suggestions)
    }

    async fn complete(
        &self,
        system: Option<&str>,
        prompt: &str,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AnalyticaError::Suggestion("No API key configured".to_string()))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        debug!("Requesting chat completion from {} with {}", self.base_url, self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyticaError::Suggestion(format!(
                "Chat completion returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AnalyticaError::Suggestion("Empty response from model".to_string()));
        }
        Ok(content)
    }
}

#[async_trait]
impl SuggestionGenerator for ChatCompletionSuggester {
    async fn generate(&self, context: &SuggestionContext<'_>) -> Vec<String> {
        if !self.is_configured() {
            return self.fallback.suggest(context.missing_keywords);
        }

        match self.try_generate(context).await {
            Ok(suggestions) => {
                info!("Generated {} AI suggestions", suggestions.len());
                suggestions
            }
            Err(e) => {
                error!("Falling back to rule-based suggestions: {}", e);
                self.fallback.suggest(context.missing_keywords)
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Turn a free-form model reply into at most `max` bullet-free suggestions
pub fn parse_suggestions(content: &str, max: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_lowercase();
            !PREAMBLE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
        })
        .map(|line| line.trim_start_matches(BULLET_CHARS))
        .filter(|line| line.chars().count() >= MIN_SUGGESTION_CHARS)
        .map(|line| line.strip_suffix(':').unwrap_or(line).to_string())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_completion(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn suggester(base_url: &str, api_key: Option<&str>) -> ChatCompletionSuggester {
        let mut config = Config::default().suggestions;
        config.api_base_url = base_url.to_string();
        config.timeout_secs = 5;
        ChatCompletionSuggester::new(&config, api_key.map(str::to_string), "test-model".to_string())
            .unwrap()
    }

    fn context<'a>(missing: &'a [String]) -> SuggestionContext<'a> {
        SuggestionContext {
            job_text: "We need a Rust engineer with AWS.",
            resume_text: "I write Rust.",
            missing_keywords: missing,
            matches: &[],
        }
    }

    #[test]
    fn test_parse_suggestions() {
        let content = "Here are my suggestions:\n\n\
                       1. Add AWS Lambda work to the Acme project bullet\n\
                       - Too short\n\
                       • Mention Kubernetes in the platform migration bullet:\n\
                       Suggestion: ignore this\n\
                       **Quantify the latency improvement on the API gateway";

        assert_eq!(
            parse_suggestions(content, 5),
            vec![
                "Add AWS Lambda work to the Acme project bullet".to_string(),
                "Mention Kubernetes in the platform migration bullet".to_string(),
                "Quantify the latency improvement on the API gateway".to_string(),
            ]
        );
        assert_eq!(parse_suggestions(content, 1).len(), 1);
        assert!(parse_suggestions("", 5).is_empty());
    }

    #[tokio::test]
    async fn test_without_key_uses_fallback() {
        let suggester = suggester("http://127.0.0.1:9", None);
        assert!(!suggester.is_configured());
        assert!(!suggester.connection_check().await);

        let missing = vec!["aws".to_string()];
        let suggestions = suggester.generate(&context(&missing)).await;
        assert_eq!(suggestions, RuleBasedSuggester::new(5).suggest(&missing));
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let reply = serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "- Add AWS deployment details to your most recent role\n- Describe the Rust services you shipped with latency numbers"
                }
            }]
        });
        let server = mock_completion(200, reply).await;

        let missing = vec!["aws".to_string()];
        let suggestions = suggester(&server.uri(), Some("sk-test"))
            .generate(&context(&missing))
            .await;
        assert_eq!(
            suggestions,
            vec![
                "Add AWS deployment details to your most recent role".to_string(),
                "Describe the Rust services you shipped with latency numbers".to_string(),
            ]
        );

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let request: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(request["model"], "test-model");
        assert_eq!(request["max_tokens"], 800);
        assert_eq!(request["messages"][0]["role"], "system");
        assert!(request["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("MISSING KEYWORDS (prioritize these): aws"));
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let server = mock_completion(500, serde_json::json!({})).await;

        let missing = vec!["docker".to_string()];
        let suggestions = suggester(&server.uri(), Some("sk-test"))
            .generate(&context(&missing))
            .await;
        assert_eq!(suggestions, RuleBasedSuggester::new(5).suggest(&missing));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let reply = serde_json::json!({
            "choices": [{ "message": { "content": "ok" } }]
        });
        let server = mock_completion(200, reply).await;

        let suggestions = suggester(&server.uri(), Some("sk-test"))
            .generate(&context(&[]))
            .await;
        assert_eq!(suggestions, RuleBasedSuggester::new(5).suggest(&[]));
    }
}
