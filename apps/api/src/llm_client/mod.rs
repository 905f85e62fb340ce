//! LLM Client: the single point of entry for all completion-endpoint calls.
//!
//! No other module talks to the Gemini API directly. Callers depend on the
//! `CompletionProvider` trait so pipelines can run against any backend.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod json;
pub mod prompts;
#[cfg(test)]
pub mod testing;

use self::json::parse_llm_json;

const TEMPERATURE: f32 = 0.1;
const TOP_K: u32 = 1;
const TOP_P: f32 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// A structurally broken response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvelopeDefect {
    #[error("No candidates in response")]
    NoCandidates,
    #[error("Empty candidates list")]
    EmptyCandidates,
    #[error("No content in candidate")]
    NoContent,
    #[error("No parts in content")]
    NoParts,
    #[error("Empty parts list")]
    EmptyParts,
    #[error("No text in part")]
    NoText,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{defect}: {raw}")]
    Envelope { defect: EnvelopeDefect, raw: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {record}: {reason}")]
    InvalidRecord { record: &'static str, reason: String },
}

/// A generative-AI text completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the generated text, fences already stripped.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;
}

/// Calls the provider and deserializes the response into `T`.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    provider: &dyn CompletionProvider,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let text = provider.generate(prompt, Some(system)).await?;
    parse_llm_json(&text).map_err(LlmError::Parse)
}

/// Names accepted for the Gemini backend.
const GEMINI_ALIASES: &[&str] = &["google", "gemini"];

/// Returns true when `name` selects the configured backend without a fallback.
pub fn is_known_provider(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    name.is_empty() || GEMINI_ALIASES.contains(&name.as_str())
}

/// Logs a fallback when a request names a backend that is not configured.
pub fn resolve_provider_name(requested: &str) -> &'static str {
    if !is_known_provider(requested) {
        warn!("AI provider '{requested}' is not configured; falling back to google");
    }
    "google"
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

/// Walks `candidates[0].content.parts[0].text`, naming the first missing piece.
pub fn extract_candidate_text(envelope: &Value) -> Result<&str, EnvelopeDefect> {
    let candidates = envelope
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or(EnvelopeDefect::NoCandidates)?;
    let candidate = candidates.first().ok_or(EnvelopeDefect::EmptyCandidates)?;
    let content = candidate.get("content").ok_or(EnvelopeDefect::NoContent)?;
    let parts = content
        .get("parts")
        .and_then(Value::as_array)
        .ok_or(EnvelopeDefect::NoParts)?;
    let part = parts.first().ok_or(EnvelopeDefect::EmptyParts)?;
    part.get("text")
        .and_then(Value::as_str)
        .ok_or(EnvelopeDefect::NoText)
}

/// Client for the Gemini `generateContent` endpoint.
/// No retries: any failure is returned to the caller as-is.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: String, model: String, api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let full_prompt = match system {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        info!("Sending request to Gemini API (model: {})", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Gemini API returned {status}: {body}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Value = serde_json::from_str(&body)?;
        let text = extract_candidate_text(&envelope).map_err(|defect| {
            warn!("Malformed Gemini envelope: {defect}");
            LlmError::Envelope {
                defect,
                raw: body.clone(),
            }
        })?;

        if let Some(usage) = envelope.get("usageMetadata") {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, output_tokens={}",
                usage["promptTokenCount"], usage["candidatesTokenCount"]
            );
        }

        let cleaned = text.replace("```json", "").replace("```", "");
        let cleaned = cleaned.trim().to_string();
        debug!("Cleaned response text: {}", preview(&cleaned, 100));
        Ok(cleaned)
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
