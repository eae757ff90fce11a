use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerationConfig, LlmError, TextGenerator};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.gemini_api_url,
            &config.gemini_model,
            &config.gemini_api_key,
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len(), temperature = config.temperature), err)]
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: WireGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        let text = parsed.into_text().ok_or(LlmError::NoCandidate)?;
        tracing::info!(chars = text.len(), "text generated");
        Ok(text)
    }
}
