//! Artifact generation: one completion for the page markup, one for the README.

pub mod extract;
pub mod prompt;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::llm::{GenerationConfig, LlmError, TextGenerator};

pub const PAGE_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.2,
    max_output_tokens: 8000,
    timeout: Duration::from_secs(120),
};

pub const README_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.3,
    max_output_tokens: 1000,
    timeout: Duration::from_secs(60),
};

/// A file supplied with the build request, referenced by URL (usually a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub html: String,
    pub readme: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model output contains no <!DOCTYPE or <html> marker")]
    InvalidMarkup { preview: String },
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        Self::Generation(err.to_string())
    }
}

/// Generate the page markup and README for a task.
#[tracing::instrument(skip_all, fields(%task, checks = checks.len(), attachments = attachments.len()), err)]
pub async fn generate(
    llm: &dyn TextGenerator,
    brief: &str,
    attachments: &[Attachment],
    checks: &[String],
    task: &str,
) -> Result<GeneratedArtifact, GenerateError> {
    let raw = llm
        .generate(&prompt::page_prompt(brief, attachments, checks), &PAGE_GENERATION)
        .await?;

    let Some(html) = extract::extract_document(&raw) else {
        let preview: String = raw.chars().take(300).collect();
        tracing::warn!(%preview, "generated output is not an HTML document");
        return Err(GenerateError::InvalidMarkup { preview });
    };
    tracing::info!(chars = html.len(), "page markup generated");

    let readme = llm
        .generate(&prompt::readme_prompt(task, brief, checks), &README_GENERATION)
        .await?
        .trim()
        .to_owned();
    tracing::info!(chars = readme.len(), "readme generated");

    Ok(GeneratedArtifact { html, readme })
}
