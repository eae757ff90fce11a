pub mod error;
pub mod gemini;

use std::time::Duration;

use async_trait::async_trait;

pub use error::LlmError;
pub use gemini::GeminiClient;

/// Sampling parameters for a single completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

/// Text-generation capability used by the artifact generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the text of the first candidate for `prompt`.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError>;
}
