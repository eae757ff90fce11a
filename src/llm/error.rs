#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("text generation returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("text generation returned no candidate text")]
    NoCandidate,

    #[error("text generation request failed: {0}")]
    Transport(String),

    #[error("text generation response could not be decoded: {0}")]
    Decode(String),
}
