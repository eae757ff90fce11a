#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("repository '{0}' already exists")]
    AlreadyExists(String),

    #[error("{operation} returned status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} response could not be decoded: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}
