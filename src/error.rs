use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid secret")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("Failed to generate code: {0}")]
    Generation(String),

    #[error("Failed to create GitHub repo: {0}")]
    Publish(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) | Self::Publish(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Unauthorized => tracing::warn!("build rejected: invalid secret"),
            Self::BadRequest(msg) => tracing::warn!(error = %msg, "build rejected"),
            Self::Generation(_) | Self::Publish(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "build failed");
            }
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
