//! Completion notification to the caller's evaluation URL.

pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub use webhook::HttpCallback;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub email: String,
    pub task: String,
    pub round: u8,
    pub nonce: String,
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("callback request failed: {0}")]
    Transport(String),
}

/// Delivery of a notification payload; returns the HTTP status received.
#[async_trait]
pub trait CallbackSink: Send + Sync {
    async fn post(&self, url: &str, payload: &NotificationPayload) -> Result<u16, CallbackError>;
}

/// Post `payload` to `url`, retrying with exponential backoff.
///
/// Makes at most `config.notify_max_attempts` attempts. The delay starts at
/// `config.notify_initial_backoff` and doubles after every failed attempt;
/// there is no delay after the last one. Only a 2xx status counts as success.
#[tracing::instrument(skip(sink, config, payload), fields(task = %payload.task, round = payload.round))]
pub async fn notify_completion(
    sink: &dyn CallbackSink,
    config: &Config,
    url: &str,
    payload: &NotificationPayload,
) -> bool {
    let attempts = config.notify_max_attempts;
    let mut delay = config.notify_initial_backoff;

    for attempt in 1..=attempts {
        match sink.post(url, payload).await {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(attempt, status, "evaluation URL notified");
                return true;
            }
            Ok(status) => {
                tracing::warn!(attempt, status, "evaluation URL returned non-success status");
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "notification attempt failed");
            }
        }

        if attempt < attempts {
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }

    tracing::error!(attempts, "failed to notify evaluation URL after all retries");
    false
}
