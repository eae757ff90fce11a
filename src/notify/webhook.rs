use std::time::Duration;

use async_trait::async_trait;

use super::{CallbackError, CallbackSink, NotificationPayload};

/// Posts notification payloads as JSON over HTTP.
#[derive(Clone)]
pub struct HttpCallback {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCallback {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl CallbackSink for HttpCallback {
    #[tracing::instrument(skip(self, payload), err)]
    async fn post(&self, url: &str, payload: &NotificationPayload) -> Result<u16, CallbackError> {
        let resp = self
            .client
            .post(url)
            .header("User-Agent", "Pagesmith-Notification/1.0")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| CallbackError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        tracing::info!(url, status, "notification delivered");
        Ok(status)
    }
}
