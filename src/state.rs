use std::sync::Arc;

use crate::config::Config;
use crate::github::{GitHubClient, PagesHost, SourceHost};
use crate::llm::{GeminiClient, TextGenerator};
use crate::notify::{CallbackSink, HttpCallback};
use crate::publish::RepoLocks;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn TextGenerator>,
    pub source: Arc<dyn SourceHost>,
    pub pages: Arc<dyn PagesHost>,
    pub callback: Arc<dyn CallbackSink>,
    pub repo_locks: RepoLocks,
}

impl AppState {
    /// Wire the HTTP implementations of every external service.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let github = Arc::new(GitHubClient::from_config(&config)?);
        Ok(Self {
            llm: Arc::new(GeminiClient::from_config(&config)),
            source: github.clone(),
            pages: github,
            callback: Arc::new(HttpCallback::new(config.notify_timeout)),
            repo_locks: RepoLocks::new(),
            config: Arc::new(config),
        })
    }
}
