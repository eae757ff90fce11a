//! In-memory fakes for the external-service traits (testing only).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::github::{
    CreatedRepo, FileCommit, FileWrite, HostError, NewRepo, PagesActivation, PagesHost,
    PagesSource, RemoteFile, SourceHost,
};
use crate::llm::{GenerationConfig, LlmError, TextGenerator};
use crate::notify::{CallbackError, CallbackSink, NotificationPayload};

pub fn test_config() -> Config {
    Config {
        listen: "127.0.0.1:0".into(),
        shared_secret: Some("s3cret".into()),
        gemini_api_key: "test-key".into(),
        gemini_api_url: "http://127.0.0.1:1".into(),
        gemini_model: "gemini-test".into(),
        github_token: "test-token".into(),
        github_username: "octo".into(),
        github_api_url: "http://127.0.0.1:1".into(),
        github_timeout: Duration::from_secs(5),
        pages_branch: "main".into(),
        recreate_delay: Duration::ZERO,
        notify_max_attempts: 5,
        notify_initial_backoff: Duration::from_secs(1),
        notify_timeout: Duration::from_secs(5),
        max_body_bytes: 1024 * 1024,
    }
}

// ---------------------------------------------------------------------------
// FakeLlm
// ---------------------------------------------------------------------------

/// Replays scripted completions in order; runs dry with `NoCandidate`.
#[derive(Debug, Default)]
pub struct FakeLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, GenerationConfig)>>,
}

impl FakeLlm {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, GenerationConfig)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeLlm {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_owned(), *config));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::NoCandidate))
    }
}

// ---------------------------------------------------------------------------
// FakeSourceHost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Create(NewRepo),
    Delete(String),
    Get(String),
    Put(String),
}

#[derive(Debug, Default)]
struct HostState {
    calls: Vec<HostCall>,
    writes: Vec<(String, FileWrite)>,
    files: HashMap<String, RemoteFile>,
    conflicts_left: u32,
    create_status: Option<u16>,
    failing_put: Option<String>,
    commits: u32,
}

/// Single-repository source host keeping files in a map.
#[derive(Debug, Default)]
pub struct FakeSourceHost {
    state: Mutex<HostState>,
    latency: Duration,
}

impl FakeSourceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next `n` create calls with a name clash.
    pub fn with_conflicts(self, n: u32) -> Self {
        self.state.lock().unwrap().conflicts_left = n;
        self
    }

    /// Delay every create and write by `latency` before it takes effect.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub fn failing_create(self, status: u16) -> Self {
        self.state.lock().unwrap().create_status = Some(status);
        self
    }

    pub fn failing_put(self, path: &str) -> Self {
        self.state.lock().unwrap().failing_put = Some(path.to_owned());
        self
    }

    pub fn with_file(self, path: &str, content: &str, sha: &str) -> Self {
        self.state.lock().unwrap().files.insert(
            path.to_owned(),
            RemoteFile {
                sha: sha.to_owned(),
                content: content.to_owned(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Successful writes in order.
    pub fn writes(&self) -> Vec<(String, FileWrite)> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn stored_paths(&self) -> Vec<String> {
        self.writes().into_iter().map(|(path, _)| path).collect()
    }
}

#[async_trait]
impl SourceHost for FakeSourceHost {
    async fn create_repo(&self, repo: &NewRepo) -> Result<CreatedRepo, HostError> {
        self.delay().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::Create(repo.clone()));
        if let Some(status) = state.create_status {
            return Err(HostError::Status {
                operation: "create repository",
                status,
                body: String::new(),
            });
        }
        if state.conflicts_left > 0 {
            state.conflicts_left -= 1;
            return Err(HostError::AlreadyExists(repo.name.clone()));
        }
        Ok(CreatedRepo {
            html_url: format!("https://github.com/octo/{}", repo.name),
        })
    }

    async fn delete_repo(&self, name: &str) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::Delete(name.to_owned()));
        state.files.clear();
        Ok(())
    }

    async fn get_file(&self, _repo: &str, path: &str) -> Result<RemoteFile, HostError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::Get(path.to_owned()));
        state.files.get(path).cloned().ok_or(HostError::Status {
            operation: "get file",
            status: 404,
            body: "Not Found".into(),
        })
    }

    async fn put_file(
        &self,
        _repo: &str,
        path: &str,
        write: &FileWrite,
    ) -> Result<FileCommit, HostError> {
        self.delay().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::Put(path.to_owned()));
        if state.failing_put.as_deref() == Some(path) {
            return Err(HostError::Status {
                operation: "put file",
                status: 500,
                body: String::new(),
            });
        }
        state.commits += 1;
        let n = state.commits;
        state.writes.push((path.to_owned(), write.clone()));
        state.files.insert(
            path.to_owned(),
            RemoteFile {
                sha: format!("blob-{n}"),
                content: write.content.clone(),
            },
        );
        Ok(FileCommit {
            commit_sha: format!("commit-{n}"),
        })
    }
}

// ---------------------------------------------------------------------------
// FakePages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum PagesBehavior {
    Created,
    AlreadyEnabled,
    Status(u16),
    Unreachable,
}

#[derive(Debug)]
pub struct FakePages {
    behavior: PagesBehavior,
    calls: Mutex<Vec<(String, PagesSource)>>,
}

impl FakePages {
    pub fn new(behavior: PagesBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, PagesSource)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagesHost for FakePages {
    async fn enable_pages(
        &self,
        repo: &str,
        source: &PagesSource,
    ) -> Result<PagesActivation, HostError> {
        self.calls
            .lock()
            .unwrap()
            .push((repo.to_owned(), source.clone()));
        match self.behavior {
            PagesBehavior::Created => Ok(PagesActivation::Created),
            PagesBehavior::AlreadyEnabled => Ok(PagesActivation::AlreadyEnabled),
            PagesBehavior::Status(status) => Err(HostError::Status {
                operation: "enable pages",
                status,
                body: String::new(),
            }),
            PagesBehavior::Unreachable => Err(HostError::Transport {
                operation: "enable pages",
                message: "connection refused".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeCallback
// ---------------------------------------------------------------------------

/// Scripted callback receiver; repeats the last scripted outcome when run dry.
#[derive(Debug)]
pub struct FakeCallback {
    outcomes: Mutex<VecDeque<Result<u16, String>>>,
    last: Result<u16, String>,
    attempts: Mutex<Vec<(tokio::time::Instant, NotificationPayload)>>,
}

impl FakeCallback {
    pub fn always(status: u16) -> Self {
        Self::scripted(vec![Ok(status)])
    }

    pub fn scripted(outcomes: Vec<Result<u16, String>>) -> Self {
        let last = outcomes.last().cloned().unwrap_or(Ok(200));
        Self {
            outcomes: Mutex::new(outcomes.into()),
            last,
            attempts: Mutex::default(),
        }
    }

    pub fn attempts(&self) -> Vec<(tokio::time::Instant, NotificationPayload)> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallbackSink for FakeCallback {
    async fn post(&self, _url: &str, payload: &NotificationPayload) -> Result<u16, CallbackError> {
        self.attempts
            .lock()
            .unwrap()
            .push((tokio::time::Instant::now(), payload.clone()));
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone());
        outcome.map_err(CallbackError::Transport)
    }
}
