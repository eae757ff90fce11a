//! Repository publishing: create or update the repository holding a generated app.

pub mod license;
pub mod lock;
pub mod readme;

use chrono::{Datelike, NaiveDate};

use crate::config::Config;
use crate::error::ApiError;
use crate::generate::GeneratedArtifact;
use crate::github::{FileWrite, HostError, NewRepo, SourceHost};

pub use lock::RepoLocks;

const GITHUB_WEB_URL: &str = "https://github.com";
const INDEX_PATH: &str = "index.html";
const README_PATH: &str = "README.md";
const LICENSE_PATH: &str = "LICENSE";
const DESCRIPTION_MAX_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// First build: create the repository.
    Initial,
    /// Revision of an existing build: update files in place.
    Revision,
}

impl Round {
    pub fn number(self) -> u8 {
        match self {
            Self::Initial => 1,
            Self::Revision => 2,
        }
    }
}

impl TryFrom<u8> for Round {
    type Error = ApiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Initial),
            2 => Ok(Self::Revision),
            other => Err(ApiError::BadRequest(format!(
                "round must be 1 or 2 (got {other})"
            ))),
        }
    }
}

pub struct PublishParams<'a> {
    pub task: &'a str,
    pub artifact: &'a GeneratedArtifact,
    pub brief: &'a str,
    pub round: Round,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub repo_url: String,
    pub commit_sha: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("repository '{0}' still exists after delete and recreate")]
    NameConflict(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        Self::Publish(err.to_string())
    }
}

/// Repository name for a task: lowercased, spaces replaced with hyphens.
pub fn repo_name(task: &str) -> String {
    task.replace(' ', "-").to_lowercase()
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// Publish an artifact. Files are written one commit at a time and a failure
/// part way through leaves the earlier commits in place.
#[tracing::instrument(skip_all, fields(task = %params.task, round = params.round.number()), err)]
pub async fn publish(
    host: &dyn SourceHost,
    config: &Config,
    params: &PublishParams<'_>,
) -> Result<PublishResult, PublishError> {
    let repo = repo_name(params.task);
    match params.round {
        Round::Initial => create_and_populate(host, config, &repo, params).await,
        Round::Revision => update_in_place(host, config, &repo, params).await,
    }
}

async fn create_and_populate(
    host: &dyn SourceHost,
    config: &Config,
    repo: &str,
    params: &PublishParams<'_>,
) -> Result<PublishResult, PublishError> {
    let new_repo = NewRepo {
        name: repo.to_owned(),
        description: params.brief.chars().take(DESCRIPTION_MAX_CHARS).collect(),
        private: false,
        auto_init: false,
    };

    let created = match host.create_repo(&new_repo).await {
        Ok(created) => created,
        Err(HostError::AlreadyExists(_)) => {
            // Concurrent builds of the same task from other processes can race here
            tracing::warn!(repo, "repository exists, deleting and recreating");
            if let Err(e) = host.delete_repo(repo).await {
                tracing::warn!(repo, error = %e, "delete before recreate failed");
            }
            tokio::time::sleep(config.recreate_delay).await;
            match host.create_repo(&new_repo).await {
                Ok(created) => created,
                Err(HostError::AlreadyExists(name)) => {
                    return Err(PublishError::NameConflict(name));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(repo, url = %created.html_url, "repository created");

    let license = license::mit_license(params.today.year(), &config.github_username);
    let files = [
        (INDEX_PATH, params.artifact.html.as_str()),
        (README_PATH, params.artifact.readme.as_str()),
        (LICENSE_PATH, license.as_str()),
    ];

    let mut commit_sha = String::new();
    for (path, content) in files {
        let write = FileWrite {
            message: format!("Add {path}"),
            content: content.to_owned(),
            sha: None,
        };
        commit_sha = host.put_file(repo, path, &write).await?.commit_sha;
        tracing::info!(repo, path, commit = %commit_sha, "file added");
    }

    Ok(PublishResult {
        repo_url: created.html_url,
        commit_sha,
    })
}

async fn update_in_place(
    host: &dyn SourceHost,
    config: &Config,
    repo: &str,
    params: &PublishParams<'_>,
) -> Result<PublishResult, PublishError> {
    let readme = match host.get_file(repo, README_PATH).await {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(repo, error = %e, "existing README unavailable, leaving it untouched");
            None
        }
    };

    let markup = host.get_file(repo, INDEX_PATH).await?;
    let write = FileWrite {
        message: format!("Round 2: Update {INDEX_PATH}"),
        content: params.artifact.html.clone(),
        sha: Some(markup.sha),
    };
    let mut commit_sha = host.put_file(repo, INDEX_PATH, &write).await?.commit_sha;
    tracing::info!(repo, path = INDEX_PATH, commit = %commit_sha, "file updated");

    if let Some(readme) = readme {
        let write = FileWrite {
            message: format!("Round 2: Update {README_PATH}"),
            content: readme::append_enhancement(&readme.content, params.brief, params.today),
            sha: Some(readme.sha),
        };
        commit_sha = host.put_file(repo, README_PATH, &write).await?.commit_sha;
        tracing::info!(repo, path = README_PATH, commit = %commit_sha, "file updated");
    }

    Ok(PublishResult {
        repo_url: format!("{GITHUB_WEB_URL}/{}/{repo}", config.github_username),
        commit_sha,
    })
}
