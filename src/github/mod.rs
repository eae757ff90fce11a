//! Source-hosting and static-hosting capabilities, and their GitHub implementation.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde::Serialize;

pub use client::GitHubClient;
pub use error::HostError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepo {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepo {
    pub html_url: String,
}

/// A file as currently stored, with its decoded content and blob sha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub sha: String,
    pub content: String,
}

/// One content write. `sha` is the current blob sha when updating an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub message: String,
    pub content: String,
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub commit_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagesSource {
    pub branch: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagesActivation {
    Created,
    AlreadyEnabled,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Repository and content operations on the configured account.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Create a repository. A name clash yields [`HostError::AlreadyExists`].
    async fn create_repo(&self, repo: &NewRepo) -> Result<CreatedRepo, HostError>;

    async fn delete_repo(&self, name: &str) -> Result<(), HostError>;

    async fn get_file(&self, repo: &str, path: &str) -> Result<RemoteFile, HostError>;

    /// Create or update a file; every call is its own commit.
    async fn put_file(&self, repo: &str, path: &str, write: &FileWrite)
    -> Result<FileCommit, HostError>;
}

/// Static-site hosting activation.
#[async_trait]
pub trait PagesHost: Send + Sync {
    async fn enable_pages(
        &self,
        repo: &str,
        source: &PagesSource,
    ) -> Result<PagesActivation, HostError>;
}
