use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::{
    CreatedRepo, FileCommit, FileWrite, HostError, NewRepo, PagesActivation, PagesHost,
    PagesSource, RemoteFile, SourceHost,
};
use crate::config::Config;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "Pagesmith/1.0";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

/// GitHub REST client acting on behalf of a single account.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, owner: &str, token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            owner: owner.to_owned(),
            token: token.to_owned(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            &config.github_api_url,
            &config.github_username,
            &config.github_token,
            config.github_timeout,
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.api_url))
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT)
    }

    fn repo_path(&self, repo: &str) -> String {
        format!("/repos/{}/{repo}", self.owner)
    }

    async fn send(
        builder: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, HostError> {
        builder.send().await.map_err(|e| HostError::Transport {
            operation,
            message: e.to_string(),
        })
    }

    async fn status_error(resp: Response, operation: &'static str) -> HostError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        HostError::Status {
            operation,
            status,
            body,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        resp: Response,
        operation: &'static str,
    ) -> Result<T, HostError> {
        resp.json().await.map_err(|e| HostError::Decode {
            operation,
            message: e.to_string(),
        })
    }
}

/// Decode the base64 `content` field of the contents API, which wraps lines.
fn decode_content(encoded: &str) -> Result<String, HostError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| HostError::Decode {
        operation: "get file",
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| HostError::Decode {
        operation: "get file",
        message: e.to_string(),
    })
}

#[async_trait]
impl SourceHost for GitHubClient {
    #[tracing::instrument(skip(self, repo), fields(name = %repo.name), err)]
    async fn create_repo(&self, repo: &NewRepo) -> Result<CreatedRepo, HostError> {
        const OP: &str = "create repository";
        let resp = Self::send(self.request(Method::POST, "/user/repos").json(repo), OP).await?;

        match resp.status() {
            // GitHub reports a name clash as 422; 409 is accepted for compatible hosts
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
                Err(HostError::AlreadyExists(repo.name.clone()))
            }
            s if s.is_success() => {
                let body: RepoResponse = Self::decode(resp, OP).await?;
                Ok(CreatedRepo {
                    html_url: body.html_url,
                })
            }
            _ => Err(Self::status_error(resp, OP).await),
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_repo(&self, name: &str) -> Result<(), HostError> {
        const OP: &str = "delete repository";
        let resp = Self::send(self.request(Method::DELETE, &self.repo_path(name)), OP).await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(resp, OP).await)
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_file(&self, repo: &str, path: &str) -> Result<RemoteFile, HostError> {
        const OP: &str = "get file";
        let url = format!("{}/contents/{path}", self.repo_path(repo));
        let resp = Self::send(self.request(Method::GET, &url), OP).await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp, OP).await);
        }

        let body: ContentResponse = Self::decode(resp, OP).await?;
        Ok(RemoteFile {
            content: decode_content(&body.content)?,
            sha: body.sha,
        })
    }

    #[tracing::instrument(skip(self, write), fields(update = write.sha.is_some()), err)]
    async fn put_file(
        &self,
        repo: &str,
        path: &str,
        write: &FileWrite,
    ) -> Result<FileCommit, HostError> {
        const OP: &str = "put file";
        let url = format!("{}/contents/{path}", self.repo_path(repo));

        let mut body = serde_json::json!({
            "message": write.message,
            "content": STANDARD.encode(write.content.as_bytes()),
        });
        if let Some(sha) = &write.sha {
            body["sha"] = serde_json::Value::String(sha.clone());
        }

        let resp = Self::send(self.request(Method::PUT, &url).json(&body), OP).await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp, OP).await);
        }

        let body: PutContentResponse = Self::decode(resp, OP).await?;
        Ok(FileCommit {
            commit_sha: body.commit.sha,
        })
    }
}

#[async_trait]
impl PagesHost for GitHubClient {
    #[tracing::instrument(skip(self, source), fields(branch = %source.branch), err)]
    async fn enable_pages(
        &self,
        repo: &str,
        source: &PagesSource,
    ) -> Result<PagesActivation, HostError> {
        const OP: &str = "enable pages";
        let url = format!("{}/pages", self.repo_path(repo));
        let body = serde_json::json!({ "source": source });

        let resp = Self::send(self.request(Method::POST, &url).json(&body), OP).await?;
        match resp.status() {
            StatusCode::CREATED => Ok(PagesActivation::Created),
            StatusCode::CONFLICT => Ok(PagesActivation::AlreadyEnabled),
            _ => Err(Self::status_error(resp, OP).await),
        }
    }
}
