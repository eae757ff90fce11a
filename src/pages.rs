use crate::config::Config;
use crate::github::{PagesActivation, PagesHost, PagesSource};

/// Public site address for a repository of the configured account.
pub fn pages_url(account: &str, repo: &str) -> String {
    format!("https://{account}.github.io/{repo}/")
}

/// Request static hosting for `repo` from the root of the pages branch.
///
/// Best effort: activation failures are logged and the deterministic site
/// address is returned regardless.
#[tracing::instrument(skip(host, config))]
pub async fn activate(host: &dyn PagesHost, config: &Config, repo: &str) -> String {
    let source = PagesSource {
        branch: config.pages_branch.clone(),
        path: "/".into(),
    };
    let url = pages_url(&config.github_username, repo);

    match host.enable_pages(repo, &source).await {
        Ok(PagesActivation::Created) => tracing::info!(%url, "pages enabled"),
        Ok(PagesActivation::AlreadyEnabled) => tracing::info!(%url, "pages already enabled"),
        Err(e) => tracing::warn!(error = %e, %url, "pages activation failed, using expected URL"),
    }

    url
}
