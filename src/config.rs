use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    /// Shared secret every build request must carry. `None` rejects all builds.
    pub shared_secret: Option<String>,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub github_token: String,
    pub github_username: String,
    pub github_api_url: String,
    pub github_timeout: Duration,
    pub pages_branch: String,
    pub recreate_delay: Duration,
    pub notify_max_attempts: u32,
    pub notify_initial_backoff: Duration,
    pub notify_timeout: Duration,
    pub max_body_bytes: usize,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn millis(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(parse_or(name, default_ms))
}

fn secs(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(parse_or(name, default_secs))
}

impl Config {
    pub fn load() -> Self {
        Self {
            listen: env::var("PAGESMITH_LISTEN").unwrap_or_else(|_| "0.0.0.0:7860".into()),
            shared_secret: env::var("PAGESMITH_SECRET").ok().filter(|s| !s.is_empty()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into()),
            github_token: env::var("GITHUB_TOKEN").unwrap_or_default(),
            github_username: env::var("GITHUB_USERNAME").unwrap_or_default(),
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            github_timeout: secs("PAGESMITH_GITHUB_TIMEOUT_SECS", 30),
            pages_branch: env::var("PAGESMITH_PAGES_BRANCH").unwrap_or_else(|_| "main".into()),
            recreate_delay: millis("PAGESMITH_RECREATE_DELAY_MS", 2000),
            notify_max_attempts: parse_or("PAGESMITH_NOTIFY_ATTEMPTS", 5),
            notify_initial_backoff: millis("PAGESMITH_NOTIFY_BACKOFF_MS", 1000),
            notify_timeout: secs("PAGESMITH_NOTIFY_TIMEOUT_SECS", 10),
            max_body_bytes: parse_or("PAGESMITH_MAX_BODY_BYTES", 1024 * 1024),
        }
    }

    /// Log which credentials are present. Values are never printed.
    pub fn report(&self) {
        tracing::info!(
            secret = self.shared_secret.is_some(),
            gemini = !self.gemini_api_key.is_empty(),
            github_token = !self.github_token.is_empty(),
            github_user = %self.github_username,
            "configuration loaded"
        );
        if self.shared_secret.is_none() {
            tracing::warn!("PAGESMITH_SECRET not set; every build request will be rejected");
        }
        if self.gemini_api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY not set");
        }
        if self.github_token.is_empty() || self.github_username.is_empty() {
            tracing::warn!("GITHUB_TOKEN or GITHUB_USERNAME not set");
        }
    }
}
