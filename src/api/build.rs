use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;
use crate::generate::{self, Attachment};
use crate::notify::{self, NotificationPayload};
use crate::pages;
use crate::publish::{self, PublishParams, Round};
use crate::state::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Build request body. The `secret` field is checked on the raw body and
/// deliberately not kept here.
#[derive(Debug, Deserialize)]
pub struct BuildRequest {
    pub email: String,
    pub task: String,
    #[serde(default = "default_round")]
    pub round: u8,
    pub nonce: String,
    pub brief: String,
    #[serde(default)]
    pub checks: Vec<String>,
    pub evaluation_url: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

fn default_round() -> u8 {
    1
}

#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub message: &'static str,
    pub task: String,
    pub round: u8,
    pub repo_url: String,
    pub pages_url: String,
    pub commit_sha: String,
    /// False when the evaluation URL never acknowledged the notification.
    pub notified: bool,
}

/// Workflow stages, recorded on the request span as the build advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unauthenticated,
    Generating,
    Publishing,
    ActivatingPages,
    Notifying,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Generating => "generating",
            Self::Publishing => "publishing",
            Self::ActivatingPages => "activating_pages",
            Self::Notifying => "notifying",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

fn enter(stage: Stage) {
    tracing::Span::current().record("stage", stage.as_str());
    tracing::info!(stage = stage.as_str(), "build stage");
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new().route("/build-app", post(build_app))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[tracing::instrument(
    skip(state, body),
    fields(request_id = %Uuid::new_v4(), stage = Stage::Unauthenticated.as_str()),
    err
)]
async fn build_app(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BuildResponse>, ApiError> {
    let Json(body) = body
        .map_err(|e| ApiError::BadRequest(e.body_text()))
        .inspect_err(|_| enter(Stage::Failed))?;

    authorize(&state.config, &body).inspect_err(|_| enter(Stage::Failed))?;

    let request: BuildRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid build request: {e}")))
        .inspect_err(|_| enter(Stage::Failed))?;

    run_build(&state, request, Local::now().date_naive())
        .await
        .inspect_err(|_| enter(Stage::Failed))
        .map(Json)
}

/// Exact comparison against the configured secret. No configured secret
/// means nothing is authorized.
fn authorize(config: &Config, body: &Value) -> Result<(), ApiError> {
    let provided = body.get("secret").and_then(Value::as_str);
    match (config.shared_secret.as_deref(), provided) {
        (Some(expected), Some(given)) if expected == given => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Generate, publish, activate and notify for one authorized request.
pub async fn run_build(
    state: &AppState,
    request: BuildRequest,
    today: NaiveDate,
) -> Result<BuildResponse, ApiError> {
    let round = Round::try_from(request.round)?;
    validation::check_callback_url(&request.evaluation_url)?;
    let repo = publish::repo_name(&request.task);
    validation::check_repo_name(&repo)?;

    tracing::info!(task = %request.task, round = round.number(), "secret verified");

    enter(Stage::Generating);
    let artifact = generate::generate(
        state.llm.as_ref(),
        &request.brief,
        &request.attachments,
        &request.checks,
        &request.task,
    )
    .await?;

    let (published, pages_url) = {
        let _guard = state.repo_locks.acquire(&repo).await;

        enter(Stage::Publishing);
        let published = publish::publish(
            state.source.as_ref(),
            &state.config,
            &PublishParams {
                task: &request.task,
                artifact: &artifact,
                brief: &request.brief,
                round,
                today,
            },
        )
        .await?;

        enter(Stage::ActivatingPages);
        let pages_url = pages::activate(state.pages.as_ref(), &state.config, &repo).await;
        (published, pages_url)
    };

    enter(Stage::Notifying);
    let payload = NotificationPayload {
        email: request.email,
        task: request.task,
        round: round.number(),
        nonce: request.nonce,
        repo_url: published.repo_url,
        commit_sha: published.commit_sha,
        pages_url,
    };
    let notified = notify::notify_completion(
        state.callback.as_ref(),
        &state.config,
        &request.evaluation_url,
        &payload,
    )
    .await;
    if !notified {
        tracing::warn!("evaluation URL was not notified; reporting success anyway");
    }

    enter(Stage::Done);
    Ok(BuildResponse {
        message: "App built and deployed successfully",
        task: payload.task,
        round: payload.round,
        repo_url: payload.repo_url,
        pages_url: payload.pages_url,
        commit_sha: payload.commit_sha,
        notified,
    })
}
