//! Serve command
//!
//! Usage: figwatch serve [--listen <ADDR>] (settings also read from env)

use crate::archive::Archive;
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use figwatch_core::annotate::DEFAULT_WEB_BASE;
use figwatch_core::errors::{ExError, ExErrorKind};
use figwatch_core::model::PublishEvent;
use figwatch_core::report::model::{DEFAULT_CHANGE_LIMIT, DEFAULT_COMPONENT_LIMIT};
use figwatch_core::report::{ReportLimits, ReportSettings};
use figwatch_core_types::{RequestId, Sensitive};
use figwatch_engine::api::{ApiConfig, FigmaClient, DEFAULT_API_BASE};
use figwatch_engine::notify::{CodexBotNotifier, DEFAULT_NOTIFY_BASE};
use figwatch_engine::PublishPipeline;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Acknowledgement body for accepted events.
pub const ACK_BODY: &str = "JSON data saved";

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, env = "FIGWATCH_LISTEN", default_value = "0.0.0.0:80")]
    pub listen: String,

    /// Revision API token
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Max entries per component section
    #[arg(long, env = "LIMIT", default_value_t = DEFAULT_COMPONENT_LIMIT)]
    pub limit: usize,

    /// Max lines in the changes section
    #[arg(long, env = "CHANGES_LIMIT", default_value_t = DEFAULT_CHANGE_LIMIT)]
    pub changes_limit: usize,

    #[arg(long, env = "FIGWATCH_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "FIGWATCH_WEB_BASE", default_value = DEFAULT_WEB_BASE)]
    pub web_base: String,

    /// Timeout of each outbound call, in seconds
    #[arg(long, env = "FIGWATCH_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Chat-bot token; reports are not delivered without it
    #[arg(long, env = "CODEX_BOT_TOKEN", hide_env_values = true)]
    pub codex_bot_token: Option<String>,

    #[arg(long, env = "FIGWATCH_NOTIFY_BASE", default_value = DEFAULT_NOTIFY_BASE)]
    pub notify_base: String,

    /// Directory for raw payloads and rendered reports
    #[arg(long, env = "FIGWATCH_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,
}

pub struct AppState {
    pub pipeline: PublishPipeline,
    pub archive: Option<Archive>,
}

pub fn execute(args: ServeArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(serve(args))
}

async fn serve(args: ServeArgs) -> Result<()> {
    let state = Arc::new(build_state(&args)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "webhook listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(args: &ServeArgs) -> Result<AppState> {
    let timeout = Duration::from_secs(args.timeout_secs);
    let api = FigmaClient::new(ApiConfig {
        base_url: args.api_base.clone(),
        token: Sensitive::new(args.api_token.clone()),
        timeout,
    })?;
    let settings = ReportSettings {
        web_base: args.web_base.clone(),
        limits: ReportLimits {
            component_limit: args.limit,
            change_limit: args.changes_limit,
        },
    };

    let mut pipeline = PublishPipeline::new(Arc::new(api), settings);
    match &args.codex_bot_token {
        Some(token) => {
            let notifier =
                CodexBotNotifier::new(&args.notify_base, &Sensitive::new(token.clone()), timeout)?;
            pipeline = pipeline.with_notifier(Arc::new(notifier));
        }
        None => tracing::warn!("CODEX_BOT_TOKEN not set; reports will not be delivered"),
    }

    Ok(AppState {
        pipeline,
        archive: args.archive_dir.clone().map(Archive::new),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn webhook(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request_id = RequestId::new();
    let archive = state.archive.as_ref().map(|a| a.entry(&request_id));

    if let Some(entry) = &archive {
        archived(entry.save_event(&body).await);
    }

    let event: PublishEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            let err = ExError::new(ExErrorKind::InvalidInput)
                .with_op("webhook")
                .with_request_id(request_id)
                .with_message(format!("No JSON data received: {}", e));
            return error_response(&err);
        }
    };

    let outcome = match state.pipeline.handle_event_with(request_id, &event).await {
        Ok(outcome) => outcome,
        Err(err) => return error_response(&err),
    };

    if let (Some(entry), Some(report)) = (&archive, &outcome.report) {
        archived(entry.save_message(&report.render()).await);
    }
    (StatusCode::OK, ACK_BODY).into_response()
}

fn archived(result: figwatch_core::Result<PathBuf>) {
    match result {
        Ok(path) => tracing::debug!(path = %path.display(), "archived"),
        Err(err) => tracing::warn!(err.code = err.code(), message = %err, "archive write failed"),
    }
}

fn error_response(err: &ExError) -> Response {
    let status = if err.kind().is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = json!({
        "error": {
            "code": err.code(),
            "message": err.message(),
            "request_id": err.request_id().map(RequestId::as_str),
        }
    });
    (status, Json(body)).into_response()
}
