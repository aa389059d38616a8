//! HTTP server for Slack slash commands.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chat::ChatAdapter;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::command::{Command, USAGE};
use crate::handlers::{CommandHandler, Origin};
use crate::signature::{validate_timestamp, verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Command handler.
    pub handler: CommandHandler,
    /// Adapter answers are delivered through.
    pub adapter: Arc<dyn ChatAdapter>,
    /// Slack signing secret. Requests are not verified when unset.
    pub signing_secret: Option<String>,
    /// Maximum age of a signed request in seconds.
    pub max_request_age_secs: i64,
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/slack/commands", post(slash_command_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn run_server(state: AppState, port: u16) -> Result<()> {
    if state.signing_secret.is_none() {
        warn!("SLACK_SIGNING_SECRET not set, slash command signatures will not be verified");
    }

    let app = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Trust bot listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Form fields of a slash command request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlashCommand {
    /// Slash command name, e.g. `/trust`.
    pub command: String,
    /// Text after the command.
    pub text: String,
    /// Room the command was sent from.
    pub channel_id: String,
    /// User who sent the command.
    pub user_id: Option<String>,
}

impl SlashCommand {
    /// Decode a form-encoded request body.
    pub fn from_form(body: &[u8]) -> Self {
        let mut command = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "command" => command.command = value.into_owned(),
                "text" => command.text = value.into_owned(),
                "channel_id" => command.channel_id = value.into_owned(),
                "user_id" => command.user_id = Some(value.into_owned()).filter(|u| !u.is_empty()),
                _ => {}
            }
        }
        command
    }
}

/// Handle an incoming slash command.
///
/// The command runs in a spawned task; the request is acknowledged right
/// away and the answer is posted through the chat adapter.
pub async fn slash_command_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    if let Some(secret) = &state.signing_secret {
        verify_request(&headers, &body, secret, state.max_request_age_secs)?;
        debug!("Slash command signature verified");
    }

    let request = SlashCommand::from_form(&body);
    if request.channel_id.is_empty() {
        warn!("Slash command without channel_id");
        return Err(StatusCode::BAD_REQUEST);
    }

    info!(
        command = %request.command,
        channel = %request.channel_id,
        text = %request.text,
        "Received slash command"
    );

    let Some(command) = Command::parse(&request.text) else {
        debug!(text = %request.text, "Unrecognized command text");
        return Ok(Json(json!({
            "response_type": "ephemeral",
            "text": USAGE,
        })));
    };

    let origin = Origin::new(request.channel_id, request.user_id);
    tokio::spawn(async move {
        if let Err(e) = state
            .handler
            .dispatch(state.adapter.as_ref(), &origin, &command)
            .await
        {
            error!(command = command.name(), error = %e, "Failed to deliver answer");
        }
    });

    Ok(Json(json!({ "response_type": "in_channel" })))
}

fn verify_request(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
    max_age_secs: i64,
) -> Result<(), StatusCode> {
    let (Some(timestamp), Some(signature)) = (
        header(headers, TIMESTAMP_HEADER),
        header(headers, SIGNATURE_HEADER),
    ) else {
        warn!("Missing Slack signature headers");
        return Err(StatusCode::UNAUTHORIZED);
    };

    if !validate_timestamp(timestamp, max_age_secs, chrono::Utc::now().timestamp()) {
        warn!(timestamp = %timestamp, "Slash command timestamp is stale");
        return Err(StatusCode::UNAUTHORIZED);
    }

    if !verify_signature(body, timestamp, signature, secret) {
        warn!("Invalid slash command signature");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
