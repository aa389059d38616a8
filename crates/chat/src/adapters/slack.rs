//! Slack Web API chat adapter.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::ChatAdapter;
use crate::error::ChatError;
use crate::message::ChatMessage;

/// Environment variable for the Slack bot token.
const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";

/// Environment variable overriding the Slack API base URL.
const ENV_SLACK_API_URL: &str = "SLACK_API_URL";

/// Default Slack Web API base URL.
const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Posts messages through `chat.postMessage`.
pub struct SlackAdapter {
    token: Option<String>,
    api_url: String,
    client: reqwest::Client,
}

impl SlackAdapter {
    /// Create a new Slack adapter from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let token = std::env::var(ENV_SLACK_BOT_TOKEN)
            .ok()
            .filter(|t| !t.is_empty());

        if token.is_some() {
            debug!("Slack delivery enabled");
        } else {
            debug!("Slack delivery disabled (SLACK_BOT_TOKEN not set)");
        }

        Self {
            token,
            api_url: std::env::var(ENV_SLACK_API_URL)
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Create a Slack adapter with a specific bot token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Create a Slack adapter talking to a specific API base URL.
    #[must_use]
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            api_url: api_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Whether a bot token is configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl ChatAdapter for SlackAdapter {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), ChatError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ChatError::NotConfigured(ENV_SLACK_BOT_TOKEN.to_string()))?;

        let url = format!("{}/chat.postMessage", self.api_url.trim_end_matches('/'));
        debug!(adapter = "slack", channel = %message.channel, "Posting message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(message)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            warn!(adapter = "slack", retry_after_secs, "Slack rate limit hit");
            return Err(ChatError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                adapter = "slack",
                status = %status,
                body = %body,
                "Slack request failed"
            );
            return Err(ChatError::Api(format!("Slack returned {status}: {body}")));
        }

        // Slack reports most failures as 200 with `ok: false`.
        let body: PostMessageResponse = response.json().await?;
        if body.ok {
            debug!(adapter = "slack", "Message posted");
            Ok(())
        } else {
            let error = body.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!(adapter = "slack", error = %error, "Slack rejected message");
            Err(ChatError::Api(error))
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}
