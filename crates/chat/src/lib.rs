//! Chat delivery for trust bot messages.
//!
//! This crate provides the message payloads the bot produces and the
//! adapters that deliver them.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use chat::{Announcer, ChatMessage, SlackAdapter};
//!
//! # async fn run() {
//! let announcer = Announcer::from_env(Arc::new(SlackAdapter::from_env()));
//! announcer
//!     .announce(&ChatMessage::text("", "NA1 is back to Healthy"))
//!     .await;
//! # }
//! ```
//!
//! # Configuration
//!
//! - `SLACK_BOT_TOKEN`: bot token used by [`SlackAdapter`]
//! - `SLACK_API_URL`: override of the Slack Web API base URL
//! - `TRUST_CHANNELS`: comma separated rooms the [`Announcer`] posts to
//!
//! # Architecture
//!
//! - [`ChatAdapter`] trait defines how a message reaches a room
//! - [`SlackAdapter`] posts through the Slack Web API
//! - [`StdoutAdapter`] prints the payload, for the command line
//! - [`Announcer`] fans one message out to every configured room

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod error;
pub mod message;

pub use adapters::slack::SlackAdapter;
pub use adapters::stdout::StdoutAdapter;
pub use adapters::ChatAdapter;
pub use error::ChatError;
pub use message::{Attachment, ChatMessage, Field};

use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Environment variable listing the announce channels.
const ENV_TRUST_CHANNELS: &str = "TRUST_CHANNELS";

/// Posts a message to every configured announce channel.
pub struct Announcer {
    adapter: Arc<dyn ChatAdapter>,
    channels: Vec<String>,
}

impl Announcer {
    /// Create an announcer reading its channels from `TRUST_CHANNELS`.
    #[must_use]
    pub fn from_env(adapter: Arc<dyn ChatAdapter>) -> Self {
        let channels = std::env::var(ENV_TRUST_CHANNELS)
            .map(|v| parse_channels(&v))
            .unwrap_or_default();
        Self::with_channels(adapter, channels)
    }

    /// Create an announcer with specific channels.
    #[must_use]
    pub fn with_channels(adapter: Arc<dyn ChatAdapter>, channels: Vec<String>) -> Self {
        if channels.is_empty() {
            warn!("No announce channels configured");
        } else {
            info!(
                adapter = adapter.name(),
                channel_count = channels.len(),
                "Announcer initialized"
            );
        }
        Self { adapter, channels }
    }

    /// Check if any channel is configured.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Configured channels.
    #[must_use]
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Send `message` to every channel, replacing its room.
    ///
    /// Delivery failures are logged and returned per channel; one failing
    /// channel does not stop the others.
    pub async fn announce(&self, message: &ChatMessage) -> Vec<(String, Result<(), ChatError>)> {
        if self.channels.is_empty() {
            debug!("No channels configured, skipping announcement");
            return vec![];
        }

        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let result = self.adapter.send(&message.to_channel(channel.as_str())).await;
            match &result {
                Ok(()) => debug!(channel = %channel, "Announcement sent"),
                Err(e) => error!(channel = %channel, error = %e, "Failed to send announcement"),
            }
            results.push((channel.clone(), result));
        }

        results
    }
}

/// Split a comma separated channel list, dropping blanks.
#[must_use]
pub fn parse_channels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
