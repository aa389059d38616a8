//! Command handlers.
//!
//! Each handler resolves its data through [`StatusApi`] and turns it into a
//! [`ChatMessage`] for the room the command came from. Status and version
//! failures are answered with an "Unknown instance" reply; alias and metrics
//! failures are only logged.

use std::sync::Arc;

use chat::{Attachment, ChatAdapter, ChatError, ChatMessage, Field};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use trust::{
    aggregate, classify, line_chart_url, InstanceAlias, InstanceRecord, MetricSeries, StatusApi,
    TrustConfig, TrustError,
};

use crate::command::Command;

/// Where a command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Room to answer in.
    pub channel: String,
    /// User who sent the command, mentioned in plain replies.
    pub user: Option<String>,
}

impl Origin {
    /// Create an origin.
    pub fn new(channel: impl Into<String>, user: Option<String>) -> Self {
        Self {
            channel: channel.into(),
            user,
        }
    }
}

/// Runs chat commands against the status API.
#[derive(Clone)]
pub struct CommandHandler {
    api: Arc<dyn StatusApi>,
    config: TrustConfig,
}

impl CommandHandler {
    /// Create a handler.
    pub fn new(api: Arc<dyn StatusApi>, config: TrustConfig) -> Self {
        Self { api, config }
    }

    /// Run `command` and build the answer, if any.
    pub async fn handle(&self, origin: &Origin, command: &Command) -> Option<ChatMessage> {
        info!(command = command.name(), channel = %origin.channel, "Handling command");

        match command {
            Command::Status(instance) => Some(self.status(origin, instance).await),
            Command::Version(instance) => Some(self.version(origin, instance).await),
            Command::Alias(alias) => self.alias(origin, alias).await,
            Command::Metrics => self.metrics(origin).await,
        }
    }

    /// Run `command` and deliver the answer through `adapter`.
    pub async fn dispatch(
        &self,
        adapter: &dyn ChatAdapter,
        origin: &Origin,
        command: &Command,
    ) -> Result<(), ChatError> {
        match self.handle(origin, command).await {
            Some(message) => adapter.send(&message).await,
            None => {
                debug!(command = command.name(), "Nothing to send");
                Ok(())
            }
        }
    }

    async fn status(&self, origin: &Origin, instance: &str) -> ChatMessage {
        match self.api.instance_status(instance).await {
            Ok(record) => ChatMessage::attachments(
                origin.channel.clone(),
                vec![status_attachment(&record, Utc::now(), &self.config)],
            ),
            Err(e) => unknown_instance(origin, instance, &e),
        }
    }

    async fn version(&self, origin: &Origin, instance: &str) -> ChatMessage {
        match self.api.instance_status(instance).await {
            Ok(record) => ChatMessage::attachments(
                origin.channel.clone(),
                vec![version_attachment(&record, &self.config)],
            ),
            Err(e) => unknown_instance(origin, instance, &e),
        }
    }

    async fn alias(&self, origin: &Origin, alias: &str) -> Option<ChatMessage> {
        match self.api.instance_alias(alias).await {
            Ok(found) => Some(ChatMessage::reply(
                origin.channel.clone(),
                origin.user.as_deref(),
                &alias_text(alias, &found),
            )),
            Err(e) => {
                error!(alias = %alias, error = %e, "Alias lookup failed");
                None
            }
        }
    }

    async fn metrics(&self, origin: &Origin) -> Option<ChatMessage> {
        let rows = match self.api.metric_values().await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Metric lookup failed");
                return None;
            }
        };

        let series = aggregate(rows);
        if series.is_empty() {
            info!("No metric values reported");
            return None;
        }

        match metrics_attachments(&series, &self.config) {
            Ok(attachments) => Some(ChatMessage::attachments(
                origin.channel.clone(),
                attachments,
            )),
            Err(e) => {
                error!(error = %e, "Failed to build metric charts");
                None
            }
        }
    }
}

fn unknown_instance(origin: &Origin, instance: &str, e: &TrustError) -> ChatMessage {
    info!(instance = %instance, error = %e, "Instance lookup failed");
    ChatMessage::reply(
        origin.channel.clone(),
        origin.user.as_deref(),
        &format!("Unknown instance \"{instance}\""),
    )
}

/// The key of a resolved record.
fn record_key(record: &InstanceRecord) -> &str {
    record.key.as_deref().unwrap_or_default()
}

/// Status attachment of an instance at `now`.
pub fn status_attachment(
    record: &InstanceRecord,
    now: DateTime<Utc>,
    config: &TrustConfig,
) -> Attachment {
    let key = record_key(record);
    let report = classify(record, now);

    Attachment {
        title: Some(format!("{key} status")),
        title_link: Some(config.instance_link(key)),
        thumb_url: Some(report.image_url()),
        fields: report
            .services
            .map(|services| vec![Field::long("Services", services.join(","))])
            .unwrap_or_default(),
        text: Some(report.text),
        fallback: Some(report.fallback),
        footer: report.footer,
        image_url: None,
    }
}

/// Version attachment of an instance.
pub fn version_attachment(record: &InstanceRecord, config: &TrustConfig) -> Attachment {
    let key = record_key(record);

    Attachment {
        title: Some(format!("{key} version information")),
        title_link: Some(config.instance_link(key)),
        fields: vec![Field::long(
            "Release Version",
            record.release_version.as_deref().unwrap_or("Unknown"),
        )],
        ..Attachment::default()
    }
}

/// Answer to an alias lookup.
pub fn alias_text(alias: &str, found: &InstanceAlias) -> String {
    format!("{alias} runs on {}", found.instance_key)
}

/// One chart attachment per metric series.
pub fn metrics_attachments(
    series: &[MetricSeries],
    config: &TrustConfig,
) -> Result<Vec<Attachment>, TrustError> {
    series
        .iter()
        .map(|s| {
            Ok(Attachment {
                title: Some(s.title.clone().unwrap_or_else(|| s.name.clone())),
                title_link: Some(config.performance_link()),
                image_url: Some(line_chart_url(&config.chart_url, s)?),
                ..Attachment::default()
            })
        })
        .collect()
}
