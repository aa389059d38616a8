//! Chat message payloads.
//!
//! The shape follows Slack's legacy message attachments, which is also what
//! most chat adapters accept for rich messages.

use serde::{Deserialize, Serialize};

/// A message addressed to one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Room (channel ID or name) the message goes to.
    pub channel: String,
    /// Plain text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rich attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    /// A message made of attachments only.
    #[must_use]
    pub fn attachments(channel: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            channel: channel.into(),
            text: None,
            attachments,
        }
    }

    /// A plain text message.
    #[must_use]
    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: Some(text.into()),
            attachments: vec![],
        }
    }

    /// A plain text reply to a user, mentioning them when known.
    #[must_use]
    pub fn reply(channel: impl Into<String>, user: Option<&str>, text: &str) -> Self {
        let text = match user {
            Some(user) => format!("<@{user}> {text}"),
            None => text.to_string(),
        };
        Self::text(channel, text)
    }

    /// The same message sent to a different room.
    #[must_use]
    pub fn to_channel(&self, channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..self.clone()
        }
    }
}

/// A rich attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Bold title line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Link behind the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Plain-text summary for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Small print under the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Key/value fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    /// Thumbnail shown on the right.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    /// Full-width image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A key/value field of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub title: String,
    /// Field value.
    pub value: String,
    /// Whether the field may share a line with another.
    pub short: bool,
}

impl Field {
    /// A full-width field.
    #[must_use]
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }
}
