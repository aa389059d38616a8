//! Error types for chat delivery.

use thiserror::Error;

/// Errors that can occur when delivering chat messages.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Adapter is not configured
    #[error("Adapter not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The chat service rejected the message
    #[error("Chat API error: {0}")]
    Api(String),

    /// Local output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
