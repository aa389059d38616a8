//! Error types for the trust status API.

use thiserror::Error;

/// Errors that can occur while talking to the trust status API.
#[derive(Debug, Error)]
pub enum TrustError {
    /// Transport failure (connect, TLS, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with something other than 200.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// The body was not valid JSON or did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The returned record does not belong to the requested instance.
    #[error("Unknown instance: {0}")]
    UnknownInstance(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
