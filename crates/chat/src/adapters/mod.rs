//! Chat adapter implementations.

pub mod slack;
pub mod stdout;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::message::ChatMessage;

/// Trait for chat backends (Slack, stdout, ...).
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Get the name of this adapter.
    fn name(&self) -> &'static str;

    /// Deliver a message to the room it is addressed to.
    async fn send(&self, message: &ChatMessage) -> Result<(), ChatError>;
}
