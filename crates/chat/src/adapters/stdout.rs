//! Adapter printing messages as JSON on stdout.
//!
//! Used by the one-shot CLI to show exactly what would be posted.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::ChatAdapter;
use crate::error::ChatError;
use crate::message::ChatMessage;

/// Writes each message as one JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutAdapter {
    pretty: bool,
}

impl StdoutAdapter {
    /// Create an adapter; `pretty` indents the JSON.
    #[must_use]
    pub const fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, message: &ChatMessage) -> Result<String, ChatError> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(message)?
        } else {
            serde_json::to_string(message)?
        };
        out.push('\n');
        Ok(out)
    }
}

#[async_trait]
impl ChatAdapter for StdoutAdapter {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), ChatError> {
        let out = self.render(message)?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}
