//! Chat bot answering questions about instance health from the public
//! trust status API.
//!
//! This crate provides:
//! - Chat command parsing (`status`, `version`, `alias`, `metrics`)
//! - Command handlers producing chat attachments
//! - HTTP server for Slack slash commands with request signature verification
//! - A watcher announcing status changes to configured channels

pub mod command;
pub mod config;
pub mod handlers;
pub mod server;
pub mod signature;
pub mod watch;

pub use command::{Command, USAGE};
pub use config::BotConfig;
pub use handlers::{CommandHandler, Origin};
pub use server::{build_router, run_server, AppState};
pub use signature::verify_signature;
pub use watch::StatusWatcher;
