//! Trust bot - answers instance status questions in chat.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chat::{Announcer, SlackAdapter, StdoutAdapter};
use trust::{StatusApi, TrustClient};
use trust_bot::{
    config::parse_instances, run_server, AppState, BotConfig, Command, CommandHandler, Origin,
    StatusWatcher, USAGE,
};

/// Trust bot - instance status, versions, aliases and performance charts.
#[derive(Parser)]
#[command(name = "trust-bot")]
#[command(about = "Answer trust status questions in chat", version)]
struct Cli {
    /// Status API base URL (or set `TRUST_API_URL` env var).
    #[arg(long, env = "TRUST_API_URL")]
    api_url: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve Slack slash commands.
    Serve {
        /// HTTP port (or set `TRUST_BOT_PORT` env var).
        #[arg(long, env = "TRUST_BOT_PORT")]
        port: Option<u16>,
    },

    /// Run one command and print the chat payload.
    Ask {
        /// Command text, e.g. `status na1`.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Pretty-print the payload.
        #[arg(long)]
        pretty: bool,
    },

    /// Poll instances and announce status changes.
    Watch {
        /// Instances to poll (or set `TRUST_WATCH_INSTANCES` env var).
        #[arg(long, env = "TRUST_WATCH_INSTANCES")]
        instances: Option<String>,

        /// Seconds between polls (or set `TRUST_WATCH_INTERVAL_SECS` env var).
        #[arg(long, env = "TRUST_WATCH_INTERVAL_SECS")]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let mut config = BotConfig::default();
    if let Some(api_url) = cli.api_url {
        config.trust.api_url = api_url;
    }

    let api: Arc<dyn StatusApi> = Arc::new(
        TrustClient::new(&config.trust).context("Failed to create status API client")?,
    );
    let handler = CommandHandler::new(api.clone(), config.trust.clone());

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }

            let slack = Arc::new(SlackAdapter::from_env());
            if !slack.enabled() {
                warn!("SLACK_BOT_TOKEN not set, answers cannot be posted");
            }

            if config.watch_instances.is_empty() {
                info!("No instances to watch");
            } else {
                let watcher = StatusWatcher::new(
                    api,
                    Announcer::from_env(slack.clone()),
                    config.trust.clone(),
                    config.watch_instances.clone(),
                );
                tokio::spawn(watcher.run(config.watch_interval()));
            }

            let state = AppState {
                handler,
                adapter: slack,
                signing_secret: config.signing_secret.clone(),
                max_request_age_secs: config.max_request_age_secs,
            };
            run_server(state, config.port)
                .await
                .context("Slash command server failed")?;
        }

        Commands::Ask { text, pretty } => {
            let text = text.join(" ");
            let Some(command) = Command::parse(&text) else {
                bail!("Unrecognized command \"{text}\". {USAGE}");
            };

            let adapter = StdoutAdapter::new(pretty);
            handler
                .dispatch(&adapter, &Origin::new("cli", None), &command)
                .await
                .context("Failed to print answer")?;
        }

        Commands::Watch {
            instances,
            interval,
        } => {
            if let Some(instances) = instances {
                config.watch_instances = parse_instances(&instances);
            }
            if let Some(interval) = interval.filter(|secs| *secs > 0) {
                config.watch_interval_secs = interval;
            }
            if config.watch_instances.is_empty() {
                bail!("No instances to watch, set TRUST_WATCH_INSTANCES or --instances");
            }

            let announcer = Announcer::from_env(Arc::new(SlackAdapter::from_env()));
            if !announcer.has_channels() {
                bail!("No announce channels, set TRUST_CHANNELS");
            }

            StatusWatcher::new(api, announcer, config.trust.clone(), config.watch_instances)
                .run(Duration::from_secs(config.watch_interval_secs))
                .await;
        }
    }

    Ok(())
}
