//! Configuration for the trust bot service.

use std::env;
use std::time::Duration;

use trust::TrustConfig;

/// Default HTTP port of the slash command server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default poll interval of the status watcher.
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 300;

/// Maximum age of a signed Slack request (5 minutes).
pub const DEFAULT_MAX_REQUEST_AGE_SECS: i64 = 300;

/// Trust bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// HTTP server port.
    pub port: u16,
    /// Slack signing secret. Requests are not verified when unset.
    pub signing_secret: Option<String>,
    /// Maximum age of a signed request in seconds.
    pub max_request_age_secs: i64,
    /// Instances the watcher polls.
    pub watch_instances: Vec<String>,
    /// Seconds between watcher polls.
    pub watch_interval_secs: u64,
    /// Status API settings.
    pub trust: TrustConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            port: env::var("TRUST_BOT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            signing_secret: env::var("SLACK_SIGNING_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            max_request_age_secs: DEFAULT_MAX_REQUEST_AGE_SECS,
            watch_instances: env::var("TRUST_WATCH_INSTANCES")
                .map(|s| parse_instances(&s))
                .unwrap_or_default(),
            watch_interval_secs: env::var("TRUST_WATCH_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_WATCH_INTERVAL_SECS),
            trust: TrustConfig::default(),
        }
    }
}

impl BotConfig {
    /// Poll interval of the watcher.
    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs)
    }
}

/// Split a comma separated instance list, dropping blanks and
/// normalizing to upper case.
pub fn parse_instances(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instances() {
        assert_eq!(
            parse_instances("na1, eu2,,CS42 "),
            vec!["NA1".to_string(), "EU2".to_string(), "CS42".to_string()]
        );
        assert!(parse_instances(" , ").is_empty());
    }

    #[test]
    fn test_watch_interval() {
        let config = BotConfig {
            watch_interval_secs: 60,
            ..BotConfig::default()
        };
        assert_eq!(config.watch_interval(), Duration::from_secs(60));
    }
}
