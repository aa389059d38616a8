//! Chat command parsing.

use regex::Regex;
use std::sync::LazyLock;

/// Recognized commands, case-insensitive, with an optional leading mention
/// of the bot (`<@U123> status na1`).
static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        (?:<@[A-Z0-9]+>[:,]?\s*)?
        (?:
            status\s+(?P<status>[A-Za-z0-9]+)
          | version\s+(?P<version>[A-Za-z0-9]+)
          | alias\s+(?P<alias>[A-Za-z0-9.\-]+)
          | (?P<metrics>metrics)
        )
        \s*$",
    )
    .expect("command pattern is valid")
});

/// Usage hint for unrecognized input.
pub const USAGE: &str =
    "Try `status <instance>`, `version <instance>`, `alias <name>` or `metrics`";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Current status of an instance.
    Status(String),
    /// Release version of an instance.
    Version(String),
    /// Instance an alias runs on.
    Alias(String),
    /// Performance charts.
    Metrics,
}

impl Command {
    /// Parse a chat message. Returns `None` for anything that is not a
    /// command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = COMMAND_PATTERN.captures(text)?;

        if let Some(m) = caps.name("status") {
            Some(Self::Status(m.as_str().to_string()))
        } else if let Some(m) = caps.name("version") {
            Some(Self::Version(m.as_str().to_string()))
        } else if let Some(m) = caps.name("alias") {
            Some(Self::Alias(m.as_str().to_string()))
        } else {
            caps.name("metrics").map(|_| Self::Metrics)
        }
    }

    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Version(_) => "version",
            Self::Alias(_) => "alias",
            Self::Metrics => "metrics",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("status na1", Command::Status("na1".to_string())),
            ("STATUS NA1", Command::Status("NA1".to_string())),
            ("version eu12", Command::Version("eu12".to_string())),
            ("alias foo.bar", Command::Alias("foo.bar".to_string())),
            ("alias my-domain.example", Command::Alias("my-domain.example".to_string())),
            ("metrics", Command::Metrics),
            ("  Metrics  ", Command::Metrics),
            ("<@U024BE7LH> status cs42", Command::Status("cs42".to_string())),
            ("<@U024BE7LH>: metrics", Command::Metrics),
        ];

        for (text, expected) in cases {
            assert_eq!(Command::parse(text), Some(expected), "Failed for: {text}");
        }
    }

    #[test]
    fn test_reject_non_commands() {
        for text in [
            "",
            "status",
            "status na1 now",
            "status na-1",
            "version foo.bar",
            "alias foo/bar",
            "metrics please",
            "what is the status of na1",
        ] {
            assert_eq!(Command::parse(text), None, "Should reject: {text}");
        }
    }
}
