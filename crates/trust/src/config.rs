//! Configuration for the trust status API client.

use std::env;

/// Default base URL of the public status API.
pub const DEFAULT_API_URL: &str = "https://api.status.salesforce.com/v1";

/// Default base URL of the human-facing status site.
pub const DEFAULT_SITE_URL: &str = "https://status.salesforce.com";

/// Default chart rendering service.
pub const DEFAULT_CHART_URL: &str = "https://chart.googleapis.com/chart";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trust client configuration.
#[derive(Debug, Clone)]
pub struct TrustConfig {
    /// Base URL for the status API (without trailing slash).
    pub api_url: String,
    /// Base URL for links shown to users.
    pub site_url: String,
    /// Base URL of the chart image service.
    pub chart_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            api_url: env::var("TRUST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            site_url: env::var("TRUST_SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            chart_url: env::var("TRUST_CHART_URL")
                .unwrap_or_else(|_| DEFAULT_CHART_URL.to_string()),
            timeout_secs: env::var("TRUST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TrustConfig {
    /// Configuration pointing at a specific API base URL, other values default.
    #[must_use]
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            site_url: DEFAULT_SITE_URL.to_string(),
            chart_url: DEFAULT_CHART_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Link to the status page of an instance.
    #[must_use]
    pub fn instance_link(&self, key: &str) -> String {
        format!("{}/status/{key}", self.site_url.trim_end_matches('/'))
    }

    /// Link to the performance page.
    #[must_use]
    pub fn performance_link(&self) -> String {
        format!("{}/performance", self.site_url.trim_end_matches('/'))
    }
}
