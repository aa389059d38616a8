//! Trust status API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::TrustConfig;
use crate::error::TrustError;
use crate::models::{InstanceAlias, InstanceRecord, MetricRow};

/// Read access to the status API.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetch the status record of an instance.
    ///
    /// The identifier is uppercased before the lookup, and the returned
    /// record must carry exactly that key.
    async fn instance_status(&self, instance: &str) -> Result<InstanceRecord, TrustError>;

    /// Resolve an alias (e.g. a My Domain name) to the instance it runs on.
    async fn instance_alias(&self, alias: &str) -> Result<InstanceAlias, TrustError>;

    /// Fetch all metric samples.
    async fn metric_values(&self) -> Result<Vec<MetricRow>, TrustError>;
}

/// HTTP client for the public status API.
#[derive(Clone)]
pub struct TrustClient {
    /// HTTP client.
    client: Client,
    /// API base URL without trailing slash.
    base_url: String,
}

impl TrustClient {
    /// Create a new client.
    ///
    /// # Errors
    /// Returns error if HTTP client cannot be created.
    pub fn new(config: &TrustConfig) -> Result<Self, TrustError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a path below the API base and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TrustError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Status API request failed");
            return Err(TrustError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response");
            TrustError::Parse(e)
        })
    }
}

#[async_trait]
impl StatusApi for TrustClient {
    async fn instance_status(&self, instance: &str) -> Result<InstanceRecord, TrustError> {
        let wanted = instance.to_uppercase();
        let record: InstanceRecord = self.get(&format!("/instances/{wanted}/status")).await?;
        check_instance_key(record, &wanted)
    }

    async fn instance_alias(&self, alias: &str) -> Result<InstanceAlias, TrustError> {
        self.get(&format!("/instanceAliases/{alias}")).await
    }

    async fn metric_values(&self) -> Result<Vec<MetricRow>, TrustError> {
        self.get("/metricValues").await
    }
}

/// Accept a record only if its key is exactly the requested identifier.
///
/// # Errors
/// Returns [`TrustError::UnknownInstance`] when the key is absent or differs.
pub fn check_instance_key(record: InstanceRecord, wanted: &str) -> Result<InstanceRecord, TrustError> {
    match record.key.as_deref() {
        Some(key) if key == wanted => Ok(record),
        other => {
            debug!(wanted = %wanted, returned = ?other, "Instance key mismatch");
            Err(TrustError::UnknownInstance(wanted.to_string()))
        }
    }
}
