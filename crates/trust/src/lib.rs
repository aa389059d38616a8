//! Client and status classification for the public trust status API.
//!
//! This crate talks to the status API of the platform and turns its records
//! into something a chat bot can show:
//!
//! - [`TrustClient`] fetches instance status, alias and metric records
//! - [`classify`] decides the [`StatusCategory`] of an instance
//! - [`aggregate`] windows metric samples into chartable series
//! - [`line_chart_url`] builds the chart image URL of a series
//!
//! ## Example
//!
//! ```ignore
//! use trust::{classify, StatusApi, TrustClient, TrustConfig};
//!
//! let client = TrustClient::new(&TrustConfig::default())?;
//! let record = client.instance_status("na1").await?;
//! let report = classify(&record, chrono::Utc::now());
//! println!("{}: {}", report.category, report.text);
//! ```

pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod humanize;
pub mod metrics;
pub mod models;
pub mod status;

pub use chart::line_chart_url;
pub use client::{check_instance_key, StatusApi, TrustClient};
pub use config::TrustConfig;
pub use error::TrustError;
pub use metrics::{aggregate, KnownMetric, MetricSeries, WINDOW};
pub use models::{
    Incident, IncidentImpact, IncidentMessage, InstanceAlias, InstanceRecord, Maintenance,
    MaintenanceMessage, MetricRow,
};
pub use status::{classify, StatusCategory, StatusReport, NO_INCIDENTS};
