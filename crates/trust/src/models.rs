//! Status API models.
//!
//! Field names follow the camelCase (and occasionally PascalCase) JSON of the
//! public status API. Only the fields the bot reads are modelled; everything
//! else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Instance status
// ============================================================================

/// Status record of a single instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance identifier, e.g. `NA1`.
    #[serde(default)]
    pub key: Option<String>,
    /// Current release version.
    #[serde(rename = "releaseVersion", default)]
    pub release_version: Option<String>,
    /// Incidents affecting the instance, oldest first.
    #[serde(rename = "Incidents", default)]
    pub incidents: Vec<Incident>,
    /// Scheduled maintenances for the instance.
    #[serde(rename = "Maintenances", default)]
    pub maintenances: Vec<Maintenance>,
}

/// A reported service incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Impact windows of the incident.
    #[serde(rename = "IncidentImpacts", default)]
    pub impacts: Vec<IncidentImpact>,
    /// Incident message.
    #[serde(default)]
    pub message: IncidentMessage,
    /// Affected services.
    #[serde(default)]
    pub service_keys: Vec<String>,
    /// Last update of the incident.
    pub updated_at: DateTime<Utc>,
}

/// A time-bounded effect of an incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentImpact {
    /// Impact type, e.g. `performanceDegradation` or `serviceDisruption`.
    #[serde(rename = "type")]
    pub impact_type: String,
    /// Severity, e.g. `minor` or `major`.
    #[serde(default)]
    pub severity: String,
    /// Start of the impact.
    pub start_time: DateTime<Utc>,
    /// End of the impact, `None` while it is still ongoing.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl IncidentImpact {
    /// Impact type reported for performance problems.
    pub const PERFORMANCE_DEGRADATION: &'static str = "performanceDegradation";
}

/// Incident message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentMessage {
    /// Root cause, once known.
    #[serde(default)]
    pub root_cause: Option<String>,
}

/// A scheduled maintenance window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Planned start.
    pub planned_start_time: DateTime<Utc>,
    /// Planned end.
    pub planned_end_time: DateTime<Utc>,
    /// Maintenance message.
    #[serde(default)]
    pub message: MaintenanceMessage,
    /// Last update of the maintenance.
    pub updated_at: DateTime<Utc>,
}

/// Maintenance message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceMessage {
    /// `unavailable` when the instance is down during the window.
    #[serde(default)]
    pub availability: Option<String>,
}

impl MaintenanceMessage {
    /// Availability value for maintenances that take the instance down.
    pub const UNAVAILABLE: &'static str = "unavailable";

    /// Whether the instance is unavailable during the maintenance.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.availability.as_deref() == Some(Self::UNAVAILABLE)
    }
}

// ============================================================================
// Aliases and metrics
// ============================================================================

/// Alias lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceAlias {
    /// Instance the alias runs on.
    pub instance_key: String,
}

/// One timestamped sample of a named metric across all instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    /// Metric name, e.g. `TransactionCount`.
    pub metric_value_name: String,
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Raw value.
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_instance_record() {
        let record: InstanceRecord = serde_json::from_value(json!({
            "key": "NA1",
            "location": "NA",
            "releaseVersion": "Spring '24 Patch 12.3",
            "Incidents": [{
                "id": 1234,
                "IncidentImpacts": [{
                    "type": "serviceDisruption",
                    "severity": "major",
                    "startTime": "2024-03-01T05:00:00.000Z",
                    "endTime": null
                }],
                "message": { "rootCause": null, "pathToResolution": "Rollback" },
                "serviceKeys": ["coreService"],
                "updatedAt": "2024-03-01T05:30:00.000Z"
            }],
            "Maintenances": []
        }))
        .unwrap();

        assert_eq!(record.key.as_deref(), Some("NA1"));
        assert_eq!(record.incidents.len(), 1);
        let incident = &record.incidents[0];
        assert_eq!(incident.impacts[0].impact_type, "serviceDisruption");
        assert!(incident.impacts[0].end_time.is_none());
        assert!(incident.message.root_cause.is_none());
        assert_eq!(incident.service_keys, vec!["coreService"]);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let record: InstanceRecord = serde_json::from_value(json!({ "key": "EU2" })).unwrap();
        assert!(record.incidents.is_empty());
        assert!(record.maintenances.is_empty());
        assert!(record.release_version.is_none());
    }

    #[test]
    fn test_maintenance_availability() {
        let maint: Maintenance = serde_json::from_value(json!({
            "name": "Major release",
            "plannedStartTime": "2024-03-01T05:00:00.000Z",
            "plannedEndTime": "2024-03-01T09:00:00.000Z",
            "message": { "availability": "unavailable" },
            "updatedAt": "2024-02-20T00:00:00.000Z"
        }))
        .unwrap();
        assert!(maint.message.is_unavailable());

        let maint: Maintenance = serde_json::from_value(json!({
            "name": "Patch",
            "plannedStartTime": "2024-03-01T05:00:00.000Z",
            "plannedEndTime": "2024-03-01T09:00:00.000Z",
            "message": { "availability": "available" },
            "updatedAt": "2024-02-20T00:00:00.000Z"
        }))
        .unwrap();
        assert!(!maint.message.is_unavailable());
    }
}
