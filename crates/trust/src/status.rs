//! Instance status classification.
//!
//! Only the most recent incident (last in the list) and its first impact are
//! consulted. When there are no incidents, only the first maintenance is. Older
//! concurrent incidents are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::humanize::from_now;
use crate::models::{Incident, IncidentImpact, InstanceRecord, Maintenance};

/// Text shown when nothing is going on.
pub const NO_INCIDENTS: &str = "No incidents reported";

/// Base URL of the status images.
const IMAGE_BASE_URL: &str = "https://trust.salesforce.com/static/images/user_guide";

/// Status category of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    /// Nothing reported.
    Healthy,
    /// Maintenance with the instance unavailable.
    Maintenance,
    /// Active service disruption.
    Disruption,
    /// Active performance degradation.
    Degradation,
    /// Healthy with a disruption on some services.
    #[serde(rename = "Healthy_Disruption")]
    HealthyDisruption,
    /// Healthy with a degradation on some services.
    #[serde(rename = "Healthy_Degradation")]
    HealthyDegradation,
    /// Maintenance with the instance still available.
    #[serde(rename = "Healthy_Maintenance")]
    HealthyMaintenance,
}

impl StatusCategory {
    /// Every category.
    pub const ALL: [Self; 7] = [
        Self::Healthy,
        Self::Maintenance,
        Self::Disruption,
        Self::Degradation,
        Self::HealthyDisruption,
        Self::HealthyDegradation,
        Self::HealthyMaintenance,
    ];

    /// Display name, also used in image file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Maintenance => "Maintenance",
            Self::Disruption => "Disruption",
            Self::Degradation => "Degradation",
            Self::HealthyDisruption => "Healthy_Disruption",
            Self::HealthyDegradation => "Healthy_Degradation",
            Self::HealthyMaintenance => "Healthy_Maintenance",
        }
    }

    /// Image shown next to the status.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("{IMAGE_BASE_URL}/{}@2x.png", self.as_str())
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Category.
    pub category: StatusCategory,
    /// Main text.
    pub text: String,
    /// Plain-text fallback for clients that cannot render attachments.
    pub fallback: String,
    /// "Last updated ..." line, absent when healthy.
    pub footer: Option<String>,
    /// Affected services of an active incident.
    pub services: Option<Vec<String>>,
}

impl StatusReport {
    fn healthy() -> Self {
        Self {
            category: StatusCategory::Healthy,
            text: NO_INCIDENTS.to_string(),
            fallback: NO_INCIDENTS.to_string(),
            footer: None,
            services: None,
        }
    }

    /// Image for the category.
    #[must_use]
    pub fn image_url(&self) -> String {
        self.category.image_url()
    }
}

/// Classify an instance at `now`.
#[must_use]
pub fn classify(record: &InstanceRecord, now: DateTime<Utc>) -> StatusReport {
    let report = if let Some(incident) = record.incidents.last() {
        classify_incident(incident, now)
    } else if let Some(maintenance) = record.maintenances.first() {
        classify_maintenance(maintenance, now)
    } else {
        None
    };

    // A closed window (or an incident without impacts) reads as healthy and
    // drops whatever footer the entry carried.
    report
        .filter(|r| r.category != StatusCategory::Healthy)
        .unwrap_or_else(StatusReport::healthy)
}

fn classify_incident(incident: &Incident, now: DateTime<Utc>) -> Option<StatusReport> {
    let impact = incident.impacts.first()?;
    let end = impact.end_time.unwrap_or(now);

    if end < now {
        return None;
    }

    let category = if impact.impact_type == IncidentImpact::PERFORMANCE_DEGRADATION {
        StatusCategory::Degradation
    } else {
        StatusCategory::Disruption
    };

    let root_cause = incident.message.root_cause.as_deref();
    let text = root_cause.map_or_else(
        || format!("{} {category}", upper_first(&impact.severity)),
        str::to_string,
    );
    let services = (!incident.service_keys.is_empty()).then(|| incident.service_keys.clone());

    Some(StatusReport {
        category,
        fallback: format!("{category} - {text}"),
        text,
        footer: Some(last_updated(incident.updated_at, now)),
        services,
    })
}

fn classify_maintenance(maintenance: &Maintenance, now: DateTime<Utc>) -> Option<StatusReport> {
    if maintenance.planned_start_time > now || maintenance.planned_end_time < now {
        return None;
    }

    let category = if maintenance.message.is_unavailable() {
        StatusCategory::Maintenance
    } else {
        StatusCategory::HealthyMaintenance
    };

    Some(StatusReport {
        category,
        text: maintenance.name.clone(),
        fallback: format!("{category} - {}", maintenance.name),
        footer: Some(last_updated(maintenance.updated_at, now)),
        services: None,
    })
}

fn last_updated(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("Last updated {}", from_now(updated_at, now))
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
