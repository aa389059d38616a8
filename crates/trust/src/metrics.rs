//! Metric windowing for the performance charts.

use serde::Serialize;

use crate::models::MetricRow;

/// Number of most recent samples kept per metric.
pub const WINDOW: usize = 30;

/// Metrics with a known display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownMetric {
    /// Daily transaction count across all instances.
    TransactionCount,
    /// Daily average transaction time across all instances.
    AvgTransactionSpeed,
}

impl KnownMetric {
    /// Look up a metric by its API name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TransactionCount" => Some(Self::TransactionCount),
            "AvgTransactionSpeed" => Some(Self::AvgTransactionSpeed),
            _ => None,
        }
    }

    /// Chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TransactionCount => "Daily Transaction Count",
            Self::AvgTransactionSpeed => "Daily Average Transactions Time",
        }
    }

    /// Divisor applied to raw values.
    #[must_use]
    pub const fn scale(self) -> f64 {
        match self {
            Self::TransactionCount => 1_000_000_000.0,
            Self::AvgTransactionSpeed => 1.0,
        }
    }

    /// Legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TransactionCount => "All Instances (in Billions)",
            Self::AvgTransactionSpeed => "All Instances (in ms)",
        }
    }
}

/// A windowed, scaled series ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    /// API metric name.
    pub name: String,
    /// Chart title, `None` for metrics without a display configuration.
    pub title: Option<String>,
    /// Legend label.
    pub label: String,
    /// Scaled values, oldest first.
    pub values: Vec<f64>,
    /// `YYYY-MM-DD` date of each value.
    pub labels: Vec<String>,
}

/// Group rows by metric, sort each group by time and keep the newest
/// [`WINDOW`] samples.
///
/// Metrics appear in the order their first row appears. Rows with equal
/// timestamps keep their input order. Unknown metrics are not scaled and get
/// no title.
#[must_use]
pub fn aggregate(rows: Vec<MetricRow>) -> Vec<MetricSeries> {
    let mut groups: Vec<(String, Vec<MetricRow>)> = Vec::new();

    for row in rows {
        if let Some(idx) = groups
            .iter()
            .position(|(name, _)| *name == row.metric_value_name)
        {
            groups[idx].1.push(row);
        } else {
            groups.push((row.metric_value_name.clone(), vec![row]));
        }
    }

    groups
        .into_iter()
        .map(|(name, mut group)| {
            // sort_by_key is stable
            group.sort_by_key(|row| row.timestamp);
            let recent = &group[group.len().saturating_sub(WINDOW)..];

            let known = KnownMetric::from_name(&name);
            let scale = known.map_or(1.0, KnownMetric::scale);

            MetricSeries {
                title: known.map(|m| m.title().to_string()),
                label: known.map_or_else(|| name.clone(), |m| m.label().to_string()),
                values: recent.iter().map(|row| row.value / scale).collect(),
                labels: recent
                    .iter()
                    .map(|row| row.timestamp.format("%Y-%m-%d").to_string())
                    .collect(),
                name,
            }
        })
        .collect()
}
