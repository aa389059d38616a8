//! Status watcher.
//!
//! Polls a fixed set of instances and announces the status attachment of an
//! instance to every configured channel whenever its category changes. The
//! first observation of an instance is announced only when it is not
//! healthy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chat::{Announcer, ChatMessage};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use trust::{classify, StatusApi, StatusCategory, TrustConfig};

use crate::handlers::status_attachment;

/// Watches instance status and announces changes.
pub struct StatusWatcher {
    api: Arc<dyn StatusApi>,
    announcer: Announcer,
    config: TrustConfig,
    instances: Vec<String>,
    last_seen: HashMap<String, StatusCategory>,
}

impl StatusWatcher {
    /// Create a watcher for `instances`.
    pub fn new(
        api: Arc<dyn StatusApi>,
        announcer: Announcer,
        config: TrustConfig,
        instances: Vec<String>,
    ) -> Self {
        Self {
            api,
            announcer,
            config,
            instances,
            last_seen: HashMap::new(),
        }
    }

    /// Last category seen for an instance.
    pub fn last_seen(&self, instance: &str) -> Option<StatusCategory> {
        self.last_seen.get(instance).copied()
    }

    /// Poll every instance once. Returns the instances that were announced.
    ///
    /// Instances that fail to resolve are skipped and keep their previous
    /// category.
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut announced = Vec::new();

        for instance in &self.instances {
            let record = match self.api.instance_status(instance).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(instance = %instance, error = %e, "Status poll failed");
                    continue;
                }
            };

            let category = classify(&record, now).category;
            let previous = self.last_seen.insert(instance.clone(), category);

            let changed = match previous {
                Some(previous) => previous != category,
                None => category != StatusCategory::Healthy,
            };
            if !changed {
                debug!(instance = %instance, category = %category, "Status unchanged");
                continue;
            }

            info!(
                instance = %instance,
                previous = ?previous,
                category = %category,
                "Status changed"
            );
            let message = ChatMessage::attachments(
                "",
                vec![status_attachment(&record, now, &self.config)],
            );
            self.announcer.announce(&message).await;
            announced.push(instance.clone());
        }

        announced
    }

    /// Poll forever at `interval`.
    pub async fn run(mut self, interval: Duration) {
        if !self.announcer.has_channels() {
            warn!("Watcher has no channels to announce to");
        }
        info!(
            instances = ?self.instances,
            interval_secs = interval.as_secs(),
            "Starting status watcher"
        );

        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let announced = self.poll_once(Utc::now()).await;
            debug!(announced = announced.len(), "Poll complete");
        }
    }
}
