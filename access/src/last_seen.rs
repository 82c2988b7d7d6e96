use crate::error::AccessError;
use crate::telemetry::Telemetry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use site_core::traits::{CaseRepository, LastSeenSink, SiteAccessStore};
use site_core::types::{PersonId, PresenceEventKind, SiteId};
use std::sync::Arc;
use strum::Display;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LastSeenOutcome {
    Updated,
    /// The person has no case file, so there is nothing to refresh.
    NoCase,
    /// The case subsystem could not be updated. The presence event itself
    /// still stands.
    Failed
}

/// Refreshes the case file's last-seen time after an accepted presence event.
pub struct LastSeenUpdater {
    cases: Arc<dyn CaseRepository>,
    sink: Arc<dyn LastSeenSink>
}

impl LastSeenUpdater {
    pub fn new(cases: Arc<dyn CaseRepository>, sink: Arc<dyn LastSeenSink>) -> Self {
        Self { cases, sink }
    }

    pub fn from_store<S: SiteAccessStore + 'static>(store: Arc<S>) -> Self {
        Self::new(store.clone(), store)
    }

    /// Any non-deleted case counts, whatever its organization or status.
    /// The sink keeps the later of the stored and the supplied time, so
    /// repeated or reordered calls converge.
    #[tracing::instrument(skip(self))]
    pub async fn notify_presence_event(
        &self,
        site_id: SiteId,
        person_id: PersonId,
        event_time: DateTime<Utc>,
        kind: PresenceEventKind
    ) -> Result<LastSeenOutcome, AccessError> {
        let outcome = if self.cases.has_case(person_id).await? {
            self.sink.update_last_seen(person_id, event_time).await?;
            info!("Updated last seen of {} to {}", person_id, event_time);
            LastSeenOutcome::Updated
        } else {
            LastSeenOutcome::NoCase
        };
        Telemetry::record_last_seen(outcome);
        Ok(outcome)
    }
}
