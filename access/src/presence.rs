use errors::StorageError;
use site_core::traits::PresenceLog;
use site_core::types::{PersonId, PresenceState, SiteId};
use std::sync::Arc;

/// Derives IN/OUT from the latest check-in or check-out. "Seen" events never
/// move the state, so a person seen while in stays IN.
pub struct PresenceTracker {
    log: Arc<dyn PresenceLog>
}

impl PresenceTracker {
    pub fn new(log: Arc<dyn PresenceLog>) -> Self {
        Self { log }
    }

    pub async fn state(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<PresenceState, StorageError> {
        let latest = self.log.latest_transition(person_id, site_id).await?;
        Ok(PresenceState::after(latest.as_ref()))
    }
}
