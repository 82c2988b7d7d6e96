use crate::engine::AccessEngine;
use crate::error::{AccessError, RegistrationRejected};
use crate::last_seen::{LastSeenOutcome, LastSeenUpdater};
use crate::telemetry::Telemetry;
use chrono::{DateTime, Utc};
use config::AccessConfig;
use serde::Serialize;
use site_core::traits::{PresenceLog, SiteAccessStore};
use site_core::types::{
    NewPresenceEvent, PersonId, PresenceEvent, PresenceEventKind, PresenceState, SiteId,
};
use site_core::{AccessDecision, DenialReason};
use std::sync::Arc;
use tracing::{info, warn};

/// A presence event that passed the access check and was recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredPresence {
    pub event: PresenceEvent,
    /// The decision the event was accepted under; carries the advisories
    /// reception staff should see.
    pub decision: AccessDecision,
    pub last_seen: LastSeenOutcome
}

/// Reception desk workflow: check access, append the event, refresh
/// last-seen.
pub struct PresenceRegistrar {
    engine: Arc<AccessEngine>,
    log: Arc<dyn PresenceLog>,
    last_seen: LastSeenUpdater,
    enforce_direction: bool
}

impl PresenceRegistrar {
    pub fn new(
        engine: Arc<AccessEngine>,
        log: Arc<dyn PresenceLog>,
        last_seen: LastSeenUpdater,
        enforce_direction: bool
    ) -> Self {
        Self {
            engine,
            log,
            last_seen,
            enforce_direction
        }
    }

    pub fn from_store<S: SiteAccessStore + 'static>(store: Arc<S>, config: &AccessConfig) -> Self {
        Self::new(
            Arc::new(AccessEngine::from_store(store.clone(), config)),
            store.clone(),
            LastSeenUpdater::from_store(store),
            config.enforce_direction
        )
    }

    pub async fn status(
        &self,
        site_id: SiteId,
        person_id: PersonId
    ) -> Result<AccessDecision, AccessError> {
        self.engine.evaluate_access(site_id, person_id).await
    }

    pub async fn presence_state(
        &self,
        site_id: SiteId,
        person_id: PersonId
    ) -> Result<PresenceState, AccessError> {
        Ok(self.engine.presence().state(person_id, site_id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn register(
        &self,
        site_id: SiteId,
        person_id: PersonId,
        kind: PresenceEventKind,
        occurred_at: DateTime<Utc>
    ) -> Result<RegisteredPresence, AccessError> {
        let decision = self.engine.evaluate_access(site_id, person_id).await?;

        if let Err(rejected) = self.check(&decision, kind) {
            warn!("Rejected {} of {} at {}: {}", kind, person_id, site_id, rejected);
            Telemetry::record_registration(kind, "rejected");
            return Err(rejected.into());
        }

        let event = self
            .log
            .record(NewPresenceEvent {
                person_id,
                site_id,
                kind,
                occurred_at
            })
            .await?;
        info!("Registered {} of {} at {}", kind, person_id, site_id);
        Telemetry::record_registration(kind, "accepted");

        // the event is already in the log; a last-seen fault must not undo it
        let last_seen = match self
            .last_seen
            .notify_presence_event(site_id, person_id, occurred_at, kind)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Last seen of {} not updated: {}", person_id, e);
                Telemetry::record_last_seen(LastSeenOutcome::Failed);
                LastSeenOutcome::Failed
            }
        };

        Ok(RegisteredPresence {
            event,
            decision,
            last_seen
        })
    }

    fn check(
        &self,
        decision: &AccessDecision,
        kind: PresenceEventKind
    ) -> Result<(), RegistrationRejected> {
        if !decision.valid {
            let reason = decision
                .error
                .unwrap_or(DenialReason::NeitherResidentNorStaff);
            return Err(RegistrationRejected::NotPermitted { reason });
        }
        if self.enforce_direction && !decision.permits(kind) {
            return Err(RegistrationRejected::DirectionDenied { kind });
        }
        Ok(())
    }
}
