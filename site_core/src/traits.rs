//! Data sources the access engine reads from, and the one sink it writes to.
//!
//! Every method reports absence as an empty result; `Err` is reserved for
//! backend faults.

use crate::types::{
    Case, CaseFlag, NewPresenceEvent, Organization, OrganizationId, PersonId, PresenceEvent,
    ShelterRegistration, Site, SiteId, StaffAssignment,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use errors::StorageError;

/// Sites and the organization tree.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn site(&self, site_id: SiteId) -> Result<Option<Site>, StorageError>;

    async fn organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Option<Organization>, StorageError>;
}

#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Non-deleted cases of the person at any of `organizations`.
    async fn cases_for_person(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId],
    ) -> Result<Vec<Case>, StorageError>;

    /// Whether the person has any non-deleted case at all, regardless of
    /// organization or status.
    async fn has_case(&self, person_id: PersonId) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait ShelterRegistry: Send + Sync {
    /// Every registration of the person at the shelter, deleted ones included.
    async fn registrations(
        &self,
        person_id: PersonId,
        site_id: SiteId,
    ) -> Result<Vec<ShelterRegistration>, StorageError>;
}

#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn assignments(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId],
    ) -> Result<Vec<StaffAssignment>, StorageError>;
}

#[async_trait]
pub trait FlagRepository: Send + Sync {
    /// Non-deleted flags linked to the person through non-deleted
    /// assignments, in flag definition order.
    async fn flags_for_person(&self, person_id: PersonId) -> Result<Vec<CaseFlag>, StorageError>;
}

/// Append-only log of check-in, check-out and "seen" events.
#[async_trait]
pub trait PresenceLog: Send + Sync {
    /// The most recent non-deleted check-in or check-out of the person at the
    /// site. Equal timestamps are ordered by `sequence`.
    async fn latest_transition(
        &self,
        person_id: PersonId,
        site_id: SiteId,
    ) -> Result<Option<PresenceEvent>, StorageError>;

    async fn record(&self, event: NewPresenceEvent) -> Result<PresenceEvent, StorageError>;
}

/// The case subsystem's "update last seen" operation.
///
/// Implementations must only move the stored value forward, so that
/// reordered or repeated calls converge on the latest event time.
#[async_trait]
pub trait LastSeenSink: Send + Sync {
    async fn update_last_seen(
        &self,
        person_id: PersonId,
        seen_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// A backend providing every data source the engine needs.
pub trait SiteAccessStore:
    OrganizationDirectory
    + CaseRepository
    + ShelterRegistry
    + StaffDirectory
    + FlagRepository
    + PresenceLog
    + LastSeenSink
{
}

impl<T> SiteAccessStore for T where
    T: OrganizationDirectory
        + CaseRepository
        + ShelterRegistry
        + StaffDirectory
        + FlagRepository
        + PresenceLog
        + LastSeenSink
{
}
