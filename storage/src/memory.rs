//! In-memory implementation of every site access data source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use errors::StorageError;
use site_core::traits::{
    CaseRepository, FlagRepository, LastSeenSink, OrganizationDirectory, PresenceLog,
    ShelterRegistry, StaffDirectory,
};
use site_core::types::{
    Case, CaseFlag, CaseFlagAssignment, CaseFlagId, CaseId, NewPresenceEvent, Organization,
    OrganizationId, PersonId, PresenceEvent, ShelterRegistration, Site, SiteId, StaffAssignment,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    organizations: HashMap<OrganizationId, Organization>,
    sites: HashMap<SiteId, Site>,
    cases: Vec<Case>,
    registrations: Vec<ShelterRegistration>,
    // definition order
    flags: Vec<CaseFlag>,
    flag_assignments: Vec<CaseFlagAssignment>,
    staff: Vec<StaffAssignment>,
    events: Vec<PresenceEvent>,
    next_sequence: i64
}

/// Process-local store. Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_organization(&self, organization: Organization) {
        self.tables
            .write()
            .await
            .organizations
            .insert(organization.id, organization);
    }

    pub async fn insert_site(&self, site: Site) {
        self.tables.write().await.sites.insert(site.id, site);
    }

    pub async fn insert_case(&self, case: Case) {
        self.tables.write().await.cases.push(case);
    }

    pub async fn insert_registration(&self, registration: ShelterRegistration) {
        self.tables.write().await.registrations.push(registration);
    }

    pub async fn insert_flag(&self, flag: CaseFlag) {
        self.tables.write().await.flags.push(flag);
    }

    pub async fn assign_flag(&self, person_id: PersonId, flag_id: CaseFlagId) -> Uuid {
        let assignment = CaseFlagAssignment::new(person_id, flag_id);
        let id = assignment.id;
        self.tables.write().await.flag_assignments.push(assignment);
        id
    }

    pub async fn insert_flag_assignment(&self, assignment: CaseFlagAssignment) {
        self.tables.write().await.flag_assignments.push(assignment);
    }

    pub async fn insert_staff_assignment(&self, assignment: StaffAssignment) {
        self.tables.write().await.staff.push(assignment);
    }

    /// Soft-deletes a presence event. Returns false if no such event exists.
    pub async fn delete_event(&self, event_id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        match tables.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.deleted = true;
                true
            }
            None => false
        }
    }

    pub async fn case(&self, case_id: CaseId) -> Option<Case> {
        self.tables
            .read()
            .await
            .cases
            .iter()
            .find(|c| c.id == case_id)
            .cloned()
    }

    pub async fn events(&self, person_id: PersonId, site_id: SiteId) -> Vec<PresenceEvent> {
        self.tables
            .read()
            .await
            .events
            .iter()
            .filter(|e| e.person_id == person_id && e.site_id == site_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryStore {
    async fn site(&self, site_id: SiteId) -> Result<Option<Site>, StorageError> {
        Ok(self.tables.read().await.sites.get(&site_id).cloned())
    }

    async fn organization(
        &self,
        organization_id: OrganizationId
    ) -> Result<Option<Organization>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .organizations
            .get(&organization_id)
            .cloned())
    }
}

#[async_trait]
impl CaseRepository for InMemoryStore {
    async fn cases_for_person(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<Case>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .cases
            .iter()
            .filter(|c| {
                c.person_id == person_id
                    && !c.deleted
                    && organizations.contains(&c.organization_id)
            })
            .cloned()
            .collect())
    }

    async fn has_case(&self, person_id: PersonId) -> Result<bool, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .cases
            .iter()
            .any(|c| c.person_id == person_id && !c.deleted))
    }
}

#[async_trait]
impl ShelterRegistry for InMemoryStore {
    async fn registrations(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Vec<ShelterRegistration>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .registrations
            .iter()
            .filter(|r| r.person_id == person_id && r.site_id == site_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StaffDirectory for InMemoryStore {
    async fn assignments(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<StaffAssignment>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .staff
            .iter()
            .filter(|s| s.person_id == person_id && organizations.contains(&s.organization_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FlagRepository for InMemoryStore {
    async fn flags_for_person(&self, person_id: PersonId) -> Result<Vec<CaseFlag>, StorageError> {
        let tables = self.tables.read().await;
        let assigned: HashSet<CaseFlagId> = tables
            .flag_assignments
            .iter()
            .filter(|a| a.person_id == person_id && !a.deleted)
            .map(|a| a.flag_id)
            .collect();

        Ok(tables
            .flags
            .iter()
            .filter(|f| !f.deleted && assigned.contains(&f.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PresenceLog for InMemoryStore {
    async fn latest_transition(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Option<PresenceEvent>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .events
            .iter()
            .filter(|e| {
                e.person_id == person_id && e.site_id == site_id && !e.deleted && e.is_transition()
            })
            .max_by_key(|e| (e.occurred_at, e.sequence))
            .cloned())
    }

    async fn record(&self, event: NewPresenceEvent) -> Result<PresenceEvent, StorageError> {
        let mut tables = self.tables.write().await;
        tables.next_sequence += 1;
        let recorded = PresenceEvent {
            id: Uuid::new_v4(),
            sequence: tables.next_sequence,
            person_id: event.person_id,
            site_id: event.site_id,
            kind: event.kind,
            occurred_at: event.occurred_at,
            deleted: false
        };
        tables.events.push(recorded.clone());
        Ok(recorded)
    }
}

#[async_trait]
impl LastSeenSink for InMemoryStore {
    async fn update_last_seen(
        &self,
        person_id: PersonId,
        seen_at: DateTime<Utc>
    ) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        for case in tables
            .cases
            .iter_mut()
            .filter(|c| c.person_id == person_id && !c.deleted)
        {
            case.last_seen_on = Some(case.last_seen_on.map_or(seen_at, |prev| prev.max(seen_at)));
        }
        Ok(())
    }
}
