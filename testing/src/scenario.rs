use chrono::{DateTime, Utc};
use site_core::traits::PresenceLog;
use site_core::types::{
    Case, CaseFlag, CaseFlagId, CaseId, CaseStatus, NewPresenceEvent, Organization,
    OrganizationId, PersonId, PresenceEvent, PresenceEventKind, RegistrationStatus,
    ShelterRegistration, Site, SiteId, SiteKind, StaffAssignment, StaffStatus,
};
use storage::InMemoryStore;

/// A two-level organization tree (`root` above `branch`) with a shelter and
/// a facility operated by `branch`, plus one person to evaluate.
///
/// Every helper writes straight into `store`; clones of the store share the
/// same tables.
pub struct SiteScenario {
    pub store: InMemoryStore,
    pub root: Organization,
    pub branch: Organization,
    pub shelter: Site,
    pub facility: Site,
    pub person: PersonId
}

fn organization(name: &str) -> Organization {
    Organization {
        id: OrganizationId::generate(),
        name: name.to_string(),
        parent_id: None,
        root_id: None
    }
}

impl SiteScenario {
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let root = organization("Regional Office");
        let branch = organization("District Branch").under(&root);
        let shelter = Site::new("Reception Centre", SiteKind::Shelter, branch.id);
        let facility = Site::new("Counselling Office", SiteKind::Facility, branch.id);

        store.insert_organization(root.clone()).await;
        store.insert_organization(branch.clone()).await;
        store.insert_site(shelter.clone()).await;
        store.insert_site(facility.clone()).await;

        Self {
            store,
            root,
            branch,
            shelter,
            facility,
            person: PersonId::generate()
        }
    }

    /// Adds a standalone organization (no parent, no root) with its own site.
    pub async fn add_unrelated_site(&self, kind: SiteKind) -> (Organization, Site) {
        let org = organization("Unrelated Agency");
        let site = Site::new("Elsewhere", kind, org.id);
        self.store.insert_organization(org.clone()).await;
        self.store.insert_site(site.clone()).await;
        (org, site)
    }

    pub async fn add_case(&self, organization_id: OrganizationId, status: CaseStatus) -> CaseId {
        self.add_case_created(organization_id, status, Utc::now())
            .await
    }

    pub async fn add_case_created(
        &self,
        organization_id: OrganizationId,
        status: CaseStatus,
        created_at: DateTime<Utc>
    ) -> CaseId {
        let case = Case {
            id: CaseId::generate(),
            person_id: self.person,
            organization_id,
            status,
            created_at,
            last_seen_on: None,
            deleted: false
        };
        let id = case.id;
        self.store.insert_case(case).await;
        id
    }

    /// An open case at the branch.
    pub async fn add_open_case(&self) -> CaseId {
        self.add_case(self.branch.id, CaseStatus::open()).await
    }

    pub async fn add_registration(&self, site_id: SiteId, status: RegistrationStatus) {
        self.store
            .insert_registration(ShelterRegistration::new(self.person, site_id, status))
            .await;
    }

    pub async fn add_staff(&self, organization_id: OrganizationId, status: StaffStatus) {
        self.store
            .insert_staff_assignment(StaffAssignment::new(self.person, organization_id, status))
            .await;
    }

    /// Defines the flag and assigns it to the scenario's person.
    pub async fn add_flag(&self, flag: CaseFlag) -> CaseFlagId {
        let id = flag.id;
        self.store.insert_flag(flag).await;
        self.store.assign_flag(self.person, id).await;
        id
    }

    /// Appends an event straight to the presence log, bypassing any access
    /// check.
    pub async fn log_event(
        &self,
        site_id: SiteId,
        kind: PresenceEventKind,
        occurred_at: DateTime<Utc>
    ) -> Option<PresenceEvent> {
        self.store
            .record(NewPresenceEvent {
                person_id: self.person,
                site_id,
                kind,
                occurred_at
            })
            .await
            .ok()
    }

    pub async fn last_seen(&self, case_id: CaseId) -> Option<DateTime<Utc>> {
        self.store.case(case_id).await.and_then(|c| c.last_seen_on)
    }
}
