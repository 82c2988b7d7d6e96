use async_trait::async_trait;
use chrono::{DateTime, Utc};
use config::DatabaseConfig;
use errors::StorageError;
use site_core::traits::{
    CaseRepository, FlagRepository, LastSeenSink, OrganizationDirectory, PresenceLog,
    ShelterRegistry, StaffDirectory,
};
use site_core::types::{
    Case, CaseFlag, CaseFlagAssignment, CaseFlagId, CaseId, CaseStatus, NewPresenceEvent,
    Organization, OrganizationId, PersonId, PresenceEvent, PresenceEventKind, RegistrationStatus,
    ShelterRegistration, Site, SiteId, SiteKind, StaffAssignment, StaffStatus,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const BACKEND: &str = "postgres";

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid {entity} row: {reason}")]
    Decode { entity: &'static str, reason: String }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Database(sqlx::Error::PoolTimedOut) => StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                reason: "pool timed out".to_string()
            },
            PostgresError::Database(e) => StorageError::query(BACKEND, e.to_string()),
            PostgresError::Decode { entity, reason } => {
                StorageError::decode(BACKEND, entity, reason)
            }
        }
    }
}

fn decode_err(entity: &'static str, reason: impl ToString) -> PostgresError {
    PostgresError::Decode {
        entity,
        reason: reason.to_string()
    }
}

pub struct PostgresBackend {
    pool: Pool<Postgres>
}

impl PostgresBackend {
    pub async fn new(connection_url: &str) -> Result<Self, PostgresError> {
        let pool = Pool::connect(connection_url).await?;
        Ok(Self { pool })
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.timeout_seconds))
            .connect(&config.connection_url())
            .await?;
        Ok(Self { pool })
    }

    pub async fn initialize_schema(&self) -> Result<(), PostgresError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS organizations (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id UUID REFERENCES organizations(id),
                root_id UUID
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sites (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL, -- 'shelter', 'facility'
                organization_id UUID REFERENCES organizations(id)
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS case_statuses (
                code TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                is_closed BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cases (
                id UUID PRIMARY KEY,
                person_id UUID NOT NULL,
                organization_id UUID NOT NULL REFERENCES organizations(id),
                status_code TEXT NOT NULL REFERENCES case_statuses(code),
                created_at TIMESTAMPTZ NOT NULL,
                last_seen_on TIMESTAMPTZ,
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cases_person_id ON cases(person_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS shelter_registrations (
                id UUID PRIMARY KEY,
                person_id UUID NOT NULL,
                site_id UUID NOT NULL REFERENCES sites(id),
                status SMALLINT NOT NULL, -- 1 pending, 2 checked-in, 3 checked-out
                deleted BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at TIMESTAMPTZ NOT NULL
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS case_flags (
                id UUID PRIMARY KEY,
                position BIGSERIAL,
                organization_id UUID REFERENCES organizations(id),
                name TEXT NOT NULL,
                deny_check_in BOOLEAN NOT NULL DEFAULT FALSE,
                deny_check_out BOOLEAN NOT NULL DEFAULT FALSE,
                advise_at_check_in BOOLEAN NOT NULL DEFAULT FALSE,
                advise_at_check_out BOOLEAN NOT NULL DEFAULT FALSE,
                advise_at_id_check BOOLEAN NOT NULL DEFAULT FALSE,
                instructions TEXT,
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS case_flag_assignments (
                id UUID PRIMARY KEY,
                person_id UUID NOT NULL,
                flag_id UUID NOT NULL REFERENCES case_flags(id),
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS staff_assignments (
                id UUID PRIMARY KEY,
                person_id UUID NOT NULL,
                organization_id UUID NOT NULL REFERENCES organizations(id),
                status TEXT NOT NULL, -- 'active', 'inactive'
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS presence_events (
                sequence BIGSERIAL PRIMARY KEY,
                id UUID NOT NULL UNIQUE,
                person_id UUID NOT NULL,
                site_id UUID NOT NULL REFERENCES sites(id),
                kind TEXT NOT NULL, -- 'check_in', 'check_out', 'seen'
                occurred_at TIMESTAMPTZ NOT NULL,
                deleted BOOLEAN NOT NULL DEFAULT FALSE
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_presence_events_pair
             ON presence_events(person_id, site_id, occurred_at DESC)"
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create_organization(&self, org: &Organization) -> Result<(), PostgresError> {
        sqlx::query("INSERT INTO organizations (id, name, parent_id, root_id) VALUES ($1, $2, $3, $4)")
            .bind(org.id.into_inner())
            .bind(&org.name)
            .bind(org.parent_id.map(OrganizationId::into_inner))
            .bind(org.root_id.map(OrganizationId::into_inner))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_site(&self, site: &Site) -> Result<(), PostgresError> {
        sqlx::query("INSERT INTO sites (id, name, kind, organization_id) VALUES ($1, $2, $3, $4)")
            .bind(site.id.into_inner())
            .bind(&site.name)
            .bind(site.kind.to_string())
            .bind(site.organization_id.map(OrganizationId::into_inner))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn upsert_case_status(&self, status: &CaseStatus) -> Result<(), PostgresError> {
        sqlx::query(
            "INSERT INTO case_statuses (code, name, is_closed) VALUES ($1, $2, $3)
             ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name, is_closed = EXCLUDED.is_closed"
        )
        .bind(&status.code)
        .bind(&status.name)
        .bind(status.is_closed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts the case, registering its status first if it is new.
    pub async fn create_case(&self, case: &Case) -> Result<(), PostgresError> {
        self.upsert_case_status(&case.status).await?;
        sqlx::query(
            "INSERT INTO cases (id, person_id, organization_id, status_code, created_at, \
             last_seen_on, deleted)
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
        .bind(case.id.into_inner())
        .bind(case.person_id.into_inner())
        .bind(case.organization_id.into_inner())
        .bind(&case.status.code)
        .bind(case.created_at)
        .bind(case.last_seen_on)
        .bind(case.deleted)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn case(&self, case_id: CaseId) -> Result<Option<Case>, PostgresError> {
        let row = sqlx::query(
            "SELECT c.id, c.person_id, c.organization_id, c.status_code, s.name AS status_name,
                    s.is_closed, c.created_at, c.last_seen_on, c.deleted
             FROM cases c JOIN case_statuses s ON s.code = c.status_code
             WHERE c.id = $1"
        )
        .bind(case_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_case).transpose()
    }

    pub async fn create_registration(
        &self,
        registration: &ShelterRegistration
    ) -> Result<(), PostgresError> {
        sqlx::query(
            "INSERT INTO shelter_registrations (id, person_id, site_id, status, deleted, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(registration.id)
        .bind(registration.person_id.into_inner())
        .bind(registration.site_id.into_inner())
        .bind(registration.status.code())
        .bind(registration.deleted)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_flag(&self, flag: &CaseFlag) -> Result<(), PostgresError> {
        sqlx::query(
            "INSERT INTO case_flags (id, organization_id, name, deny_check_in, deny_check_out,
                 advise_at_check_in, advise_at_check_out, advise_at_id_check, instructions, deleted)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        )
        .bind(flag.id.into_inner())
        .bind(flag.organization_id.map(OrganizationId::into_inner))
        .bind(&flag.name)
        .bind(flag.deny_check_in)
        .bind(flag.deny_check_out)
        .bind(flag.advise_at_check_in)
        .bind(flag.advise_at_check_out)
        .bind(flag.advise_at_id_check)
        .bind(&flag.instructions)
        .bind(flag.deleted)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_flag_assignment(
        &self,
        assignment: &CaseFlagAssignment
    ) -> Result<(), PostgresError> {
        sqlx::query(
            "INSERT INTO case_flag_assignments (id, person_id, flag_id, deleted)
             VALUES ($1, $2, $3, $4)"
        )
        .bind(assignment.id)
        .bind(assignment.person_id.into_inner())
        .bind(assignment.flag_id.into_inner())
        .bind(assignment.deleted)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_staff_assignment(
        &self,
        assignment: &StaffAssignment
    ) -> Result<(), PostgresError> {
        sqlx::query(
            "INSERT INTO staff_assignments (id, person_id, organization_id, status, deleted)
             VALUES ($1, $2, $3, $4, $5)"
        )
        .bind(assignment.id)
        .bind(assignment.person_id.into_inner())
        .bind(assignment.organization_id.into_inner())
        .bind(assignment.status.to_string())
        .bind(assignment.deleted)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_site(&self, site_id: SiteId) -> Result<Option<Site>, PostgresError> {
        let row = sqlx::query("SELECT id, name, kind, organization_id FROM sites WHERE id = $1")
            .bind(site_id.into_inner())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_site).transpose()
    }

    pub async fn get_organization(
        &self,
        organization_id: OrganizationId
    ) -> Result<Option<Organization>, PostgresError> {
        let row = sqlx::query("SELECT id, name, parent_id, root_id FROM organizations WHERE id = $1")
            .bind(organization_id.into_inner())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_organization).transpose()
    }

    pub async fn get_cases_for_person(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<Case>, PostgresError> {
        let scope: Vec<Uuid> = organizations.iter().map(|o| o.into_inner()).collect();
        let rows = sqlx::query(
            "SELECT c.id, c.person_id, c.organization_id, c.status_code, s.name AS status_name,
                    s.is_closed, c.created_at, c.last_seen_on, c.deleted
             FROM cases c JOIN case_statuses s ON s.code = c.status_code
             WHERE c.person_id = $1 AND c.organization_id = ANY($2) AND NOT c.deleted
             ORDER BY c.created_at DESC, c.id DESC"
        )
        .bind(person_id.into_inner())
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_case).collect()
    }

    pub async fn get_registrations(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Vec<ShelterRegistration>, PostgresError> {
        let rows = sqlx::query(
            "SELECT id, person_id, site_id, status, deleted, updated_at
             FROM shelter_registrations
             WHERE person_id = $1 AND site_id = $2
             ORDER BY updated_at DESC"
        )
        .bind(person_id.into_inner())
        .bind(site_id.into_inner())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_registration).collect()
    }

    pub async fn get_staff_assignments(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<StaffAssignment>, PostgresError> {
        let scope: Vec<Uuid> = organizations.iter().map(|o| o.into_inner()).collect();
        let rows = sqlx::query(
            "SELECT id, person_id, organization_id, status, deleted
             FROM staff_assignments
             WHERE person_id = $1 AND organization_id = ANY($2)"
        )
        .bind(person_id.into_inner())
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_staff_assignment).collect()
    }

    pub async fn get_flags_for_person(
        &self,
        person_id: PersonId
    ) -> Result<Vec<CaseFlag>, PostgresError> {
        let rows = sqlx::query(
            "SELECT f.id, f.organization_id, f.name, f.deny_check_in, f.deny_check_out,
                    f.advise_at_check_in, f.advise_at_check_out, f.advise_at_id_check,
                    f.instructions, f.deleted
             FROM case_flags f
             WHERE NOT f.deleted
               AND f.id IN (SELECT a.flag_id FROM case_flag_assignments a
                            WHERE a.person_id = $1 AND NOT a.deleted)
             ORDER BY f.position"
        )
        .bind(person_id.into_inner())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_flag).collect()
    }

    pub async fn get_latest_transition(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Option<PresenceEvent>, PostgresError> {
        let row = sqlx::query(
            "SELECT sequence, id, person_id, site_id, kind, occurred_at, deleted
             FROM presence_events
             WHERE person_id = $1 AND site_id = $2 AND NOT deleted
               AND kind IN ('check_in', 'check_out')
             ORDER BY occurred_at DESC, sequence DESC
             LIMIT 1"
        )
        .bind(person_id.into_inner())
        .bind(site_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_event).transpose()
    }

    pub async fn append_event(&self, event: NewPresenceEvent) -> Result<PresenceEvent, PostgresError> {
        let id = Uuid::new_v4();
        let row = sqlx::query(
            "INSERT INTO presence_events (id, person_id, site_id, kind, occurred_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING sequence"
        )
        .bind(id)
        .bind(event.person_id.into_inner())
        .bind(event.site_id.into_inner())
        .bind(event.kind.to_string())
        .bind(event.occurred_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(PresenceEvent {
            id,
            sequence: row.try_get("sequence")?,
            person_id: event.person_id,
            site_id: event.site_id,
            kind: event.kind,
            occurred_at: event.occurred_at,
            deleted: false
        })
    }

    pub async fn delete_event(&self, event_id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("UPDATE presence_events SET deleted = TRUE WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn has_any_case(&self, person_id: PersonId) -> Result<bool, PostgresError> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM cases WHERE person_id = $1 AND NOT deleted) AS found"
        )
        .bind(person_id.into_inner())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("found")?)
    }

    /// Moves `last_seen_on` forward on every live case of the person; an
    /// older timestamp leaves the stored value untouched.
    pub async fn touch_last_seen(
        &self,
        person_id: PersonId,
        seen_at: DateTime<Utc>
    ) -> Result<u64, PostgresError> {
        let result = sqlx::query(
            "UPDATE cases SET last_seen_on = GREATEST(last_seen_on, $2)
             WHERE person_id = $1 AND NOT deleted"
        )
        .bind(person_id.into_inner())
        .bind(seen_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

fn decode_site(row: &PgRow) -> Result<Site, PostgresError> {
    let kind: String = row.try_get("kind")?;
    Ok(Site {
        id: SiteId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        kind: kind
            .parse::<SiteKind>()
            .map_err(|_| decode_err("site", format!("unknown kind: {kind}")))?,
        organization_id: row
            .try_get::<Option<Uuid>, _>("organization_id")?
            .map(OrganizationId::from_uuid)
    })
}

fn decode_organization(row: &PgRow) -> Result<Organization, PostgresError> {
    Ok(Organization {
        id: OrganizationId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(OrganizationId::from_uuid),
        root_id: row
            .try_get::<Option<Uuid>, _>("root_id")?
            .map(OrganizationId::from_uuid)
    })
}

fn decode_case(row: &PgRow) -> Result<Case, PostgresError> {
    Ok(Case {
        id: CaseId::from_uuid(row.try_get("id")?),
        person_id: PersonId::from_uuid(row.try_get("person_id")?),
        organization_id: OrganizationId::from_uuid(row.try_get("organization_id")?),
        status: CaseStatus {
            code: row.try_get("status_code")?,
            name: row.try_get("status_name")?,
            is_closed: row.try_get("is_closed")?
        },
        created_at: row.try_get("created_at")?,
        last_seen_on: row.try_get("last_seen_on")?,
        deleted: row.try_get("deleted")?
    })
}

fn decode_registration(row: &PgRow) -> Result<ShelterRegistration, PostgresError> {
    let code: i16 = row.try_get("status")?;
    Ok(ShelterRegistration {
        id: row.try_get("id")?,
        person_id: PersonId::from_uuid(row.try_get("person_id")?),
        site_id: SiteId::from_uuid(row.try_get("site_id")?),
        status: RegistrationStatus::from_code(code)
            .map_err(|e| decode_err("shelter_registration", e))?,
        deleted: row.try_get("deleted")?,
        updated_at: row.try_get("updated_at")?
    })
}

fn decode_flag(row: &PgRow) -> Result<CaseFlag, PostgresError> {
    Ok(CaseFlag {
        id: CaseFlagId::from_uuid(row.try_get("id")?),
        organization_id: row
            .try_get::<Option<Uuid>, _>("organization_id")?
            .map(OrganizationId::from_uuid),
        name: row.try_get("name")?,
        deny_check_in: row.try_get("deny_check_in")?,
        deny_check_out: row.try_get("deny_check_out")?,
        advise_at_check_in: row.try_get("advise_at_check_in")?,
        advise_at_check_out: row.try_get("advise_at_check_out")?,
        advise_at_id_check: row.try_get("advise_at_id_check")?,
        instructions: row.try_get("instructions")?,
        deleted: row.try_get("deleted")?
    })
}

fn decode_staff_assignment(row: &PgRow) -> Result<StaffAssignment, PostgresError> {
    let status: String = row.try_get("status")?;
    Ok(StaffAssignment {
        id: row.try_get("id")?,
        person_id: PersonId::from_uuid(row.try_get("person_id")?),
        organization_id: OrganizationId::from_uuid(row.try_get("organization_id")?),
        status: status
            .parse::<StaffStatus>()
            .map_err(|_| decode_err("staff_assignment", format!("unknown status: {status}")))?,
        deleted: row.try_get("deleted")?
    })
}

fn decode_event(row: &PgRow) -> Result<PresenceEvent, PostgresError> {
    let kind: String = row.try_get("kind")?;
    Ok(PresenceEvent {
        id: row.try_get("id")?,
        sequence: row.try_get("sequence")?,
        person_id: PersonId::from_uuid(row.try_get("person_id")?),
        site_id: SiteId::from_uuid(row.try_get("site_id")?),
        kind: kind
            .parse::<PresenceEventKind>()
            .map_err(|_| decode_err("presence_event", format!("unknown kind: {kind}")))?,
        occurred_at: row.try_get("occurred_at")?,
        deleted: row.try_get("deleted")?
    })
}

#[async_trait]
impl OrganizationDirectory for PostgresBackend {
    async fn site(&self, site_id: SiteId) -> Result<Option<Site>, StorageError> {
        Ok(self.get_site(site_id).await?)
    }

    async fn organization(
        &self,
        organization_id: OrganizationId
    ) -> Result<Option<Organization>, StorageError> {
        Ok(self.get_organization(organization_id).await?)
    }
}

#[async_trait]
impl CaseRepository for PostgresBackend {
    async fn cases_for_person(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<Case>, StorageError> {
        Ok(self.get_cases_for_person(person_id, organizations).await?)
    }

    async fn has_case(&self, person_id: PersonId) -> Result<bool, StorageError> {
        Ok(self.has_any_case(person_id).await?)
    }
}

#[async_trait]
impl ShelterRegistry for PostgresBackend {
    async fn registrations(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Vec<ShelterRegistration>, StorageError> {
        Ok(self.get_registrations(person_id, site_id).await?)
    }
}

#[async_trait]
impl StaffDirectory for PostgresBackend {
    async fn assignments(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<Vec<StaffAssignment>, StorageError> {
        Ok(self.get_staff_assignments(person_id, organizations).await?)
    }
}

#[async_trait]
impl FlagRepository for PostgresBackend {
    async fn flags_for_person(&self, person_id: PersonId) -> Result<Vec<CaseFlag>, StorageError> {
        Ok(self.get_flags_for_person(person_id).await?)
    }
}

#[async_trait]
impl PresenceLog for PostgresBackend {
    async fn latest_transition(
        &self,
        person_id: PersonId,
        site_id: SiteId
    ) -> Result<Option<PresenceEvent>, StorageError> {
        Ok(self.get_latest_transition(person_id, site_id).await?)
    }

    async fn record(&self, event: NewPresenceEvent) -> Result<PresenceEvent, StorageError> {
        Ok(self.append_event(event).await?)
    }
}

#[async_trait]
impl LastSeenSink for PostgresBackend {
    async fn update_last_seen(
        &self,
        person_id: PersonId,
        seen_at: DateTime<Utc>
    ) -> Result<(), StorageError> {
        let updated = self.touch_last_seen(person_id, seen_at).await?;
        tracing::debug!("Refreshed last_seen_on on {} case(s) of {}", updated, person_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_error_maps_to_storage_error() {
        let err: StorageError = PostgresError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, StorageError::ConnectionError { .. }));

        let err: StorageError = decode_err("site", "unknown kind: depot").into();
        assert_eq!(
            err.to_string(),
            "Decoding site from postgres failed: unknown kind: depot"
        );
    }

    #[test]
    fn test_database_error_display() {
        let error = PostgresError::Database(sqlx::Error::Configuration(
            "Invalid connection string".into()
        ));
        assert!(error.to_string().contains("Database error"));
    }
}
