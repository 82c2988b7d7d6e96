use chrono::{DateTime, Utc};
use errors::RecordError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// A person known to the case-management system.
    PersonId
);
entity_id!(OrganizationId);
entity_id!(SiteId);
entity_id!(CaseId);
entity_id!(CaseFlagId);

/// A managing organization.
///
/// `parent_id` links the organization into the entity tree; `root_id` names
/// the top of the branch it belongs to. An organization whose root is itself
/// (or unset) has no ancestors worth resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub parent_id: Option<OrganizationId>,
    pub root_id: Option<OrganizationId>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Result<Self, RecordError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecordError::missing("organization", "name"));
        }
        Ok(Self {
            id: OrganizationId::generate(),
            name,
            parent_id: None,
            root_id: None,
        })
    }

    /// Places this organization underneath `parent`, inheriting its root.
    pub fn under(mut self, parent: &Organization) -> Self {
        self.parent_id = Some(parent.id);
        self.root_id = Some(parent.root_id.unwrap_or(parent.id));
        self
    }

    /// True when the organization sits below a distinct root organization.
    pub fn has_distinct_root(&self) -> bool {
        self.root_id.is_some_and(|root| root != self.id)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteKind {
    Shelter,
    Facility,
}

/// A physical location people are registered as entering or leaving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub kind: SiteKind,
    /// Unlinked sites cannot be evaluated.
    pub organization_id: Option<OrganizationId>,
}

impl Site {
    pub fn new(name: impl Into<String>, kind: SiteKind, organization_id: OrganizationId) -> Self {
        Self {
            id: SiteId::generate(),
            name: name.into(),
            kind,
            organization_id: Some(organization_id),
        }
    }

    pub fn is_shelter(&self) -> bool {
        self.kind == SiteKind::Shelter
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    CheckedIn,
    CheckedOut,
}

impl RegistrationStatus {
    pub fn code(self) -> i16 {
        match self {
            RegistrationStatus::Pending => 1,
            RegistrationStatus::CheckedIn => 2,
            RegistrationStatus::CheckedOut => 3,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, RecordError> {
        match code {
            1 => Ok(RegistrationStatus::Pending),
            2 => Ok(RegistrationStatus::CheckedIn),
            3 => Ok(RegistrationStatus::CheckedOut),
            other => Err(RecordError::UnknownCode {
                kind: "registration status".to_string(),
                code: other.to_string(),
            }),
        }
    }

    /// A checked-out registration never counts as residency.
    pub fn is_terminal(self) -> bool {
        self == RegistrationStatus::CheckedOut
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelterRegistration {
    pub id: Uuid,
    pub person_id: PersonId,
    pub site_id: SiteId,
    pub status: RegistrationStatus,
    pub deleted: bool,
    pub updated_at: DateTime<Utc>,
}

impl ShelterRegistration {
    pub fn new(person_id: PersonId, site_id: SiteId, status: RegistrationStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            site_id,
            status,
            deleted: false,
            updated_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted && !self.status.is_terminal()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CaseStatus {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    pub name: String,
    pub is_closed: bool,
}

impl CaseStatus {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        is_closed: bool,
    ) -> Result<Self, RecordError> {
        let status = Self {
            code: code.into().trim().to_string(),
            name: name.into(),
            is_closed,
        };
        status.check()?;
        Ok(status)
    }

    pub fn open() -> Self {
        Self {
            code: "OPEN".to_string(),
            name: "Open".to_string(),
            is_closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            code: "CLOSED".to_string(),
            name: "Closed".to_string(),
            is_closed: true,
        }
    }

    fn check(&self) -> Result<(), RecordError> {
        self.validate()
            .map_err(|e| RecordError::invalid("case_status", "code", e.to_string()))
    }
}

/// A person's engagement record with a managing organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub person_id: PersonId,
    pub organization_id: OrganizationId,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub last_seen_on: Option<DateTime<Utc>>,
    pub deleted: bool,
}

impl Case {
    pub fn new(
        person_id: PersonId,
        organization_id: OrganizationId,
        status: CaseStatus,
    ) -> Result<Self, RecordError> {
        status.check()?;
        Ok(Self {
            id: CaseId::generate(),
            person_id,
            organization_id,
            status,
            created_at: Utc::now(),
            last_seen_on: None,
            deleted: false,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed
    }
}

/// An organization-defined marker attached to persons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CaseFlag {
    pub id: CaseFlagId,
    pub organization_id: Option<OrganizationId>,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub deny_check_in: bool,
    pub deny_check_out: bool,
    pub advise_at_check_in: bool,
    pub advise_at_check_out: bool,
    pub advise_at_id_check: bool,
    pub instructions: Option<String>,
    pub deleted: bool,
}

impl CaseFlag {
    pub fn new(name: impl Into<String>) -> Result<Self, RecordError> {
        let flag = Self {
            id: CaseFlagId::generate(),
            organization_id: None,
            name: name.into().trim().to_string(),
            deny_check_in: false,
            deny_check_out: false,
            advise_at_check_in: false,
            advise_at_check_out: false,
            advise_at_id_check: false,
            instructions: None,
            deleted: false,
        };
        flag.validate()
            .map_err(|e| RecordError::invalid("case_flag", "name", e.to_string()))?;
        Ok(flag)
    }

    pub fn denying_check_in(mut self) -> Self {
        self.deny_check_in = true;
        self
    }

    pub fn denying_check_out(mut self) -> Self {
        self.deny_check_out = true;
        self
    }

    pub fn advising_at_check_in(mut self) -> Self {
        self.advise_at_check_in = true;
        self
    }

    pub fn advising_at_check_out(mut self) -> Self {
        self.advise_at_check_out = true;
        self
    }

    pub fn advising_at_id_check(mut self) -> Self {
        self.advise_at_id_check = true;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Whether staff should see this flag's instructions, given where the
    /// person currently is.
    pub fn advises_at(&self, presence: PresenceState) -> bool {
        if self.advise_at_id_check {
            return true;
        }
        match presence {
            // about to leave
            PresenceState::In => self.advise_at_check_out,
            // about to enter
            PresenceState::Out => self.advise_at_check_in,
            PresenceState::Unknown => self.advise_at_check_in || self.advise_at_check_out,
        }
    }

    /// Trimmed instructions, or `placeholder` when there are none.
    pub fn instructions_or(&self, placeholder: &str) -> String {
        self.instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(placeholder)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFlagAssignment {
    pub id: Uuid,
    pub person_id: PersonId,
    pub flag_id: CaseFlagId,
    pub deleted: bool,
}

impl CaseFlagAssignment {
    pub fn new(person_id: PersonId, flag_id: CaseFlagId) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            flag_id,
            deleted: false,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StaffStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAssignment {
    pub id: Uuid,
    pub person_id: PersonId,
    pub organization_id: OrganizationId,
    pub status: StaffStatus,
    pub deleted: bool,
}

impl StaffAssignment {
    pub fn new(person_id: PersonId, organization_id: OrganizationId, status: StaffStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            organization_id,
            status,
            deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted && self.status == StaffStatus::Active
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PresenceEventKind {
    CheckIn,
    CheckOut,
    Seen,
}

/// Coarse presence of a person at a site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PresenceState {
    In,
    Out,
    Unknown,
}

impl PresenceState {
    /// State implied by the latest check-in/check-out event, if any.
    pub fn after(event: Option<&PresenceEvent>) -> Self {
        match event.map(|e| e.kind) {
            Some(PresenceEventKind::CheckIn) => PresenceState::In,
            Some(PresenceEventKind::CheckOut) => PresenceState::Out,
            Some(PresenceEventKind::Seen) | None => PresenceState::Unknown,
        }
    }
}

/// A presence event not yet written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPresenceEvent {
    pub person_id: PersonId,
    pub site_id: SiteId,
    pub kind: PresenceEventKind,
    pub occurred_at: DateTime<Utc>,
}

/// An entry of the append-only presence log. `sequence` is assigned by the
/// log and breaks ties between events with equal `occurred_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub id: Uuid,
    pub sequence: i64,
    pub person_id: PersonId,
    pub site_id: SiteId,
    pub kind: PresenceEventKind,
    pub occurred_at: DateTime<Utc>,
    pub deleted: bool,
}

impl PresenceEvent {
    pub fn is_transition(&self) -> bool {
        matches!(
            self.kind,
            PresenceEventKind::CheckIn | PresenceEventKind::CheckOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_requires_valid_status() {
        let person = PersonId::generate();
        let org = OrganizationId::generate();

        assert!(Case::new(person, org, CaseStatus::open()).is_ok());

        let broken = CaseStatus {
            code: String::new(),
            name: "Broken".to_string(),
            is_closed: false,
        };
        assert!(matches!(
            Case::new(person, org, broken),
            Err(RecordError::InvalidValue { .. })
        ));
        assert!(CaseStatus::new("  ", "Blank", false).is_err());
    }

    #[test]
    fn test_case_flag_rejects_blank_name() {
        assert!(CaseFlag::new("   ").is_err());
        assert_eq!(CaseFlag::new(" Escort ").unwrap().name, "Escort");
    }

    #[test]
    fn test_instructions_fall_back_to_placeholder() {
        let flag = CaseFlag::new("Medical").unwrap();
        assert_eq!(flag.instructions_or("none"), "none");

        let flag = flag.with_instructions("  \n\t ");
        assert_eq!(flag.instructions_or("none"), "none");

        let flag = flag.with_instructions("  Call the nurse  ");
        assert_eq!(flag.instructions_or("none"), "Call the nurse");
    }

    #[test]
    fn test_flag_advice_depends_on_presence() {
        let out_only = CaseFlag::new("Escort").unwrap().advising_at_check_out();
        assert!(out_only.advises_at(PresenceState::In));
        assert!(!out_only.advises_at(PresenceState::Out));
        assert!(out_only.advises_at(PresenceState::Unknown));

        let in_only = CaseFlag::new("Search").unwrap().advising_at_check_in();
        assert!(!in_only.advises_at(PresenceState::In));
        assert!(in_only.advises_at(PresenceState::Out));
        assert!(in_only.advises_at(PresenceState::Unknown));

        let id_check = CaseFlag::new("Verify ID").unwrap().advising_at_id_check();
        assert!(id_check.advises_at(PresenceState::In));
        assert!(id_check.advises_at(PresenceState::Out));

        let silent = CaseFlag::new("Deny").unwrap().denying_check_in();
        assert!(!silent.advises_at(PresenceState::Unknown));
    }

    #[test]
    fn test_registration_status_codes() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::CheckedIn,
            RegistrationStatus::CheckedOut,
        ] {
            assert_eq!(RegistrationStatus::from_code(status.code()).unwrap(), status);
        }
        assert!(RegistrationStatus::from_code(9).is_err());
        assert!(RegistrationStatus::CheckedOut.is_terminal());
        assert!(!RegistrationStatus::Pending.is_terminal());
    }

    #[test]
    fn test_checked_out_or_deleted_registration_is_inactive() {
        let person = PersonId::generate();
        let site = SiteId::generate();

        assert!(ShelterRegistration::new(person, site, RegistrationStatus::CheckedIn).is_active());
        assert!(ShelterRegistration::new(person, site, RegistrationStatus::Pending).is_active());
        assert!(!ShelterRegistration::new(person, site, RegistrationStatus::CheckedOut).is_active());

        let mut deleted = ShelterRegistration::new(person, site, RegistrationStatus::CheckedIn);
        deleted.deleted = true;
        assert!(!deleted.is_active());
    }

    #[test]
    fn test_organization_inherits_root() {
        let top = Organization::new("Regional Office").unwrap();
        let branch = Organization::new("District").unwrap().under(&top);
        let unit = Organization::new("Reception").unwrap().under(&branch);

        assert!(!top.has_distinct_root());
        assert_eq!(branch.root_id, Some(top.id));
        assert_eq!(unit.root_id, Some(top.id));
        assert_eq!(unit.parent_id, Some(branch.id));
        assert!(unit.has_distinct_root());
    }

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(PresenceState::Unknown.to_string(), "UNKNOWN");
        assert_eq!(PresenceEventKind::CheckIn.to_string(), "check_in");
        assert_eq!("shelter".parse::<SiteKind>().unwrap(), SiteKind::Shelter);
        assert_eq!(
            serde_json::to_string(&PresenceState::In).unwrap(),
            "\"IN\""
        );
    }
}
