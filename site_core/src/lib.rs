//! # Site Access Core
//!
//! Shared types and traits for the site access engine.
//!
//! This crate provides:
//! - Typed records for persons, organizations, sites, cases, flags, shelter
//!   registrations, staff assignments and presence events
//! - The access decision returned to reception staff
//! - Data-source traits the engine reads from (and the one it writes to)
//!
//! Records are owned by the surrounding case-management system; the engine
//! only ever reads them, apart from the last-seen timestamp it refreshes
//! through [`traits::LastSeenSink`].

pub mod decision;
pub mod traits;
pub mod types;

pub use decision::{AccessDecision, Advisory, DenialReason};
pub use traits::{
    CaseRepository, FlagRepository, LastSeenSink, OrganizationDirectory, PresenceLog,
    ShelterRegistry, SiteAccessStore, StaffDirectory,
};
pub use types::{
    Case, CaseFlag, CaseFlagAssignment, CaseFlagId, CaseId, CaseStatus, NewPresenceEvent,
    Organization, OrganizationId, PersonId, PresenceEvent, PresenceEventKind, PresenceState,
    RegistrationStatus, ShelterRegistration, Site, SiteId, SiteKind, StaffAssignment, StaffStatus,
};
