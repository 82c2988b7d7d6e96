//! # Site Access Engine
//!
//! Decides whether a person may be registered at a site, in which
//! direction, and which flag instructions reception staff must see.
//!
//! Components, leaves first:
//! - [`org_resolver::OrganizationResolver`]: site to owning organization plus
//!   its ancestors
//! - [`case_lookup::CaseLookup`]: the person's case within that scope
//! - [`residency::ResidencyCheck`]: active shelter registration
//! - [`staff::StaffEligibility`]: active staff assignment
//! - [`flags::FlagAggregator`]: deny directives and advisories
//! - [`presence::PresenceTracker`]: current IN/OUT state
//! - [`engine::AccessEngine`]: assembles the above into an
//!   [`AccessDecision`](site_core::AccessDecision)
//! - [`last_seen::LastSeenUpdater`]: refreshes the case's last-seen time
//!   after a presence event
//! - [`registration::PresenceRegistrar`]: checks, records and notifies in one
//!   step

pub mod case_lookup;
pub mod engine;
pub mod error;
pub mod flags;
pub mod last_seen;
pub mod org_resolver;
pub mod presence;
pub mod registration;
pub mod residency;
pub mod staff;
pub mod telemetry;

pub use engine::AccessEngine;
pub use error::{AccessError, RegistrationRejected};
pub use flags::{FlagAggregator, FlagDirectives};
pub use last_seen::{LastSeenOutcome, LastSeenUpdater};
pub use org_resolver::{OrganizationResolver, OrganizationScope};
pub use registration::{PresenceRegistrar, RegisteredPresence};
