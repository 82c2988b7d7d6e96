//! The decision assembler.
//!
//! Evaluation walks a fixed sequence: resolve the site's organizations, look
//! up the person's case, then either check residency (shelters) or staff
//! eligibility (no case), and finally aggregate flags for case holders.
//! Every denial is terminal and leaves both directions closed.

use crate::case_lookup::CaseLookup;
use crate::error::AccessError;
use crate::flags::FlagAggregator;
use crate::org_resolver::OrganizationResolver;
use crate::presence::PresenceTracker;
use crate::residency::ResidencyCheck;
use crate::staff::StaffEligibility;
use crate::telemetry::{EvaluationTimer, Telemetry};
use config::AccessConfig;
use site_core::traits::SiteAccessStore;
use site_core::types::{PersonId, SiteId};
use site_core::{AccessDecision, DenialReason};
use std::sync::Arc;
use tracing::debug;

pub struct AccessEngine {
    resolver: OrganizationResolver,
    cases: CaseLookup,
    residency: ResidencyCheck,
    staff: StaffEligibility,
    flags: FlagAggregator,
    presence: PresenceTracker
}

impl AccessEngine {
    pub fn new(
        resolver: OrganizationResolver,
        cases: CaseLookup,
        residency: ResidencyCheck,
        staff: StaffEligibility,
        flags: FlagAggregator,
        presence: PresenceTracker
    ) -> Self {
        Self {
            resolver,
            cases,
            residency,
            staff,
            flags,
            presence
        }
    }

    /// Wires every component to a single backend.
    pub fn from_store<S: SiteAccessStore + 'static>(store: Arc<S>, config: &AccessConfig) -> Self {
        Self::new(
            OrganizationResolver::new(store.clone(), config.max_ancestor_depth),
            CaseLookup::new(store.clone()),
            ResidencyCheck::new(store.clone()),
            StaffEligibility::new(store.clone()),
            FlagAggregator::new(store.clone(), config.no_instructions_placeholder.clone()),
            PresenceTracker::new(store)
        )
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Decides whether `person_id` may be registered at `site_id`.
    ///
    /// Denials are reported inside the decision; `Err` means a data source
    /// failed.
    #[tracing::instrument(skip(self))]
    pub async fn evaluate_access(
        &self,
        site_id: SiteId,
        person_id: PersonId
    ) -> Result<AccessDecision, AccessError> {
        let timer = EvaluationTimer::start();
        let decision = self.assemble(site_id, person_id).await?;
        timer.finish();
        Telemetry::record_decision(&decision);
        Ok(decision)
    }

    async fn assemble(
        &self,
        site_id: SiteId,
        person_id: PersonId
    ) -> Result<AccessDecision, AccessError> {
        let Some(scope) = self.resolver.resolve(site_id).await? else {
            debug!("Site {} does not resolve to an organization", site_id);
            return Ok(AccessDecision::denied(DenialReason::InvalidSite));
        };
        debug!(
            "Site {} resolved to {} organization(s)",
            site_id,
            scope.organizations.len()
        );

        let Some(case) = self.cases.find(person_id, &scope).await? else {
            debug!("No case in scope, checking staff assignments");
            return if self
                .staff
                .is_active_staff(person_id, &scope.organizations)
                .await?
            {
                debug!("Active staff member");
                Ok(AccessDecision::staff())
            } else {
                Ok(AccessDecision::denied(DenialReason::NeitherResidentNorStaff))
            };
        };

        if case.is_closed() {
            debug!("Case {} is closed", case.id);
            return Ok(AccessDecision::denied(DenialReason::ClosedCase));
        }

        if scope.site.is_shelter() {
            match self.residency.active_registration(person_id, site_id).await? {
                Some(registration) => {
                    debug!("Residency proven by registration {}", registration.id);
                }
                None => {
                    debug!("No active registration at shelter {}", site_id);
                    return Ok(AccessDecision::denied(DenialReason::NotResident));
                }
            }
        }

        let presence = self.presence.state(person_id, site_id).await?;
        let directives = self.flags.directives(person_id, presence).await?;
        debug!(
            "Presence {}, allowed_in={}, allowed_out={}, {} advisory(ies)",
            presence,
            directives.allowed_in,
            directives.allowed_out,
            directives.advisories.len()
        );

        Ok(AccessDecision::client(
            directives.allowed_in,
            directives.allowed_out,
            directives.advisories
        ))
    }
}
