use crate::org_resolver::OrganizationScope;
use errors::StorageError;
use site_core::traits::CaseRepository;
use site_core::types::{Case, PersonId};
use std::cmp::Ordering;
use std::sync::Arc;

pub struct CaseLookup {
    cases: Arc<dyn CaseRepository>
}

impl CaseLookup {
    pub fn new(cases: Arc<dyn CaseRepository>) -> Self {
        Self { cases }
    }

    /// The authoritative case of the person within `scope`, if any.
    ///
    /// A case at the owning organization beats one at an ancestor, nearer
    /// ancestors beat farther ones, then the newest case wins, then the
    /// highest id.
    pub async fn find(
        &self,
        person_id: PersonId,
        scope: &OrganizationScope
    ) -> Result<Option<Case>, StorageError> {
        let cases = self
            .cases
            .cases_for_person(person_id, &scope.organizations)
            .await?;

        Ok(cases
            .into_iter()
            .filter(|case| !case.deleted)
            .filter_map(|case| scope.rank(case.organization_id).map(|rank| (rank, case)))
            .min_by(|(rank_a, a), (rank_b, b)| precedence(*rank_a, a, *rank_b, b))
            .map(|(_, case)| case))
    }
}

fn precedence(rank_a: usize, a: &Case, rank_b: usize, b: &Case) -> Ordering {
    rank_a
        .cmp(&rank_b)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use site_core::types::{CaseStatus, OrganizationId, Site, SiteKind};

    fn case(org: OrganizationId, created_offset: i64, closed: bool) -> Case {
        let status = if closed {
            CaseStatus::closed()
        } else {
            CaseStatus::open()
        };
        let mut case = Case::new(PersonId::generate(), org, status).unwrap();
        case.created_at = Utc::now() + Duration::minutes(created_offset);
        case
    }

    #[test]
    fn test_owner_case_beats_ancestor_case() {
        let owner = OrganizationId::generate();
        let ancestor = OrganizationId::generate();
        let scope = OrganizationScope {
            site: Site::new("Site", SiteKind::Facility, owner),
            owner,
            organizations: vec![owner, ancestor]
        };

        let at_owner = case(owner, -60, false);
        let at_ancestor = case(ancestor, 0, true);

        let ordering = precedence(
            scope.rank(at_owner.organization_id).unwrap(),
            &at_owner,
            scope.rank(at_ancestor.organization_id).unwrap(),
            &at_ancestor
        );
        assert_eq!(ordering, Ordering::Less);
    }

    #[test]
    fn test_newest_case_wins_within_organization() {
        let org = OrganizationId::generate();
        let older = case(org, -10, true);
        let newer = case(org, 0, false);

        assert_eq!(precedence(0, &newer, 0, &older), Ordering::Less);
        assert_eq!(precedence(0, &older, 0, &newer), Ordering::Greater);
    }
}
