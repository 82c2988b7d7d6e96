use errors::StorageError;
use site_core::traits::StaffDirectory;
use site_core::types::{OrganizationId, PersonId};
use std::sync::Arc;

pub struct StaffEligibility {
    directory: Arc<dyn StaffDirectory>
}

impl StaffEligibility {
    pub fn new(directory: Arc<dyn StaffDirectory>) -> Self {
        Self { directory }
    }

    pub async fn is_active_staff(
        &self,
        person_id: PersonId,
        organizations: &[OrganizationId]
    ) -> Result<bool, StorageError> {
        Ok(self
            .directory
            .assignments(person_id, organizations)
            .await?
            .iter()
            .any(|assignment| {
                assignment.is_active() && organizations.contains(&assignment.organization_id)
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use site_core::types::{StaffAssignment, StaffStatus};

    /// Returns every assignment regardless of the requested organizations.
    struct Directory(Vec<StaffAssignment>);

    #[async_trait]
    impl StaffDirectory for Directory {
        async fn assignments(
            &self,
            _person_id: PersonId,
            _organizations: &[OrganizationId]
        ) -> Result<Vec<StaffAssignment>, StorageError> {
            Ok(self.0.clone())
        }
    }

    fn assignment(organization_id: OrganizationId, status: StaffStatus) -> StaffAssignment {
        StaffAssignment::new(PersonId::generate(), organization_id, status)
    }

    async fn eligible(assignments: Vec<StaffAssignment>, scope: &[OrganizationId]) -> bool {
        StaffEligibility::new(Arc::new(Directory(assignments)))
            .is_active_staff(PersonId::generate(), scope)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_active_assignment_in_scope() {
        let org = OrganizationId::generate();
        assert!(eligible(vec![assignment(org, StaffStatus::Active)], &[org]).await);
    }

    #[tokio::test]
    async fn test_deleted_active_assignment_is_ignored() {
        let org = OrganizationId::generate();
        let mut deleted = assignment(org, StaffStatus::Active);
        deleted.deleted = true;
        assert!(!eligible(vec![deleted, assignment(org, StaffStatus::Inactive)], &[org]).await);
    }

    #[tokio::test]
    async fn test_assignment_outside_scope_is_ignored() {
        let org = OrganizationId::generate();
        let elsewhere = OrganizationId::generate();
        assert!(!eligible(vec![assignment(elsewhere, StaffStatus::Active)], &[org]).await);
        assert!(!eligible(vec![assignment(org, StaffStatus::Active)], &[]).await);
    }
}
