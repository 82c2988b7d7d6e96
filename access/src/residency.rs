use errors::StorageError;
use site_core::traits::ShelterRegistry;
use site_core::types::{PersonId, ShelterRegistration, SiteId};
use std::sync::Arc;

pub struct ResidencyCheck {
    registry: Arc<dyn ShelterRegistry>
}

impl ResidencyCheck {
    pub fn new(registry: Arc<dyn ShelterRegistry>) -> Self {
        Self { registry }
    }

    /// The most recently updated registration proving residency at the
    /// shelter: not deleted and not checked out.
    pub async fn active_registration(
        &self,
        person_id: PersonId,
        shelter_id: SiteId
    ) -> Result<Option<ShelterRegistration>, StorageError> {
        Ok(self
            .registry
            .registrations(person_id, shelter_id)
            .await?
            .into_iter()
            .filter(ShelterRegistration::is_active)
            .max_by_key(|registration| registration.updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use site_core::types::RegistrationStatus;

    struct Registry(Vec<ShelterRegistration>);

    #[async_trait]
    impl ShelterRegistry for Registry {
        async fn registrations(
            &self,
            _person_id: PersonId,
            _site_id: SiteId
        ) -> Result<Vec<ShelterRegistration>, StorageError> {
            Ok(self.0.clone())
        }
    }

    fn registration(
        status: RegistrationStatus,
        age: Duration,
        deleted: bool
    ) -> ShelterRegistration {
        let mut registration =
            ShelterRegistration::new(PersonId::generate(), SiteId::generate(), status);
        registration.updated_at = Utc::now() - age;
        registration.deleted = deleted;
        registration
    }

    async fn active(registrations: Vec<ShelterRegistration>) -> Option<ShelterRegistration> {
        ResidencyCheck::new(Arc::new(Registry(registrations)))
            .active_registration(PersonId::generate(), SiteId::generate())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pending_next_to_older_checkout_is_active() {
        let pending = registration(RegistrationStatus::Pending, Duration::zero(), false);
        let found = active(vec![
            registration(RegistrationStatus::CheckedOut, Duration::days(10), false),
            pending.clone()
        ])
        .await;
        assert_eq!(found.map(|r| r.id), Some(pending.id));
    }

    #[tokio::test]
    async fn test_deleted_check_in_does_not_count() {
        let found = active(vec![
            registration(RegistrationStatus::CheckedIn, Duration::zero(), true),
            registration(RegistrationStatus::CheckedOut, Duration::days(1), false)
        ])
        .await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_most_recently_updated_registration_wins() {
        let newest = registration(RegistrationStatus::CheckedIn, Duration::hours(1), false);
        let found = active(vec![
            registration(RegistrationStatus::Pending, Duration::days(3), false),
            newest.clone(),
            registration(RegistrationStatus::CheckedIn, Duration::days(1), false),
            registration(RegistrationStatus::Pending, Duration::zero(), true)
        ])
        .await;
        assert_eq!(found.map(|r| r.id), Some(newest.id));
    }

    #[tokio::test]
    async fn test_no_registrations() {
        assert!(active(Vec::new()).await.is_none());
    }
}
