//! Site to organization resolution.
//!
//! Lookup failures propagate to the caller. An ancestor that cannot be read
//! would otherwise narrow the scope without anyone noticing.

use errors::StorageError;
use site_core::traits::OrganizationDirectory;
use site_core::types::{OrganizationId, Site, SiteId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// The organizations a site's eligibility checks are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationScope {
    pub site: Site,
    pub owner: OrganizationId,
    /// Owning organization first, then ancestors from nearest to farthest.
    pub organizations: Vec<OrganizationId>
}

impl OrganizationScope {
    /// Position of `organization_id` in the scope; lower is closer to the site.
    pub fn rank(&self, organization_id: OrganizationId) -> Option<usize> {
        self.organizations.iter().position(|id| *id == organization_id)
    }
}

pub struct OrganizationResolver {
    directory: Arc<dyn OrganizationDirectory>,
    max_depth: usize
}

impl OrganizationResolver {
    pub fn new(directory: Arc<dyn OrganizationDirectory>, max_depth: usize) -> Self {
        Self {
            directory,
            max_depth
        }
    }

    /// Resolves the site's scope, or `None` when the site is missing, unlinked,
    /// or linked to an organization that does not exist.
    pub async fn resolve(&self, site_id: SiteId) -> Result<Option<OrganizationScope>, StorageError> {
        let Some(site) = self.directory.site(site_id).await? else {
            return Ok(None);
        };
        let Some(owner_id) = site.organization_id else {
            return Ok(None);
        };
        let Some(owner) = self.directory.organization(owner_id).await? else {
            return Ok(None);
        };

        let mut organizations = vec![owner.id];
        if owner.has_distinct_root() {
            self.collect_ancestors(owner.id, owner.parent_id, &mut organizations)
                .await?;
        }

        Ok(Some(OrganizationScope {
            site,
            owner: owner.id,
            organizations
        }))
    }

    /// Follows parent links upwards. A dangling link, a cycle or the depth
    /// bound ends the walk early, keeping what was collected.
    async fn collect_ancestors(
        &self,
        start: OrganizationId,
        first_parent: Option<OrganizationId>,
        organizations: &mut Vec<OrganizationId>
    ) -> Result<(), StorageError> {
        let mut visited = HashSet::from([start]);
        let mut next = first_parent;

        while let Some(parent_id) = next {
            if organizations.len() > self.max_depth {
                warn!(
                    "Ancestor walk from {} stopped at depth limit {}",
                    start, self.max_depth
                );
                break;
            }
            if !visited.insert(parent_id) {
                warn!("Organization cycle detected at {} (from {})", parent_id, start);
                break;
            }
            let Some(parent) = self.directory.organization(parent_id).await? else {
                warn!("Organization {} references missing parent {}", start, parent_id);
                break;
            };
            organizations.push(parent.id);
            next = parent.parent_id;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use site_core::types::{Organization, SiteKind};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Directory {
        sites: HashMap<SiteId, Site>,
        organizations: HashMap<OrganizationId, Organization>
    }

    #[async_trait]
    impl OrganizationDirectory for Directory {
        async fn site(&self, site_id: SiteId) -> Result<Option<Site>, StorageError> {
            Ok(self.sites.get(&site_id).cloned())
        }

        async fn organization(
            &self,
            organization_id: OrganizationId
        ) -> Result<Option<Organization>, StorageError> {
            Ok(self.organizations.get(&organization_id).cloned())
        }
    }

    impl Directory {
        fn with_org(mut self, org: &Organization) -> Self {
            self.organizations.insert(org.id, org.clone());
            self
        }

        fn with_site(mut self, site: &Site) -> Self {
            self.sites.insert(site.id, site.clone());
            self
        }
    }

    fn resolver(directory: Directory, max_depth: usize) -> OrganizationResolver {
        OrganizationResolver::new(Arc::new(directory), max_depth)
    }

    #[tokio::test]
    async fn test_missing_or_unlinked_site_is_unresolved() {
        let org = Organization::new("Org").unwrap();
        let mut unlinked = Site::new("Unlinked", SiteKind::Facility, org.id);
        unlinked.organization_id = None;
        let orphan = Site::new("Orphan", SiteKind::Facility, OrganizationId::generate());

        let resolver = resolver(
            Directory::default()
                .with_org(&org)
                .with_site(&unlinked)
                .with_site(&orphan),
            32
        );

        assert!(resolver.resolve(SiteId::generate()).await.unwrap().is_none());
        assert!(resolver.resolve(unlinked.id).await.unwrap().is_none());
        assert!(resolver.resolve(orphan.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_root_organization_has_no_ancestors() {
        let mut root = Organization::new("Root").unwrap();
        root.root_id = Some(root.id);
        let site = Site::new("HQ", SiteKind::Facility, root.id);

        let scope = resolver(Directory::default().with_org(&root).with_site(&site), 32)
            .resolve(site.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scope.organizations, vec![root.id]);
        assert_eq!(scope.owner, root.id);
    }

    #[tokio::test]
    async fn test_ancestors_nearest_first() {
        let root = Organization::new("Root").unwrap();
        let region = Organization::new("Region").unwrap().under(&root);
        let district = Organization::new("District").unwrap().under(&region);
        let site = Site::new("Shelter", SiteKind::Shelter, district.id);

        let scope = resolver(
            Directory::default()
                .with_org(&root)
                .with_org(&region)
                .with_org(&district)
                .with_site(&site),
            32
        )
        .resolve(site.id)
        .await
        .unwrap()
        .unwrap();

        assert_eq!(scope.organizations, vec![district.id, region.id, root.id]);
        assert_eq!(scope.rank(root.id), Some(2));
        assert_eq!(scope.rank(OrganizationId::generate()), None);
    }

    #[tokio::test]
    async fn test_cycle_and_dangling_parent_degrade() {
        let root = Organization::new("Root").unwrap();
        let mut a = Organization::new("A").unwrap().under(&root);
        let b = Organization::new("B").unwrap().under(&a);
        // a -> b -> a
        a.parent_id = Some(b.id);
        let site = Site::new("Cyclic", SiteKind::Facility, a.id);

        let scope = resolver(
            Directory::default().with_org(&a).with_org(&b).with_site(&site),
            32
        )
        .resolve(site.id)
        .await
        .unwrap()
        .unwrap();
        assert_eq!(scope.organizations, vec![a.id, b.id]);

        let lost = Organization::new("Lost").unwrap().under(&root);
        let site = Site::new("Dangling", SiteKind::Facility, lost.id);
        let scope = resolver(Directory::default().with_org(&lost).with_site(&site), 32)
            .resolve(site.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scope.organizations, vec![lost.id]);
    }

    #[tokio::test]
    async fn test_depth_bound() {
        let root = Organization::new("Root").unwrap();
        let mut chain = vec![root.clone()];
        for level in 0..5 {
            let parent = chain.last().unwrap().clone();
            chain.push(Organization::new(format!("Level {level}")).unwrap().under(&parent));
        }
        let leaf = chain.last().unwrap().clone();
        let site = Site::new("Deep", SiteKind::Facility, leaf.id);

        let mut directory = Directory::default().with_site(&site);
        for org in &chain {
            directory = directory.with_org(org);
        }

        let scope = resolver(directory, 2).resolve(site.id).await.unwrap().unwrap();
        assert_eq!(scope.organizations.len(), 3);
        assert_eq!(scope.organizations[0], leaf.id);
    }

    struct UnreachableParent {
        inner: Directory,
        broken: OrganizationId
    }

    #[async_trait]
    impl OrganizationDirectory for UnreachableParent {
        async fn site(&self, site_id: SiteId) -> Result<Option<Site>, StorageError> {
            self.inner.site(site_id).await
        }

        async fn organization(
            &self,
            organization_id: OrganizationId
        ) -> Result<Option<Organization>, StorageError> {
            if organization_id == self.broken {
                return Err(StorageError::query("organizations", "connection refused"));
            }
            self.inner.organization(organization_id).await
        }
    }

    #[tokio::test]
    async fn test_unreadable_ancestor_is_an_error() {
        let root = Organization::new("Root").unwrap();
        let branch = Organization::new("Branch").unwrap().under(&root);
        let site = Site::new("Facility", SiteKind::Facility, branch.id);
        let directory = UnreachableParent {
            inner: Directory::default()
                .with_org(&root)
                .with_org(&branch)
                .with_site(&site),
            broken: root.id
        };

        let result = OrganizationResolver::new(Arc::new(directory), 8)
            .resolve(site.id)
            .await;
        assert!(matches!(result, Err(StorageError::QueryError { .. })));
    }
}
