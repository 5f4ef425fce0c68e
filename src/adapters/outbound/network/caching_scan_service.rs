use crate::inspection::domain::{
    BomComponent, ComponentVersion, Coordinate, Origin, PolicyStatus, ProjectVersion,
    Vulnerability,
};
use crate::ports::outbound::{NotificationRecord, ScanService, UserRef};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// CachingScanService wraps a ScanService and caches immutable lookups.
///
/// Component version resources and their origins never change once published,
/// so they are cached for the lifetime of the process. Everything that can
/// change (notifications, policy status, vulnerabilities, project versions,
/// BOM registration) always goes to the inner service.
pub struct CachingScanService<C: ScanService> {
    inner: C,
    component_versions: Arc<DashMap<String, ComponentVersion>>,
    origins: Arc<DashMap<String, Vec<Origin>>>,
}

impl<C: ScanService> CachingScanService<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            component_versions: Arc::new(DashMap::new()),
            origins: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.component_versions.len() + self.origins.len()
    }
}

#[async_trait]
impl<C: ScanService> ScanService for CachingScanService<C> {
    async fn current_user(&self) -> Result<UserRef> {
        self.inner.current_user().await
    }

    async fn notifications_for_user(
        &self,
        user: &UserRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>> {
        self.inner.notifications_for_user(user, start, end).await
    }

    async fn component_version(&self, url: &str) -> Result<ComponentVersion> {
        if let Some(cached) = self.component_versions.get(url) {
            return Ok(cached.clone());
        }
        let component_version = self.inner.component_version(url).await?;
        self.component_versions
            .insert(url.to_string(), component_version.clone());
        Ok(component_version)
    }

    async fn origins(&self, component_version: &ComponentVersion) -> Result<Vec<Origin>> {
        if let Some(cached) = self.origins.get(&component_version.url) {
            return Ok(cached.clone());
        }
        let origins = self.inner.origins(component_version).await?;
        self.origins
            .insert(component_version.url.clone(), origins.clone());
        Ok(origins)
    }

    async fn vulnerabilities(
        &self,
        component_version: &ComponentVersion,
    ) -> Result<Vec<Vulnerability>> {
        self.inner.vulnerabilities(component_version).await
    }

    async fn policy_status(&self, url: &str) -> Result<PolicyStatus> {
        self.inner.policy_status(url).await
    }

    async fn find_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<Option<ProjectVersion>> {
        self.inner
            .find_project_version(project_name, version_name)
            .await
    }

    async fn get_or_create_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<ProjectVersion> {
        self.inner
            .get_or_create_project_version(project_name, version_name)
            .await
    }

    async fn add_component_to_project_version(
        &self,
        coordinate: &Coordinate,
        project_version: &ProjectVersion,
    ) -> Result<BomComponent> {
        self.inner
            .add_component_to_project_version(coordinate, project_version)
            .await
    }
}
