//! Shared fakes for use-case unit tests.

use crate::adapters::outbound::storage::InMemoryRepositoryStore;
use crate::inspection::domain::{
    BomComponent, ComponentVersion, Coordinate, Origin, PolicyStatus, ProjectVersion, RepoPath,
    Vulnerability, VulnerabilityAggregate,
};
use crate::ports::outbound::{LayoutInfo, NotificationRecord, ScanService, UserRef};
use crate::shared::error::InspectionError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeScanService {
    pub notifications: Vec<NotificationRecord>,
    pub fail_notifications: bool,
    pub origins: HashMap<String, Vec<Origin>>,
    pub policy_statuses: HashMap<String, PolicyStatus>,
    pub vulnerabilities: HashMap<String, Vec<Vulnerability>>,
    pub project_versions: Mutex<HashMap<(String, String), ProjectVersion>>,
    pub failing_origin_ids: HashSet<String>,
    pub registered: Mutex<Vec<String>>,
}

impl FakeScanService {
    pub fn with_project(self, name: &str, version: &str) -> Self {
        self.project_versions
            .lock()
            .unwrap()
            .insert((name.to_string(), version.to_string()), project_version(name, version));
        self
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }
}

pub fn project_version(name: &str, version: &str) -> ProjectVersion {
    ProjectVersion {
        project_name: name.to_string(),
        version_name: version.to_string(),
        url: format!("https://bom/api/projects/{}/versions/{}", name, version),
        ui_url: Some(format!("https://bom/ui/{}/{}", name, version)),
    }
}

#[async_trait]
impl ScanService for FakeScanService {
    async fn current_user(&self) -> Result<UserRef> {
        Ok(UserRef {
            user_name: "svc".to_string(),
            url: "https://bom/api/users/1".to_string(),
        })
    }

    async fn notifications_for_user(
        &self,
        _user: &UserRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>> {
        if self.fail_notifications {
            return Err(InspectionError::remote("notifications", "503 Service Unavailable").into());
        }
        Ok(self
            .notifications
            .iter()
            .filter(|n| n.created_at > start && n.created_at <= end)
            .cloned()
            .collect())
    }

    async fn component_version(&self, url: &str) -> Result<ComponentVersion> {
        Ok(ComponentVersion::new(url))
    }

    async fn origins(&self, component_version: &ComponentVersion) -> Result<Vec<Origin>> {
        Ok(self
            .origins
            .get(&component_version.url)
            .cloned()
            .unwrap_or_default())
    }

    async fn vulnerabilities(
        &self,
        component_version: &ComponentVersion,
    ) -> Result<Vec<Vulnerability>> {
        Ok(self
            .vulnerabilities
            .get(&component_version.url)
            .cloned()
            .unwrap_or_default())
    }

    async fn policy_status(&self, url: &str) -> Result<PolicyStatus> {
        self.policy_statuses
            .get(url)
            .copied()
            .ok_or_else(|| InspectionError::remote("policy_status", "404 Not Found").into())
    }

    async fn find_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<Option<ProjectVersion>> {
        Ok(self
            .project_versions
            .lock()
            .unwrap()
            .get(&(project_name.to_string(), version_name.to_string()))
            .cloned())
    }

    async fn get_or_create_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<ProjectVersion> {
        let mut versions = self.project_versions.lock().unwrap();
        Ok(versions
            .entry((project_name.to_string(), version_name.to_string()))
            .or_insert_with(|| project_version(project_name, version_name))
            .clone())
    }

    async fn add_component_to_project_version(
        &self,
        coordinate: &Coordinate,
        _project_version: &ProjectVersion,
    ) -> Result<BomComponent> {
        let origin_id = coordinate.origin_id();
        if self.failing_origin_ids.contains(&origin_id) {
            return Err(InspectionError::remote("add_component", "component not found").into());
        }
        self.registered.lock().unwrap().push(origin_id.clone());
        Ok(BomComponent {
            component_version_url: format!("https://bom/api/components/{}", origin_id),
            policy_status: Some(PolicyStatus::NotInViolation),
            vulnerabilities: VulnerabilityAggregate::new(0, 0, 1, 0),
        })
    }
}

/// A maven repository with one artifact per (group, name, version)
pub fn maven_store(
    repo_key: &str,
    artifacts: &[(&str, &str, &str)],
) -> (InMemoryRepositoryStore, Vec<RepoPath>) {
    let store = InMemoryRepositoryStore::new();
    store.add_repository(repo_key, Some("maven"));
    let mut paths = Vec::new();
    for (group, name, version) in artifacts {
        let path = RepoPath::new(
            repo_key,
            format!("{}/{}/{}/{}-{}.jar", group.replace('.', "/"), name, version, name, version),
        );
        store.add_artifact(
            path.clone(),
            LayoutInfo {
                organization: Some(group.to_string()),
                module: Some(name.to_string()),
                base_revision: Some(version.to_string()),
            },
        );
        paths.push(path);
    }
    (store, paths)
}
