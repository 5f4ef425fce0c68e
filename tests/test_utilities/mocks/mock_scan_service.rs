use async_trait::async_trait;
use bom_inspector::inspection::domain::{
    BomComponent, ComponentVersion, Origin, ProjectVersion, Vulnerability,
    VulnerabilityAggregate,
};
use bom_inspector::ports::outbound::{NotificationRecord, UserRef};
use bom_inspector::prelude::*;
use bom_inspector::shared::error::InspectionError;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Mock ScanService for testing
///
/// Serves canned data and records every call as `operation` or
/// `operation:argument` so tests can assert on remote traffic.
#[derive(Default)]
pub struct MockScanService {
    notifications: Mutex<Vec<NotificationRecord>>,
    origins: HashMap<String, Vec<Origin>>,
    policy_statuses: HashMap<String, PolicyStatus>,
    vulnerabilities: HashMap<String, Vec<Vulnerability>>,
    project_versions: Mutex<HashMap<(String, String), ProjectVersion>>,
    failing_operations: Mutex<HashSet<String>>,
    unknown_components: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockScanService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(
        mut self,
        component_version_url: &str,
        forge: &str,
        origin_id: &str,
    ) -> Self {
        self.origins
            .entry(component_version_url.to_string())
            .or_default()
            .push(Origin::new(forge, origin_id));
        self
    }

    pub fn with_policy_status(mut self, url: &str, status: PolicyStatus) -> Self {
        self.policy_statuses.insert(url.to_string(), status);
        self
    }

    pub fn with_vulnerabilities(
        mut self,
        component_version_url: &str,
        vulnerabilities: Vec<Vulnerability>,
    ) -> Self {
        self.vulnerabilities
            .insert(component_version_url.to_string(), vulnerabilities);
        self
    }

    /// `add_component` fails for this origin id
    pub fn with_unknown_component(mut self, origin_id: &str) -> Self {
        self.unknown_components.insert(origin_id.to_string());
        self
    }

    pub fn push_notification(&self, record: NotificationRecord) {
        self.notifications.lock().unwrap().push(record);
    }

    pub fn fail_operation(&self, operation: &str) {
        self.failing_operations
            .lock()
            .unwrap()
            .insert(operation.to_string());
    }

    pub fn heal(&self) {
        self.failing_operations.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    fn record(&self, operation: &str, argument: Option<&str>) -> Result<()> {
        let call = match argument {
            Some(argument) => format!("{}:{}", operation, argument),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(call);
        if self.failing_operations.lock().unwrap().contains(operation) {
            return Err(InspectionError::remote(operation, "simulated outage").into());
        }
        Ok(())
    }

    fn project_version(name: &str, version: &str) -> ProjectVersion {
        ProjectVersion {
            project_name: name.to_string(),
            version_name: version.to_string(),
            url: format!("https://bom.test/api/projects/{}/versions/{}", name, version),
            ui_url: Some(format!("https://bom.test/ui/projects/{}/versions/{}", name, version)),
        }
    }
}

#[async_trait]
impl ScanService for MockScanService {
    async fn current_user(&self) -> Result<UserRef> {
        self.record("current_user", None)?;
        Ok(UserRef {
            user_name: "inspector".to_string(),
            url: "https://bom.test/api/users/7".to_string(),
        })
    }

    async fn notifications_for_user(
        &self,
        _user: &UserRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>> {
        self.record("notifications", None)?;
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.created_at > start && n.created_at <= end)
            .cloned()
            .collect())
    }

    async fn component_version(&self, url: &str) -> Result<ComponentVersion> {
        self.record("component_version", Some(url))?;
        Ok(ComponentVersion::new(url))
    }

    async fn origins(&self, component_version: &ComponentVersion) -> Result<Vec<Origin>> {
        self.record("origins", Some(&component_version.url))?;
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
        self.record("vulnerabilities", Some(&component_version.url))?;
        Ok(self
            .vulnerabilities
            .get(&component_version.url)
            .cloned()
            .unwrap_or_default())
    }

    async fn policy_status(&self, url: &str) -> Result<PolicyStatus> {
        self.record("policy_status", Some(url))?;
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
        self.record("find_project_version", Some(project_name))?;
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
        self.record("get_or_create_project_version", Some(project_name))?;
        Ok(self
            .project_versions
            .lock()
            .unwrap()
            .entry((project_name.to_string(), version_name.to_string()))
            .or_insert_with(|| Self::project_version(project_name, version_name))
            .clone())
    }

    async fn add_component_to_project_version(
        &self,
        coordinate: &Coordinate,
        _project_version: &ProjectVersion,
    ) -> Result<BomComponent> {
        let origin_id = coordinate.origin_id();
        self.record("add_component", Some(&origin_id))?;
        if self.unknown_components.contains(&origin_id) {
            return Err(InspectionError::remote("add_component", "component not found").into());
        }
        Ok(BomComponent {
            component_version_url: format!("https://bom.test/api/components/{}", origin_id),
            policy_status: Some(PolicyStatus::NotInViolation),
            vulnerabilities: VulnerabilityAggregate::default(),
        })
    }
}
