use crate::inspection::domain::{
    BomComponent, ComponentVersion, Coordinate, NameVersion, Origin, PolicyStatus,
    ProjectVersion, Vulnerability,
};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The service account the notifications are read for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub user_name: String,
    pub url: String,
}

/// Component version link plus the policy status resource that applies to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentVersionStatus {
    pub component_version_url: String,
    pub policy_status_url: String,
}

/// Notification payload as delivered by the scanning service
///
/// Only links are carried; the reconciler dereferences them after filtering
/// out notifications for project versions nobody tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationContent {
    RuleViolation {
        project: NameVersion,
        component_version_statuses: Vec<ComponentVersionStatus>,
    },
    RuleViolationCleared {
        project: NameVersion,
        component_version_statuses: Vec<ComponentVersionStatus>,
    },
    PolicyOverride {
        project: NameVersion,
        status: ComponentVersionStatus,
    },
    Vulnerability {
        affected_project_versions: Vec<NameVersion>,
        component_version_url: String,
    },
    /// Any notification type the reconciler does not act on
    Other { kind: String },
}

impl NotificationContent {
    pub fn kind(&self) -> &str {
        match self {
            NotificationContent::RuleViolation { .. } => "RULE_VIOLATION",
            NotificationContent::RuleViolationCleared { .. } => "RULE_VIOLATION_CLEARED",
            NotificationContent::PolicyOverride { .. } => "POLICY_OVERRIDE",
            NotificationContent::Vulnerability { .. } => "VULNERABILITY",
            NotificationContent::Other { kind } => kind,
        }
    }

    /// Project versions the notification concerns
    pub fn project_versions(&self) -> Vec<&NameVersion> {
        match self {
            NotificationContent::RuleViolation { project, .. }
            | NotificationContent::RuleViolationCleared { project, .. }
            | NotificationContent::PolicyOverride { project, .. } => vec![project],
            NotificationContent::Vulnerability {
                affected_project_versions,
                ..
            } => affected_project_versions.iter().collect(),
            NotificationContent::Other { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub created_at: DateTime<Utc>,
    pub content: NotificationContent,
}

/// ScanService port for the remote scanning service
///
/// All methods are async; every call is a network round trip and
/// implementations are expected to bound it with a timeout.
#[async_trait]
pub trait ScanService: Send + Sync {
    async fn current_user(&self) -> Result<UserRef>;

    /// Notifications created in `(start, end]`
    async fn notifications_for_user(
        &self,
        user: &UserRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>>;

    async fn component_version(&self, url: &str) -> Result<ComponentVersion>;

    async fn origins(&self, component_version: &ComponentVersion) -> Result<Vec<Origin>>;

    async fn vulnerabilities(&self, component_version: &ComponentVersion)
        -> Result<Vec<Vulnerability>>;

    async fn policy_status(&self, url: &str) -> Result<PolicyStatus>;

    /// Looks up an existing project version without creating it
    async fn find_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<Option<ProjectVersion>>;

    async fn get_or_create_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<ProjectVersion>;

    /// Registers a component in the project version's BOM
    ///
    /// # Returns
    /// The component-version link with its current policy and vulnerability state
    async fn add_component_to_project_version(
        &self,
        coordinate: &Coordinate,
        project_version: &ProjectVersion,
    ) -> Result<BomComponent>;
}
