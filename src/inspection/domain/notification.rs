use chrono::{DateTime, Utc};

use super::component::ComponentVersion;
use super::status::PolicyStatus;
use super::vulnerability::VulnerabilityAggregate;

/// Project name + version name pair, the join key between notifications and repositories
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameVersion {
    pub name: String,
    pub version: String,
}

impl NameVersion {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `name:version` index key
    pub fn key(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

/// Policy approval change for one component version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatusNotification {
    pub created_at: DateTime<Utc>,
    pub affected_project_versions: Vec<NameVersion>,
    pub component_version: ComponentVersion,
    pub policy_status: PolicyStatus,
}

/// Vulnerability change for one component version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityNotification {
    pub created_at: DateTime<Utc>,
    pub affected_project_versions: Vec<NameVersion>,
    pub component_version: ComponentVersion,
    pub vulnerabilities: VulnerabilityAggregate,
}

/// A notification the reconciler knows how to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PolicyStatus(PolicyStatusNotification),
    PolicyOverride(PolicyStatusNotification),
    VulnerabilityUpdate(VulnerabilityNotification),
}

impl Notification {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Notification::PolicyStatus(n) | Notification::PolicyOverride(n) => n.created_at,
            Notification::VulnerabilityUpdate(n) => n.created_at,
        }
    }

    pub fn affected_project_versions(&self) -> &[NameVersion] {
        match self {
            Notification::PolicyStatus(n) | Notification::PolicyOverride(n) => {
                &n.affected_project_versions
            }
            Notification::VulnerabilityUpdate(n) => &n.affected_project_versions,
        }
    }

    pub fn component_version(&self) -> &ComponentVersion {
        match self {
            Notification::PolicyStatus(n) | Notification::PolicyOverride(n) => {
                &n.component_version
            }
            Notification::VulnerabilityUpdate(n) => &n.component_version,
        }
    }

    pub fn is_policy(&self) -> bool {
        !matches!(self, Notification::VulnerabilityUpdate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_version_key() {
        assert_eq!(NameVersion::new("P", "1.0").key(), "P:1.0");
    }

    #[test]
    fn test_accessors_dispatch_per_variant() {
        let created_at = Utc::now();
        let notification = Notification::PolicyOverride(PolicyStatusNotification {
            created_at,
            affected_project_versions: vec![NameVersion::new("P", "1.0")],
            component_version: ComponentVersion::new("https://bom/cv/1"),
            policy_status: PolicyStatus::InViolationOverridden,
        });
        assert_eq!(notification.created_at(), created_at);
        assert_eq!(notification.affected_project_versions().len(), 1);
        assert_eq!(notification.component_version().url, "https://bom/cv/1");
        assert!(notification.is_policy());
    }
}
