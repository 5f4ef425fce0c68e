use super::status::PolicyStatus;
use super::vulnerability::VulnerabilityAggregate;

/// A component version resource on the scanning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentVersion {
    pub url: String,
    pub origins_url: Option<String>,
    pub vulnerabilities_url: Option<String>,
}

impl ComponentVersion {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            origins_url: None,
            vulnerabilities_url: None,
        }
    }
}

/// Ecosystem-specific identity of a component version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    pub forge: String,
    pub origin_id: String,
}

impl Origin {
    pub fn new(forge: impl Into<String>, origin_id: impl Into<String>) -> Self {
        Self {
            forge: forge.into(),
            origin_id: origin_id.into(),
        }
    }
}

/// Handle to a project version a repository's artifacts are registered against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion {
    pub project_name: String,
    pub version_name: String,
    pub url: String,
    pub ui_url: Option<String>,
}

/// What the scanning service reports after registering a component in a BOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomComponent {
    pub component_version_url: String,
    pub policy_status: Option<PolicyStatus>,
    pub vulnerabilities: VulnerabilityAggregate,
}
