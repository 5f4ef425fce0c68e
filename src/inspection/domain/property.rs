/// Prefix shared by every property this tool writes
pub const PROPERTY_PREFIX: &str = "bomsync.";

/// Typed key namespace for persisted inspection state.
///
/// Values are strings in the host store; `PropertyStore` is the only place
/// that converts them to and from typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectionProperty {
    InspectionStatus,
    InspectionStatusMessage,
    InspectionRetryCount,
    Forge,
    OriginId,
    ProjectName,
    ProjectVersionName,
    LastInspection,
    LastUpdate,
    UpdateStatus,
    PolicyStatus,
    CriticalVulnerabilities,
    HighVulnerabilities,
    MediumVulnerabilities,
    LowVulnerabilities,
    ComponentVersionUrl,
    ProjectVersionUiUrl,
}

impl InspectionProperty {
    pub const ALL: [InspectionProperty; 17] = [
        InspectionProperty::InspectionStatus,
        InspectionProperty::InspectionStatusMessage,
        InspectionProperty::InspectionRetryCount,
        InspectionProperty::Forge,
        InspectionProperty::OriginId,
        InspectionProperty::ProjectName,
        InspectionProperty::ProjectVersionName,
        InspectionProperty::LastInspection,
        InspectionProperty::LastUpdate,
        InspectionProperty::UpdateStatus,
        InspectionProperty::PolicyStatus,
        InspectionProperty::CriticalVulnerabilities,
        InspectionProperty::HighVulnerabilities,
        InspectionProperty::MediumVulnerabilities,
        InspectionProperty::LowVulnerabilities,
        InspectionProperty::ComponentVersionUrl,
        InspectionProperty::ProjectVersionUiUrl,
    ];

    /// Fully-qualified key as stored in the host repository manager
    pub fn key(self) -> &'static str {
        match self {
            InspectionProperty::InspectionStatus => "bomsync.inspectionStatus",
            InspectionProperty::InspectionStatusMessage => "bomsync.inspectionStatusMessage",
            InspectionProperty::InspectionRetryCount => "bomsync.inspectionRetryCount",
            InspectionProperty::Forge => "bomsync.forge",
            InspectionProperty::OriginId => "bomsync.originId",
            InspectionProperty::ProjectName => "bomsync.projectName",
            InspectionProperty::ProjectVersionName => "bomsync.projectVersionName",
            InspectionProperty::LastInspection => "bomsync.lastInspection",
            InspectionProperty::LastUpdate => "bomsync.lastUpdate",
            InspectionProperty::UpdateStatus => "bomsync.updateStatus",
            InspectionProperty::PolicyStatus => "bomsync.policyStatus",
            InspectionProperty::CriticalVulnerabilities => "bomsync.criticalVulnerabilities",
            InspectionProperty::HighVulnerabilities => "bomsync.highVulnerabilities",
            InspectionProperty::MediumVulnerabilities => "bomsync.mediumVulnerabilities",
            InspectionProperty::LowVulnerabilities => "bomsync.lowVulnerabilities",
            InspectionProperty::ComponentVersionUrl => "bomsync.componentVersionUrl",
            InspectionProperty::ProjectVersionUiUrl => "bomsync.projectVersionUiUrl",
        }
    }

    /// Accepts either the full key or the bare name after the prefix
    pub fn from_key(key: &str) -> Option<Self> {
        let qualified = if key.starts_with(PROPERTY_PREFIX) {
            key.to_string()
        } else {
            format!("{}{}", PROPERTY_PREFIX, key)
        };
        Self::ALL.iter().copied().find(|p| p.key() == qualified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_share_prefix() {
        for property in InspectionProperty::ALL {
            assert!(property.key().starts_with(PROPERTY_PREFIX));
        }
    }

    #[test]
    fn test_from_key_accepts_short_and_full_names() {
        assert_eq!(
            InspectionProperty::from_key("projectName"),
            Some(InspectionProperty::ProjectName)
        );
        assert_eq!(
            InspectionProperty::from_key("bomsync.lastUpdate"),
            Some(InspectionProperty::LastUpdate)
        );
        assert_eq!(InspectionProperty::from_key("npm.name"), None);
    }
}
