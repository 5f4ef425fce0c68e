use super::status::PolicyStatus;
use super::vulnerability::VulnerabilityAggregate;

/// Per-artifact policy and vulnerability state derived from notifications.
///
/// Every field is optional and merged independently: a policy notification
/// touches only `policy_status`, a vulnerability notification only
/// `vulnerabilities`. Fields left `None` are not written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyVulnerabilityAggregate {
    pub policy_status: Option<PolicyStatus>,
    pub vulnerabilities: Option<VulnerabilityAggregate>,
    pub component_version_url: Option<String>,
}

impl PolicyVulnerabilityAggregate {
    pub fn merge_policy(&mut self, status: PolicyStatus, component_version_url: &str) {
        self.policy_status = Some(status);
        self.component_version_url = Some(component_version_url.to_string());
    }

    pub fn merge_vulnerabilities(
        &mut self,
        vulnerabilities: VulnerabilityAggregate,
        component_version_url: &str,
    ) {
        self.vulnerabilities = Some(vulnerabilities);
        self.component_version_url = Some(component_version_url.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.policy_status.is_none()
            && self.vulnerabilities.is_none()
            && self.component_version_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://bom.example.com/api/components/c1/versions/v1";

    #[test]
    fn test_policy_merge_leaves_vulnerabilities_untouched() {
        let mut aggregate = PolicyVulnerabilityAggregate::default();
        aggregate.merge_policy(PolicyStatus::InViolation, URL);
        assert_eq!(aggregate.policy_status, Some(PolicyStatus::InViolation));
        assert!(aggregate.vulnerabilities.is_none());
        assert_eq!(aggregate.component_version_url.as_deref(), Some(URL));
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let vulnerabilities = VulnerabilityAggregate::new(0, 1, 2, 3);

        let mut first = PolicyVulnerabilityAggregate::default();
        first.merge_vulnerabilities(vulnerabilities, URL);
        first.merge_policy(PolicyStatus::NotInViolation, URL);

        let mut second = PolicyVulnerabilityAggregate::default();
        second.merge_policy(PolicyStatus::NotInViolation, URL);
        second.merge_vulnerabilities(vulnerabilities, URL);

        assert_eq!(first, second);
    }

    #[test]
    fn test_replaying_vulnerabilities_does_not_double_count() {
        let vulnerabilities = VulnerabilityAggregate::new(1, 0, 0, 0);
        let mut aggregate = PolicyVulnerabilityAggregate::default();
        aggregate.merge_vulnerabilities(vulnerabilities, URL);
        let once = aggregate.clone();
        aggregate.merge_vulnerabilities(vulnerabilities, URL);
        assert_eq!(aggregate, once);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(PolicyVulnerabilityAggregate::default().is_empty());
    }
}
