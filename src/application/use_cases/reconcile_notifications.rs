use crate::application::dto::ReconcileReport;
use crate::application::services::PropertyStore;
use crate::inspection::domain::{
    NameVersion, Notification, PolicyStatusNotification, RepoPath, VulnerabilityAggregate,
    VulnerabilityNotification,
};
use crate::inspection::services::AggregateBook;
use crate::ports::outbound::{
    ComponentVersionStatus, NotificationContent, NotificationRecord, RepositoryStore, ScanService,
};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// ReconcileNotificationsUseCase - Turns a notification window into artifact metadata
///
/// Notifications name remote project versions, not artifacts. The join goes
/// through the `name:version` pair each repository persisted at registration,
/// then through the origin ids stored on its artifacts.
///
/// Any remote failure fails the whole window so the caller keeps its checkpoint.
pub struct ReconcileNotificationsUseCase<S: RepositoryStore, C: ScanService> {
    properties: PropertyStore<S>,
    scan_service: Arc<C>,
}

impl<S: RepositoryStore, C: ScanService> ReconcileNotificationsUseCase<S, C> {
    pub fn new(properties: PropertyStore<S>, scan_service: Arc<C>) -> Self {
        Self {
            properties,
            scan_service,
        }
    }

    /// Processes notifications created in `(start, end]` for the given repositories
    ///
    /// # Returns
    /// Counts of what was applied and the latest `created_at` seen in the
    /// window, the candidate for the next checkpoint
    pub async fn execute(
        &self,
        repo_keys: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReconcileReport> {
        // Step 1: Fetch the window
        let user = self.scan_service.current_user().await?;
        let records = self
            .scan_service
            .notifications_for_user(&user, start, end)
            .await?;
        let latest_created_at = records.iter().map(|r| r.created_at).max();

        // Step 2: name:version -> repositories registered under it
        let index = self.project_index(repo_keys)?;

        // Step 3: Classify, dropping untracked projects before any remote lookup
        let mut notifications = Vec::new();
        for record in &records {
            if let NotificationContent::Other { kind } = &record.content {
                debug!(kind = %kind, "Ignoring notification type");
                continue;
            }
            let tracked = record
                .content
                .project_versions()
                .into_iter()
                .any(|pv| index.contains_key(&pv.key()));
            if !tracked {
                debug!(
                    kind = record.content.kind(),
                    "Notification concerns no tracked project version"
                );
                continue;
            }
            notifications.extend(self.expand(record).await?);
        }
        notifications.sort_by_key(Notification::created_at);

        // Step 4-5: Join to artifacts and merge per artifact
        let mut book = AggregateBook::new();
        for notification in &notifications {
            let repos = affected_repositories(&index, notification.affected_project_versions());
            let artifacts = self.find_affected_artifacts(notification, &repos).await?;
            book.apply(notification, &artifacts);
        }

        // Step 6: One write per artifact
        let artifacts_updated = book.len();
        for (path, aggregate) in book.into_entries() {
            self.properties
                .set_policy_and_vulnerabilities(&path, &aggregate)?;
        }

        info!(
            notifications = records.len(),
            applied = notifications.len(),
            artifacts_updated,
            "Notification window reconciled"
        );

        Ok(ReconcileReport {
            notifications_seen: records.len(),
            notifications_applied: notifications.len(),
            artifacts_updated,
            latest_created_at,
        })
    }

    fn project_index(&self, repo_keys: &[String]) -> Result<HashMap<String, Vec<String>>> {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for repo_key in repo_keys {
            match self.properties.project(repo_key)? {
                Some(project) => index.entry(project.key()).or_default().push(repo_key.clone()),
                None => {
                    debug!(repo_key = %repo_key, "Repository has no registered project version")
                }
            }
        }
        Ok(index)
    }

    /// Dereferences the links of a record into domain notifications
    async fn expand(&self, record: &NotificationRecord) -> Result<Vec<Notification>> {
        let created_at = record.created_at;
        match &record.content {
            NotificationContent::RuleViolation {
                project,
                component_version_statuses,
            }
            | NotificationContent::RuleViolationCleared {
                project,
                component_version_statuses,
            } => {
                let mut expanded = Vec::with_capacity(component_version_statuses.len());
                for status in component_version_statuses {
                    let notification = self.policy_notification(created_at, project, status).await?;
                    expanded.push(Notification::PolicyStatus(notification));
                }
                Ok(expanded)
            }
            NotificationContent::PolicyOverride { project, status } => {
                let notification = self.policy_notification(created_at, project, status).await?;
                Ok(vec![Notification::PolicyOverride(notification)])
            }
            NotificationContent::Vulnerability {
                affected_project_versions,
                component_version_url,
            } => {
                let component_version = self
                    .scan_service
                    .component_version(component_version_url)
                    .await?;
                let vulnerabilities = self.scan_service.vulnerabilities(&component_version).await?;
                Ok(vec![Notification::VulnerabilityUpdate(
                    VulnerabilityNotification {
                        created_at,
                        affected_project_versions: affected_project_versions.clone(),
                        component_version,
                        vulnerabilities: VulnerabilityAggregate::from_vulnerabilities(
                            &vulnerabilities,
                        ),
                    },
                )])
            }
            NotificationContent::Other { .. } => Ok(Vec::new()),
        }
    }

    async fn policy_notification(
        &self,
        created_at: DateTime<Utc>,
        project: &NameVersion,
        status: &ComponentVersionStatus,
    ) -> Result<PolicyStatusNotification> {
        let component_version = self
            .scan_service
            .component_version(&status.component_version_url)
            .await?;
        let policy_status = self
            .scan_service
            .policy_status(&status.policy_status_url)
            .await?;

        Ok(PolicyStatusNotification {
            created_at,
            affected_project_versions: vec![project.clone()],
            component_version,
            policy_status,
        })
    }

    async fn find_affected_artifacts(
        &self,
        notification: &Notification,
        repo_keys: &[String],
    ) -> Result<Vec<RepoPath>> {
        if repo_keys.is_empty() {
            return Ok(Vec::new());
        }

        let origins = self
            .scan_service
            .origins(notification.component_version())
            .await?;

        let mut artifacts = Vec::new();
        for origin in origins {
            artifacts.extend(self.properties.paths_with_origin(
                repo_keys,
                &origin.forge,
                &origin.origin_id,
            )?);
        }
        artifacts.sort();
        artifacts.dedup();
        Ok(artifacts)
    }
}

fn affected_repositories(
    index: &HashMap<String, Vec<String>>,
    project_versions: &[NameVersion],
) -> Vec<String> {
    let mut repos: Vec<String> = project_versions
        .iter()
        .filter_map(|pv| index.get(&pv.key()))
        .flatten()
        .cloned()
        .collect();
    repos.sort();
    repos.dedup();
    repos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryRepositoryStore;
    use crate::application::use_cases::test_support::{project_version, FakeScanService};
    use crate::inspection::domain::{
        Coordinate, Forge, InspectionStatus, Origin, PolicyStatus, Severity, Vulnerability,
    };
    use crate::ports::outbound::LayoutInfo;
    use chrono::TimeZone;

    const CV: &str = "https://bom/api/components/c1/versions/v1";
    const POLICY: &str = "https://bom/api/policy-status/p1";

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn setup() -> (PropertyStore<InMemoryRepositoryStore>, RepoPath) {
        let store = InMemoryRepositoryStore::new();
        store.add_repository("npm-remote", Some("npm"));
        let path = RepoPath::new("npm-remote", "pkg/-/pkg-1.0.tgz");
        store.add_artifact(path.clone(), LayoutInfo::default());

        let properties = PropertyStore::new(Arc::new(store));
        properties
            .set_project("npm-remote", &project_version("P", "1.0"))
            .unwrap();
        properties
            .set_coordinate(&path, &Coordinate::name_version(Forge::Npmjs, "pkg", "1.0").unwrap())
            .unwrap();
        properties
            .set_inspection_status(&path, InspectionStatus::Success)
            .unwrap();
        (properties, path)
    }

    fn scan_service(records: Vec<NotificationRecord>) -> FakeScanService {
        let mut scan = FakeScanService {
            notifications: records,
            ..FakeScanService::default()
        };
        scan.origins
            .insert(CV.to_string(), vec![Origin::new("npmjs", "pkg@1.0")]);
        scan.policy_statuses
            .insert(POLICY.to_string(), PolicyStatus::InViolation);
        scan.vulnerabilities.insert(
            CV.to_string(),
            vec![
                Vulnerability::new("CVE-1", Severity::Critical),
                Vulnerability::new("CVE-2", Severity::Low),
            ],
        );
        scan
    }

    fn rule_violation(
        created_at: DateTime<Utc>,
        project: &str,
        version: &str,
    ) -> NotificationRecord {
        NotificationRecord {
            created_at,
            content: NotificationContent::RuleViolation {
                project: NameVersion::new(project, version),
                component_version_statuses: vec![ComponentVersionStatus {
                    component_version_url: CV.to_string(),
                    policy_status_url: POLICY.to_string(),
                }],
            },
        }
    }

    fn vulnerability(created_at: DateTime<Utc>) -> NotificationRecord {
        NotificationRecord {
            created_at,
            content: NotificationContent::Vulnerability {
                affected_project_versions: vec![NameVersion::new("P", "1.0")],
                component_version_url: CV.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_policy_notification_sets_only_policy_fields() {
        let (properties, path) = setup();
        let scan = Arc::new(scan_service(vec![rule_violation(at(2), "P", "1.0")]));
        let use_case = ReconcileNotificationsUseCase::new(properties.clone(), scan);

        let report = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await
            .unwrap();

        assert_eq!(report.artifacts_updated, 1);
        assert_eq!(report.latest_created_at, Some(at(2)));
        assert_eq!(
            properties.policy_status(&path).unwrap(),
            Some(PolicyStatus::InViolation)
        );
        assert_eq!(properties.vulnerabilities(&path).unwrap(), None);
    }

    #[tokio::test]
    async fn test_both_variants_merge_into_one_aggregate() {
        let (properties, path) = setup();
        let scan = Arc::new(scan_service(vec![
            vulnerability(at(3)),
            rule_violation(at(1), "P", "1.0"),
        ]));
        let use_case = ReconcileNotificationsUseCase::new(properties.clone(), scan);

        let report = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await
            .unwrap();

        assert_eq!(report.notifications_applied, 2);
        assert_eq!(report.latest_created_at, Some(at(3)));
        assert_eq!(
            properties.policy_status(&path).unwrap(),
            Some(PolicyStatus::InViolation)
        );
        assert_eq!(
            properties.vulnerabilities(&path).unwrap(),
            Some(VulnerabilityAggregate::new(1, 0, 0, 1))
        );
    }

    #[tokio::test]
    async fn test_untracked_project_contributes_nothing() {
        let (properties, path) = setup();
        let scan = Arc::new(scan_service(vec![rule_violation(at(2), "Other", "9.9")]));
        let use_case = ReconcileNotificationsUseCase::new(properties.clone(), scan);

        let report = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await
            .unwrap();

        assert_eq!(report.notifications_applied, 0);
        assert_eq!(report.latest_created_at, Some(at(2)));
        assert_eq!(properties.policy_status(&path).unwrap(), None);
    }

    #[tokio::test]
    async fn test_unrecognized_notifications_are_ignored() {
        let (properties, _) = setup();
        let scan = Arc::new(scan_service(vec![NotificationRecord {
            created_at: at(4),
            content: NotificationContent::Other {
                kind: "PROJECT_VERSION".to_string(),
            },
        }]));
        let use_case = ReconcileNotificationsUseCase::new(properties, scan);

        let report = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await
            .unwrap();
        assert_eq!(report.notifications_seen, 1);
        assert_eq!(report.artifacts_updated, 0);
    }

    #[tokio::test]
    async fn test_empty_window_has_no_candidate_checkpoint() {
        let (properties, _) = setup();
        let use_case =
            ReconcileNotificationsUseCase::new(properties, Arc::new(scan_service(vec![])));

        let report = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await
            .unwrap();
        assert_eq!(report.latest_created_at, None);
    }

    #[tokio::test]
    async fn test_remote_failure_fails_window() {
        let (properties, path) = setup();
        let mut scan = scan_service(vec![rule_violation(at(2), "P", "1.0")]);
        scan.policy_statuses.clear();
        let use_case = ReconcileNotificationsUseCase::new(properties.clone(), Arc::new(scan));

        let result = use_case
            .execute(&["npm-remote".to_string()], at(0), at(12))
            .await;
        assert!(result.is_err());
        assert_eq!(properties.policy_status(&path).unwrap(), None);
    }
}
