use crate::config::ScanServiceConfig;
use crate::inspection::domain::{
    BomComponent, ComponentVersion, Coordinate, NameVersion, Origin, PolicyStatus,
    ProjectVersion, Severity, Vulnerability, VulnerabilityAggregate,
};
use crate::ports::outbound::{
    ComponentVersionStatus, NotificationContent, NotificationRecord, ScanService, UserRef,
};
use crate::shared::error::InspectionError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Page size for list endpoints
const PAGE_SIZE: usize = 100;

// Wire types

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
}

impl Meta {
    fn link(&self, rel: &str) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel == rel)
            .map(|l| l.href.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default)]
    total_count: usize,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserView {
    user_name: String,
    #[serde(rename = "_meta", default)]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationView {
    #[serde(rename = "type")]
    kind: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusLinkView {
    component_version: String,
    bom_component_version_policy_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleViolationContent {
    project_name: String,
    project_version_name: String,
    #[serde(default)]
    component_version_statuses: Vec<StatusLinkView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyOverrideContent {
    project_name: String,
    project_version_name: String,
    #[serde(flatten)]
    status: StatusLinkView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AffectedProjectVersion {
    project_name: String,
    project_version_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnerabilityContent {
    #[serde(default)]
    affected_project_versions: Vec<AffectedProjectVersion>,
    component_version: String,
}

#[derive(Debug, Deserialize)]
struct ResourceView {
    #[serde(rename = "_meta", default)]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OriginView {
    origin_name: String,
    origin_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnerabilityView {
    name: String,
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyStatusView {
    approval_status: String,
}

#[derive(Debug, Deserialize)]
struct ProjectView {
    name: String,
    #[serde(rename = "_meta", default)]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionView {
    version_name: String,
    #[serde(rename = "_meta", default)]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct ComponentMatchView {
    version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionRequest<'a> {
    version_name: &'a str,
    phase: &'a str,
    distribution: &'a str,
}

impl<'a> VersionRequest<'a> {
    fn new(version_name: &'a str) -> Self {
        Self {
            version_name,
            phase: "DEVELOPMENT",
            distribution: "EXTERNAL",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRequest<'a> {
    name: &'a str,
    version_request: VersionRequest<'a>,
}

#[derive(Debug, Serialize)]
struct ComponentRequest<'a> {
    component: &'a str,
}

/// BomServiceClient adapter for the remote scanning service's JSON API
///
/// Every request carries the bearer token and is bounded by the configured
/// timeout. GET requests are retried with a short backoff; mutations are not.
///
/// Links returned by the service are only followed when they point below the
/// configured base URL, so the token is never sent to another host.
pub struct BomServiceClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    max_retries: u32,
}

impl BomServiceClient {
    /// Creates a client from the `scan_service` configuration
    ///
    /// # Errors
    /// Missing URL or API token, or an HTTP client that cannot be built
    pub fn new(config: &ScanServiceConfig) -> Result<Self> {
        let base_url = config
            .url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| InspectionError::ConfigFile {
                details: "scan_service.url is not set".to_string(),
                hint: "Add the scanning service URL to the configuration file".to_string(),
            })?;
        let api_token = config
            .resolved_api_token()
            .ok_or_else(|| InspectionError::ConfigFile {
                details: "scan_service.api_token is not set".to_string(),
                hint: format!(
                    "Set the token in the configuration file or via {}",
                    crate::config::API_TOKEN_ENV
                ),
            })?;

        let user_agent = format!("bom-inspector/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token,
            max_retries: 3,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Security: refuse links outside the service
    fn validate_link(&self, url: &str) -> Result<()> {
        let inside = url
            .strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'));
        if !inside || url.contains("/../") {
            return Err(InspectionError::remote(
                "validate_link",
                format!("Security: link '{}' is outside the scanning service", url),
            )
            .into());
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, url: &str) -> Result<T> {
        self.validate_link(url)?;
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(operation, attempt, error = %e, "Scan service request failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        let details = last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string());
        Err(InspectionError::remote(operation, details).into())
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, String> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("{} returned status code {}", url, response.status()));
        }
        response.json::<T>().await.map_err(|e| e.to_string())
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        operation: &str,
        url: &str,
        body: &B,
    ) -> Result<()> {
        self.validate_link(url)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| InspectionError::remote(operation, e))?;
        if !response.status().is_success() {
            return Err(InspectionError::remote(
                operation,
                format!("{} returned status code {}", url, response.status()),
            )
            .into());
        }
        Ok(())
    }

    /// Follows offset pagination until `totalCount` items were read
    async fn get_all<T: DeserializeOwned>(&self, operation: &str, url: &str) -> Result<Vec<T>> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        loop {
            let page_url = format!(
                "{}{}limit={}&offset={}",
                url,
                separator,
                PAGE_SIZE,
                items.len()
            );
            let page: Page<T> = self.get_json(operation, &page_url).await?;
            let received = page.items.len();
            items.extend(page.items);
            if received == 0 || items.len() >= page.total_count {
                return Ok(items);
            }
        }
    }

    async fn find_project(&self, project_name: &str) -> Result<Option<ProjectView>> {
        let url = self.api_url(&format!(
            "projects?q=name:{}",
            urlencoding::encode(project_name)
        ));
        let projects: Vec<ProjectView> = self.get_all("find_project", &url).await?;
        Ok(projects.into_iter().find(|p| p.name == project_name))
    }

    async fn find_version(
        &self,
        project: &ProjectView,
        version_name: &str,
    ) -> Result<Option<ProjectVersion>> {
        let Some(versions_url) = project.meta.link("versions") else {
            return Ok(None);
        };
        let url = format!(
            "{}?q=versionName:{}",
            versions_url,
            urlencoding::encode(version_name)
        );
        let versions: Vec<VersionView> = self.get_all("find_project_version", &url).await?;
        Ok(versions
            .into_iter()
            .find(|v| v.version_name == version_name)
            .and_then(|v| {
                let url = v.meta.href.clone()?;
                Some(ProjectVersion {
                    project_name: project.name.clone(),
                    version_name: v.version_name,
                    url,
                    ui_url: v.meta.link("ui"),
                })
            }))
    }
}

/// Policy status resource of a component version inside a project version's BOM
fn bom_policy_status_url(project_version_url: &str, component_version_url: &str) -> Option<String> {
    let (_, component_path) = component_version_url.split_once("/api/components/")?;
    Some(format!(
        "{}/components/{}/policy-status",
        project_version_url.trim_end_matches('/'),
        component_path.trim_end_matches('/')
    ))
}

fn name_version(project_name: String, version_name: String) -> NameVersion {
    NameVersion::new(project_name, version_name)
}

fn status_link(view: StatusLinkView) -> ComponentVersionStatus {
    ComponentVersionStatus {
        component_version_url: view.component_version,
        policy_status_url: view.bom_component_version_policy_status,
    }
}

/// Maps a wire notification onto the port's content type
fn parse_notification(view: NotificationView) -> Result<NotificationRecord> {
    let malformed = |e: serde_json::Error| {
        InspectionError::remote(
            "notifications",
            format!("Malformed {} notification: {}", view.kind, e),
        )
    };

    let content = match view.kind.as_str() {
        "RULE_VIOLATION" | "RULE_VIOLATION_CLEARED" => {
            let content: RuleViolationContent =
                serde_json::from_value(view.content.clone()).map_err(malformed)?;
            let project = name_version(content.project_name, content.project_version_name);
            let component_version_statuses = content
                .component_version_statuses
                .into_iter()
                .map(status_link)
                .collect();
            if view.kind == "RULE_VIOLATION" {
                NotificationContent::RuleViolation {
                    project,
                    component_version_statuses,
                }
            } else {
                NotificationContent::RuleViolationCleared {
                    project,
                    component_version_statuses,
                }
            }
        }
        "POLICY_OVERRIDE" => {
            let content: PolicyOverrideContent =
                serde_json::from_value(view.content.clone()).map_err(malformed)?;
            NotificationContent::PolicyOverride {
                project: name_version(content.project_name, content.project_version_name),
                status: status_link(content.status),
            }
        }
        "VULNERABILITY" => {
            let content: VulnerabilityContent =
                serde_json::from_value(view.content.clone()).map_err(malformed)?;
            NotificationContent::Vulnerability {
                affected_project_versions: content
                    .affected_project_versions
                    .into_iter()
                    .map(|pv| name_version(pv.project_name, pv.project_version_name))
                    .collect(),
                component_version_url: content.component_version,
            }
        }
        _ => NotificationContent::Other {
            kind: view.kind.clone(),
        },
    };

    Ok(NotificationRecord {
        created_at: view.created_at,
        content,
    })
}

/// Keeps notifications created in `(start, end]`. A notification whose content
/// cannot be parsed is kept as `Other` so it never fails the whole window.
fn notifications_in_window(
    views: Vec<NotificationView>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<NotificationRecord> {
    views
        .into_iter()
        .filter(|v| v.created_at > start && v.created_at <= end)
        .map(|view| {
            let kind = view.kind.clone();
            let created_at = view.created_at;
            parse_notification(view).unwrap_or_else(|e| {
                warn!(
                    kind = %kind,
                    created_at = %created_at,
                    error = %e,
                    "Ignoring malformed notification"
                );
                NotificationRecord {
                    created_at,
                    content: NotificationContent::Other { kind },
                }
            })
        })
        .collect()
}

fn parse_vulnerability(view: VulnerabilityView) -> Vulnerability {
    let severity = match view.severity.as_deref().map(str::parse::<Severity>) {
        Some(Ok(severity)) => severity,
        Some(Err(e)) => {
            warn!(vulnerability = %view.name, error = %e, "Unknown severity, counting as none");
            Severity::None
        }
        None => Severity::None,
    };
    Vulnerability::new(view.name, severity)
}

#[async_trait]
impl ScanService for BomServiceClient {
    async fn current_user(&self) -> Result<UserRef> {
        let user: UserView = self
            .get_json("current_user", &self.api_url("current-user"))
            .await?;
        let url = user.meta.href.ok_or_else(|| {
            InspectionError::remote("current_user", "The service did not return a user link")
        })?;
        Ok(UserRef {
            user_name: user.user_name,
            url,
        })
    }

    async fn notifications_for_user(
        &self,
        user: &UserRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>> {
        let url = format!(
            "{}/notifications?startDate={}&endDate={}",
            user.url,
            urlencoding::encode(&start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            urlencoding::encode(&end.to_rfc3339_opts(SecondsFormat::Millis, true))
        );
        let views: Vec<NotificationView> = self.get_all("notifications", &url).await?;
        Ok(notifications_in_window(views, start, end))
    }

    async fn component_version(&self, url: &str) -> Result<ComponentVersion> {
        let view: ResourceView = self.get_json("component_version", url).await?;
        Ok(ComponentVersion {
            url: url.to_string(),
            origins_url: view.meta.link("origins"),
            vulnerabilities_url: view.meta.link("vulnerabilities"),
        })
    }

    async fn origins(&self, component_version: &ComponentVersion) -> Result<Vec<Origin>> {
        let url = component_version
            .origins_url
            .clone()
            .unwrap_or_else(|| format!("{}/origins", component_version.url));
        let views: Vec<OriginView> = self.get_all("origins", &url).await?;
        Ok(views
            .into_iter()
            .map(|o| Origin::new(o.origin_name, o.origin_id))
            .collect())
    }

    async fn vulnerabilities(
        &self,
        component_version: &ComponentVersion,
    ) -> Result<Vec<Vulnerability>> {
        let url = component_version
            .vulnerabilities_url
            .clone()
            .unwrap_or_else(|| format!("{}/vulnerabilities", component_version.url));
        let views: Vec<VulnerabilityView> = self.get_all("vulnerabilities", &url).await?;
        Ok(views.into_iter().map(parse_vulnerability).collect())
    }

    async fn policy_status(&self, url: &str) -> Result<PolicyStatus> {
        let view: PolicyStatusView = self.get_json("policy_status", url).await?;
        view.approval_status
            .parse()
            .map_err(|e: String| InspectionError::remote("policy_status", e).into())
    }

    async fn find_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<Option<ProjectVersion>> {
        match self.find_project(project_name).await? {
            Some(project) => self.find_version(&project, version_name).await,
            None => Ok(None),
        }
    }

    async fn get_or_create_project_version(
        &self,
        project_name: &str,
        version_name: &str,
    ) -> Result<ProjectVersion> {
        match self.find_project(project_name).await? {
            Some(project) => {
                if let Some(existing) = self.find_version(&project, version_name).await? {
                    return Ok(existing);
                }
                let versions_url = project.meta.link("versions").ok_or_else(|| {
                    InspectionError::remote(
                        "create_project_version",
                        "Project has no versions link",
                    )
                })?;
                self.post_json(
                    "create_project_version",
                    &versions_url,
                    &VersionRequest::new(version_name),
                )
                .await?;
            }
            None => {
                let request = ProjectRequest {
                    name: project_name,
                    version_request: VersionRequest::new(version_name),
                };
                self.post_json("create_project", &self.api_url("projects"), &request)
                    .await?;
            }
        }

        self.find_project_version(project_name, version_name)
            .await?
            .ok_or_else(|| {
                InspectionError::remote(
                    "get_or_create_project_version",
                    format!(
                        "Project '{}' version '{}' not found after creation",
                        project_name, version_name
                    ),
                )
                .into()
            })
    }

    async fn add_component_to_project_version(
        &self,
        coordinate: &Coordinate,
        project_version: &ProjectVersion,
    ) -> Result<BomComponent> {
        let query = format!("{}:{}", coordinate.forge().name(), coordinate.origin_id());
        let url = self.api_url(&format!("components?q={}", urlencoding::encode(&query)));
        let matches: Page<ComponentMatchView> = self.get_json("find_component", &url).await?;
        let component_version_url = matches
            .items
            .into_iter()
            .find_map(|m| m.version)
            .ok_or_else(|| {
                InspectionError::remote(
                    "find_component",
                    format!("No component version matches {}", coordinate),
                )
            })?;

        self.post_json(
            "add_component",
            &format!("{}/components", project_version.url),
            &ComponentRequest {
                component: &component_version_url,
            },
        )
        .await?;

        let component_version = self.component_version(&component_version_url).await?;
        let vulnerabilities = self.vulnerabilities(&component_version).await?;

        // The BOM entry's policy status may not be computed yet
        let policy_url = bom_policy_status_url(&project_version.url, &component_version_url);
        let policy_status = match policy_url {
            Some(url) => match self.policy_status(&url).await {
                Ok(status) => Some(status),
                Err(e) => {
                    debug!(
                        coordinate = %coordinate,
                        error = %e,
                        "Policy status not available yet"
                    );
                    None
                }
            },
            None => None,
        };

        Ok(BomComponent {
            component_version_url,
            policy_status,
            vulnerabilities: VulnerabilityAggregate::from_vulnerabilities(&vulnerabilities),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> ScanServiceConfig {
        ScanServiceConfig {
            url: Some("https://bom.example.com/".to_string()),
            api_token: Some("token".to_string()),
            ..ScanServiceConfig::default()
        }
    }

    fn view(json: serde_json::Value) -> NotificationView {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = BomServiceClient::new(&config()).unwrap();
        assert_eq!(client.base_url, "https://bom.example.com");
        assert_eq!(client.api_url("current-user"), "https://bom.example.com/api/current-user");
    }

    #[test]
    fn test_client_requires_url() {
        let config = ScanServiceConfig {
            url: None,
            ..config()
        };
        assert!(BomServiceClient::new(&config).is_err());
    }

    #[test]
    fn test_links_outside_service_are_rejected() {
        let client = BomServiceClient::new(&config()).unwrap();
        assert!(client
            .validate_link("https://bom.example.com/api/components/1")
            .is_ok());
        assert!(client.validate_link("https://evil.example.com/api").is_err());
        assert!(client
            .validate_link("https://bom.example.com.evil.net/api")
            .is_err());
        assert!(client
            .validate_link("https://bom.example.com/api/../../etc")
            .is_err());
    }

    #[test]
    fn test_parse_rule_violation() {
        let record = parse_notification(view(serde_json::json!({
            "type": "RULE_VIOLATION",
            "createdAt": "2024-06-01T10:00:00.000Z",
            "content": {
                "projectName": "P",
                "projectVersionName": "1.0",
                "componentVersionStatuses": [{
                    "componentVersion": "https://bom.example.com/api/components/c/versions/v",
                    "bomComponentVersionPolicyStatus": "https://bom.example.com/api/ps/1"
                }]
            }
        })))
        .unwrap();

        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
        );
        match record.content {
            NotificationContent::RuleViolation {
                project,
                component_version_statuses,
            } => {
                assert_eq!(project, NameVersion::new("P", "1.0"));
                assert_eq!(component_version_statuses.len(), 1);
                assert_eq!(
                    component_version_statuses[0].policy_status_url,
                    "https://bom.example.com/api/ps/1"
                );
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_parse_policy_override() {
        let record = parse_notification(view(serde_json::json!({
            "type": "POLICY_OVERRIDE",
            "createdAt": "2024-06-01T10:00:00Z",
            "content": {
                "projectName": "P",
                "projectVersionName": "1.0",
                "componentVersion": "https://bom.example.com/api/components/c/versions/v",
                "bomComponentVersionPolicyStatus": "https://bom.example.com/api/ps/2"
            }
        })))
        .unwrap();
        assert!(matches!(
            record.content,
            NotificationContent::PolicyOverride { ref status, .. }
                if status.policy_status_url.ends_with("/ps/2")
        ));
    }

    #[test]
    fn test_parse_vulnerability_notification() {
        let record = parse_notification(view(serde_json::json!({
            "type": "VULNERABILITY",
            "createdAt": "2024-06-01T10:00:00Z",
            "content": {
                "affectedProjectVersions": [
                    {"projectName": "P", "projectVersionName": "1.0"},
                    {"projectName": "Q", "projectVersionName": "2.0"}
                ],
                "componentVersion": "https://bom.example.com/api/components/c/versions/v"
            }
        })))
        .unwrap();
        assert_eq!(record.content.project_versions().len(), 2);
    }

    #[test]
    fn test_unknown_notification_type_is_other() {
        let record = parse_notification(view(serde_json::json!({
            "type": "PROJECT_VERSION",
            "createdAt": "2024-06-01T10:00:00Z",
            "content": {}
        })))
        .unwrap();
        assert_eq!(
            record.content,
            NotificationContent::Other {
                kind: "PROJECT_VERSION".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_notification_is_remote_error() {
        let err = parse_notification(view(serde_json::json!({
            "type": "VULNERABILITY",
            "createdAt": "2024-06-01T10:00:00Z",
            "content": {"affectedProjectVersions": []}
        })))
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InspectionError>(),
            Some(InspectionError::Remote { .. })
        ));
    }

    #[test]
    fn test_malformed_notification_does_not_fail_window() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let views = vec![
            view(serde_json::json!({
                "type": "PROJECT_VERSION",
                "createdAt": "2024-06-01T09:00:00Z",
                "content": {}
            })),
            view(serde_json::json!({
                "type": "RULE_VIOLATION",
                "createdAt": "2024-06-01T10:00:00Z",
                "content": {"projectName": "Untracked"}
            })),
            view(serde_json::json!({
                "type": "POLICY_OVERRIDE",
                "createdAt": "2024-06-01T11:00:00Z",
                "content": {
                    "projectName": "P",
                    "projectVersionName": "1.0",
                    "componentVersion": "https://bom.example.com/api/components/c/versions/v",
                    "bomComponentVersionPolicyStatus": "https://bom.example.com/api/ps/2"
                }
            })),
        ];

        let records = notifications_in_window(views, start, end);

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1].content,
            NotificationContent::Other {
                kind: "RULE_VIOLATION".to_string()
            }
        );
        assert_eq!(records[1].created_at, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_window_excludes_start_and_includes_end() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let views = vec![
            view(serde_json::json!({
                "type": "PROJECT_VERSION",
                "createdAt": "2024-06-01T00:00:00Z"
            })),
            view(serde_json::json!({
                "type": "PROJECT_VERSION",
                "createdAt": "2024-06-02T00:00:00Z"
            })),
        ];

        let records = notifications_in_window(views, start, end);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].created_at, end);
    }

    #[test]
    fn test_unknown_severity_counts_as_none() {
        let vulnerability = parse_vulnerability(VulnerabilityView {
            name: "CVE-2024-1".to_string(),
            severity: Some("URGENT".to_string()),
        });
        assert_eq!(vulnerability.severity, Severity::None);
    }

    #[test]
    fn test_bom_policy_status_url() {
        assert_eq!(
            bom_policy_status_url(
                "https://bom.example.com/api/projects/p/versions/v/",
                "https://bom.example.com/api/components/c1/versions/v1"
            ),
            Some(
                "https://bom.example.com/api/projects/p/versions/v/components/c1/versions/v1/policy-status"
                    .to_string()
            )
        );
        assert_eq!(bom_policy_status_url("https://x/pv", "https://x/other"), None);
    }

    #[test]
    fn test_meta_link_lookup() {
        let resource: ResourceView = serde_json::from_value(serde_json::json!({
            "_meta": {
                "href": "https://bom.example.com/api/components/c/versions/v",
                "links": [{"rel": "origins", "href": "https://bom.example.com/api/o"}]
            }
        }))
        .unwrap();
        assert_eq!(
            resource.meta.link("origins"),
            Some("https://bom.example.com/api/o".to_string())
        );
        assert_eq!(resource.meta.link("vulnerabilities"), None);
    }
}
