//! Configuration file support for bom-inspector.
//!
//! Provides YAML-based configuration through `bom-inspector.config.yml` files,
//! including data structures, file loading, and the module status check.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::application::dto::{ModuleStatus, StatusReport};
use crate::inspection::domain::SupportedPackageType;
use crate::inspection::services::ArtifactPatterns;
use crate::shared::error::InspectionError;
use crate::shared::security::{read_guarded, MAX_CONFIG_SIZE};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "bom-inspector.config.yml";

/// Environment variable consulted when `scan_service.api_token` is absent
pub const API_TOKEN_ENV: &str = "BOM_INSPECTOR_API_TOKEN";

pub const SCAN_SERVICE_MODULE: &str = "scan_service";
pub const INSPECTION_MODULE: &str = "inspection";
pub const POLICY_MODULE: &str = "policy";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_PROJECT_VERSION_NAME: &str = "latest";

/// Top-level configuration file schema.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub scan_service: ScanServiceConfig,
    #[serde(default)]
    pub inspection: InspectionConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Connection settings for the remote scanning service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanServiceConfig {
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    /// Repositories processed in parallel during a sweep
    pub concurrency: usize,
}

impl Default for ScanServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScanServiceConfig {
    /// Token from the file, falling back to the environment
    pub fn resolved_api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(API_TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Settings of the inspection module.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    pub enabled: bool,
    pub repos: Vec<String>,
    /// Package type -> wildcard file-name patterns
    pub patterns: HashMap<String, Vec<String>>,
    pub max_retries: u32,
    /// Block downloads of artifacts that have not been inspected yet
    pub metadata_block: bool,
    /// Version name used when a repository is first registered
    pub project_version_name: String,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repos: Vec::new(),
            patterns: HashMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            metadata_block: false,
            project_version_name: DEFAULT_PROJECT_VERSION_NAME.to_string(),
        }
    }
}

impl InspectionConfig {
    /// Patterns for a package type (case-insensitive); empty when none are configured
    pub fn patterns_for(&self, package_type: &str) -> Vec<String> {
        self.patterns
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(package_type))
            .map(|(_, patterns)| patterns.clone())
            .unwrap_or_default()
    }

    pub fn is_configured(&self, repo_key: &str) -> bool {
        self.repos.iter().any(|r| r == repo_key)
    }
}

/// Settings of the policy module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Block downloads of artifacts in policy violation
    pub enabled: bool,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_guarded(path, "config file", MAX_CONFIG_SIZE).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Checks every module and collects per-property errors.
pub fn status_report(config: &ConfigFile) -> StatusReport {
    StatusReport {
        modules: vec![
            scan_service_status(&config.scan_service),
            inspection_status(&config.inspection),
            policy_status(config),
        ],
    }
}

/// Fails with the first validation error of any module.
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    let report = status_report(config);
    for module in &report.modules {
        if let Some(error) = module.errors.first() {
            return Err(InspectionError::ConfigFile {
                details: format!("{}.{}: {}", module.name, error.property, error.message),
                hint: format!("Fix the '{}' section of {}", module.name, CONFIG_FILENAME),
            }
            .into());
        }
    }
    Ok(())
}

fn scan_service_status(config: &ScanServiceConfig) -> ModuleStatus {
    let mut status = ModuleStatus::new(SCAN_SERVICE_MODULE, true);

    match config.url.as_deref().map(str::trim) {
        None | Some("") => status.add_error("url", "must be set"),
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
            status.add_error("url", format!("'{}' is not an http(s) URL", url))
        }
        Some(_) => {}
    }

    if config.resolved_api_token().is_none() {
        status.add_error(
            "api_token",
            format!("must be set in the file or via {}", API_TOKEN_ENV),
        );
    }
    if config.timeout_secs == 0 {
        status.add_error("timeout_secs", "must be greater than zero");
    }
    if config.concurrency == 0 {
        status.add_error("concurrency", "must be greater than zero");
    }

    status
}

fn inspection_status(config: &InspectionConfig) -> ModuleStatus {
    let mut status = ModuleStatus::new(INSPECTION_MODULE, config.enabled);
    if !config.enabled {
        return status;
    }

    if config.repos.is_empty() {
        status.add_error("repos", "at least one repository must be configured");
    }
    if config.repos.iter().any(|r| r.trim().is_empty()) {
        status.add_error("repos", "repository keys must not be blank");
    }

    let mut package_types: Vec<&String> = config.patterns.keys().collect();
    package_types.sort();
    for package_type in package_types {
        let property = format!("patterns.{}", package_type);
        if SupportedPackageType::from_package_type(package_type).is_none() {
            status.add_error(&property, "unsupported package type");
            continue;
        }
        let patterns = &config.patterns[package_type];
        if patterns.is_empty() {
            status.add_error(&property, "at least one pattern is required");
        } else if let Err(e) = ArtifactPatterns::new(patterns) {
            status.add_error(&property, e.to_string());
        }
    }

    if config.project_version_name.trim().is_empty() {
        status.add_error("project_version_name", "must not be blank");
    }

    status
}

fn policy_status(config: &ConfigFile) -> ModuleStatus {
    let mut status = ModuleStatus::new(POLICY_MODULE, config.policy.enabled);
    if config.policy.enabled && !config.inspection.enabled {
        status.add_error(
            "enabled",
            "policy blocking reads inspection metadata; enable the inspection module",
        );
    }
    status
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "Unknown config field will be ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"
scan_service:
  url: https://bom.example.com
  api_token: secret
  timeout_secs: 30
inspection:
  repos: [maven-remote, npm-remote]
  patterns:
    maven: ["*.jar"]
    npm: ["*.tgz"]
  max_retries: 3
  metadata_block: true
policy:
  enabled: true
"#;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", VALID);

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.scan_service.url.as_deref(), Some("https://bom.example.com"));
        assert_eq!(config.scan_service.timeout_secs, 30);
        assert_eq!(config.scan_service.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.inspection.repos.len(), 2);
        assert_eq!(config.inspection.patterns_for("MAVEN"), vec!["*.jar".to_string()]);
        assert!(config.inspection.patterns_for("pypi").is_empty());
        assert_eq!(config.inspection.max_retries, 3);
        assert!(config.inspection.metadata_block);
        assert_eq!(config.inspection.project_version_name, "latest");
        assert!(config.policy.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, CONFIG_FILENAME, VALID);

        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_some());
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.yml", "invalid: yaml: [[[broken");

        let result = load_config_from_path(&path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_status_report_collects_errors_per_module() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.yml",
            r#"
scan_service:
  url: ftp://bom.example.com
  api_token: secret
inspection:
  repos: []
  patterns:
    docker: ["*"]
    npm: []
"#,
        );
        let config = load_config_from_path(&path).unwrap();
        let report = status_report(&config);

        assert!(!report.is_valid());
        let scan = report.module(SCAN_SERVICE_MODULE).unwrap();
        assert_eq!(scan.errors.len(), 1);
        assert_eq!(scan.errors[0].property, "url");

        let inspection = report.module(INSPECTION_MODULE).unwrap();
        let properties: Vec<&str> = inspection
            .errors
            .iter()
            .map(|e| e.property.as_str())
            .collect();
        assert_eq!(properties, vec!["repos", "patterns.docker", "patterns.npm"]);

        let policy = report.module(POLICY_MODULE).unwrap();
        assert!(!policy.enabled);
        assert!(policy.is_valid());
    }

    #[test]
    fn test_disabled_inspection_is_not_validated() {
        let config = ConfigFile {
            scan_service: ScanServiceConfig {
                url: Some("https://bom.example.com".to_string()),
                api_token: Some("t".to_string()),
                ..ScanServiceConfig::default()
            },
            inspection: InspectionConfig {
                enabled: false,
                ..InspectionConfig::default()
            },
            ..ConfigFile::default()
        };
        let report = status_report(&config);
        assert!(report.module(INSPECTION_MODULE).unwrap().is_valid());
    }

    #[test]
    fn test_policy_requires_inspection() {
        let config = ConfigFile {
            inspection: InspectionConfig {
                enabled: false,
                ..InspectionConfig::default()
            },
            policy: PolicyConfig { enabled: true },
            ..ConfigFile::default()
        };
        let report = status_report(&config);
        assert!(!report.module(POLICY_MODULE).unwrap().is_valid());
    }

    #[test]
    fn test_validate_reports_first_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", "inspection:\n  repos: [a]\n");
        let config = load_config_from_path(&path).unwrap();

        let err = validate_config(&config).unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("scan_service.url"));
        assert!(message.contains("💡 Hint:"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", "unknown_field: true\nanother: 1\n");

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
    }
}
