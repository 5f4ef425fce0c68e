use crate::application::dto::{ArtifactFailure, DeltaReport};
use crate::application::services::{
    configured_patterns, IdentifierResolver, InspectionStateTracker,
};
use crate::config::InspectionConfig;
use crate::inspection::domain::{InspectionProperty, ProjectVersion, RepoPath};
use crate::ports::outbound::{RepositoryStore, ScanService};
use crate::shared::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// InitializeRepositoryUseCase - Initial full scan of a repository
///
/// Creates (or reuses) the remote project version the repository maps to and
/// records a coordinate on every matching artifact. Registration against the
/// BOM is left to delta inspection, which only runs once this has succeeded.
pub struct InitializeRepositoryUseCase<S: RepositoryStore, C: ScanService> {
    tracker: InspectionStateTracker<S>,
    resolver: IdentifierResolver<S>,
    scan_service: Arc<C>,
    config: Arc<InspectionConfig>,
}

impl<S: RepositoryStore, C: ScanService> InitializeRepositoryUseCase<S, C> {
    pub fn new(
        tracker: InspectionStateTracker<S>,
        resolver: IdentifierResolver<S>,
        scan_service: Arc<C>,
        config: Arc<InspectionConfig>,
    ) -> Self {
        Self {
            tracker,
            resolver,
            scan_service,
            config,
        }
    }

    /// Initializes a repository that is PENDING or FAILURE with retries left
    ///
    /// # Errors
    /// Configuration and remote errors at repository level. The repository root
    /// is marked FAILURE with the reason before the error is returned.
    pub async fn execute(&self, repo_key: &str) -> Result<DeltaReport> {
        let root = RepoPath::root(repo_key);
        if !self.tracker.is_pending_or_retryable(&root)? {
            info!(repo_key, "Repository already initialized or out of retries");
            return Ok(DeltaReport::skipped(repo_key));
        }

        match self.initialize(repo_key).await {
            Ok(report) => {
                info!(repo_key, summary = %report.summary(), "Repository initialized");
                Ok(report)
            }
            Err(e) => {
                error!(repo_key, error = %e, "Repository initialization failed");
                self.tracker.mark_failure(&root, &e.to_string())?;
                Err(e)
            }
        }
    }

    async fn initialize(&self, repo_key: &str) -> Result<DeltaReport> {
        let store = self.tracker.properties().repository_store();
        let (package_type, patterns) = configured_patterns(store, &self.config, repo_key)?;

        let project_version = self.project_version(repo_key).await?;
        let repo_keys = [repo_key.to_string()];
        let artifact_count = store.artifact_count(&repo_keys)?;
        info!(
            repo_key,
            package_type = %package_type,
            artifact_count,
            project = %project_version.project_name,
            version = %project_version.version_name,
            "Initializing repository"
        );

        let mut report = DeltaReport::new(repo_key);
        for path in store.search_by_patterns(&repo_keys, &patterns)? {
            match self.identify(&path) {
                Ok(()) => report.succeeded.push(path),
                Err(e) => {
                    let reason = format!("Failed to find component: {}", e);
                    if let Err(write_error) = self.tracker.mark_failure(&path, &reason) {
                        warn!(
                            path = %path,
                            error = %write_error,
                            "Could not record inspection failure"
                        );
                    }
                    report.failed.push(ArtifactFailure { path, reason });
                }
            }
        }

        self.tracker.mark_repository_success(repo_key, Utc::now())?;
        self.tracker.properties().set_project(repo_key, &project_version)?;
        Ok(report)
    }

    /// Persisted project pair, defaulting to the repository key and the configured version name
    async fn project_version(&self, repo_key: &str) -> Result<ProjectVersion> {
        let properties = self.tracker.properties();
        let root = RepoPath::root(repo_key);
        let project_name = properties
            .get(&root, InspectionProperty::ProjectName)?
            .unwrap_or_else(|| repo_key.to_string());
        let version_name = properties
            .get(&root, InspectionProperty::ProjectVersionName)?
            .unwrap_or_else(|| self.config.project_version_name.clone());

        self.scan_service
            .get_or_create_project_version(&project_name, &version_name)
            .await
    }

    fn identify(&self, path: &RepoPath) -> Result<()> {
        let coordinate = self
            .resolver
            .resolve(path)?
            .ok_or_else(|| anyhow::anyhow!("Could not resolve a component identifier"))?;
        if !self.tracker.has_identifier_properties(path)? {
            self.tracker.record_coordinate(path, &coordinate)?;
        }
        Ok(())
    }
}
