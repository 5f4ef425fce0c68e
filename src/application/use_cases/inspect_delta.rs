use crate::application::dto::{ArtifactFailure, DeltaReport};
use crate::application::services::{
    configured_patterns, IdentifierResolver, InspectionStateTracker,
};
use crate::config::InspectionConfig;
use crate::inspection::domain::{InspectionStatus, ProjectVersion, RepoPath};
use crate::ports::outbound::{RepositoryStore, ScanService};
use crate::shared::error::InspectionError;
use crate::shared::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// InspectDeltaUseCase - Registers new and retryable artifacts against the BOM
///
/// Repository-level preconditions (initial scan done, patterns configured,
/// project version present remotely) abort the pass for that repository.
/// Per-artifact failures are recorded and never abort the batch.
///
/// # Type Parameters
/// * `S` - RepositoryStore implementation
/// * `C` - ScanService implementation
pub struct InspectDeltaUseCase<S: RepositoryStore, C: ScanService> {
    tracker: InspectionStateTracker<S>,
    resolver: IdentifierResolver<S>,
    scan_service: Arc<C>,
    config: Arc<InspectionConfig>,
}

impl<S: RepositoryStore, C: ScanService> InspectDeltaUseCase<S, C> {
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

    /// Runs one delta pass over a repository
    ///
    /// # Returns
    /// A report of succeeded and failed artifacts; `ran == false` when the
    /// repository has not completed its initial scan
    ///
    /// # Errors
    /// Repository-level precondition failures. The repository root is marked
    /// FAILURE before the error is returned.
    pub async fn execute(&self, repo_key: &str) -> Result<DeltaReport> {
        let root = RepoPath::root(repo_key);

        // Step 1: Only initialized repositories take deltas
        if !self.tracker.assert_status(&root, InspectionStatus::Success)? {
            info!(repo_key, "Repository not initialized, skipping delta inspection");
            return Ok(DeltaReport::skipped(repo_key));
        }

        // Steps 2-3: Repository-level preconditions
        let (patterns, project_version) = match self.preconditions(repo_key).await {
            Ok(prepared) => prepared,
            Err(e) => {
                error!(repo_key, error = %e, "Delta inspection aborted");
                self.tracker.mark_failure(&root, &e.to_string())?;
                return Err(e);
            }
        };

        // Step 4: Candidate selection
        let store = self.tracker.properties().repository_store();
        let candidates = store.search_by_patterns(&[repo_key.to_string()], &patterns)?;

        let mut report = DeltaReport::new(repo_key);
        for path in candidates {
            match self.tracker.is_pending_or_retryable(&path) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!(
                        path = %path,
                        error = %e,
                        "Unreadable inspection state, skipping artifact"
                    );
                    report.failed.push(ArtifactFailure {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            }

            // Step 5: Per-artifact registration, failures isolated
            match self.inspect_artifact(&path, &project_version).await {
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

        info!(repo_key, summary = %report.summary(), "Delta inspection finished");
        Ok(report)
    }

    async fn preconditions(&self, repo_key: &str) -> Result<(Vec<String>, ProjectVersion)> {
        let store = self.tracker.properties().repository_store();
        let (_, patterns) = configured_patterns(store, &self.config, repo_key)?;

        let project = self.tracker.properties().project(repo_key)?.ok_or_else(|| {
            InspectionError::configuration(
                repo_key,
                "No project name/version recorded for the repository",
            )
        })?;

        let project_version = self
            .scan_service
            .find_project_version(&project.name, &project.version)
            .await?
            .ok_or_else(|| {
                InspectionError::configuration(
                    repo_key,
                    format!(
                        "Project '{}' and version '{}' could not be found",
                        project.name, project.version
                    ),
                )
            })?;

        Ok((patterns, project_version))
    }

    async fn inspect_artifact(
        &self,
        path: &RepoPath,
        project_version: &ProjectVersion,
    ) -> Result<()> {
        let coordinate = self
            .resolver
            .resolve(path)?
            .ok_or_else(|| anyhow::anyhow!("Could not resolve a component identifier"))?;

        // Recording resets the retry counter, so only do it once
        if !self.tracker.has_identifier_properties(path)? {
            self.tracker.record_coordinate(path, &coordinate)?;
        }

        let component = self
            .scan_service
            .add_component_to_project_version(&coordinate, project_version)
            .await?;

        self.tracker
            .mark_success(path, &coordinate, &component, Utc::now())
    }
}
