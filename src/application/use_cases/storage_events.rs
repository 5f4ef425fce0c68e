use crate::application::dto::DownloadDecision;
use crate::application::services::{IdentifierResolver, InspectionStateTracker};
use crate::config::{InspectionConfig, PolicyConfig};
use crate::inspection::domain::{InspectionProperty, InspectionStatus, PolicyStatus, RepoPath};
use crate::inspection::services::ArtifactPatterns;
use crate::ports::outbound::RepositoryStore;
use crate::shared::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// StorageEventsUseCase - Reacts to host storage events and administrative resets
///
/// Everything here is local to the repository store: artifacts are identified
/// and put back to PENDING, registration happens on the next delta pass.
pub struct StorageEventsUseCase<S: RepositoryStore> {
    tracker: InspectionStateTracker<S>,
    resolver: IdentifierResolver<S>,
    inspection: Arc<InspectionConfig>,
    policy: Arc<PolicyConfig>,
}

impl<S: RepositoryStore> StorageEventsUseCase<S> {
    pub fn new(
        tracker: InspectionStateTracker<S>,
        resolver: IdentifierResolver<S>,
        inspection: Arc<InspectionConfig>,
        policy: Arc<PolicyConfig>,
    ) -> Self {
        Self {
            tracker,
            resolver,
            inspection,
            policy,
        }
    }

    /// Whether an item falls under inspection: configured repository, a file,
    /// and a file name matching the patterns of the repository's package type
    pub fn should_inspect_artifact(&self, path: &RepoPath) -> Result<bool> {
        if !self.inspection.is_configured(path.repo_key()) {
            return Ok(false);
        }
        let store = self.tracker.properties().repository_store();
        match store.item_info(path)? {
            Some(item) if !item.is_folder => {}
            _ => return Ok(false),
        }
        let Some(package_type) = store.package_type(path.repo_key())? else {
            return Ok(false);
        };
        let patterns = self.inspection.patterns_for(&package_type);
        if patterns.is_empty() {
            return Ok(false);
        }
        Ok(ArtifactPatterns::new(&patterns)?.matches(path.name()))
    }

    /// Starts inspection over for a newly created, copied or moved artifact
    ///
    /// # Returns
    /// `true` when the artifact is under inspection
    pub fn handle_artifact_created_or_moved(&self, path: &RepoPath) -> Result<bool> {
        if !self.should_inspect_artifact(path)? {
            debug!(path = %path, "Item not under inspection");
            return Ok(false);
        }
        self.tracker.properties().clear(path, &[])?;
        self.identify_and_mark(path)?;
        Ok(true)
    }

    /// Decides whether a download may proceed
    pub fn handle_before_download(&self, path: &RepoPath) -> DownloadDecision {
        if self.inspection.enabled && self.inspection.metadata_block {
            match self.awaiting_inspection(path) {
                Ok(false) => {}
                Ok(true) => {
                    info!(path = %path, "Blocking download of uninspected artifact");
                    return DownloadDecision::block(format!(
                        "Download of '{}' is blocked until its component metadata has been inspected",
                        path
                    ));
                }
                Err(e) => {
                    warn!(
                        path = %path,
                        error = %e,
                        "Could not read inspection state, blocking download"
                    );
                    return DownloadDecision::block(format!(
                        "Download of '{}' is blocked: inspection state could not be read",
                        path
                    ));
                }
            }
        }

        if self.policy.enabled {
            match self.tracker.properties().policy_status(path) {
                Ok(Some(PolicyStatus::InViolation)) => {
                    info!(path = %path, "Blocking download of artifact in policy violation");
                    return DownloadDecision::block(format!(
                        "Download of '{}' is blocked: the component is in violation of a policy",
                        path
                    ));
                }
                Ok(_) => {}
                Err(e) if self.inspection.metadata_block => {
                    warn!(
                        path = %path,
                        error = %e,
                        "Could not read policy status, blocking download"
                    );
                    return DownloadDecision::block(format!(
                        "Download of '{}' is blocked: policy status could not be read",
                        path
                    ));
                }
                Err(e) => {
                    warn!(
                        path = %path,
                        error = %e,
                        "Could not read policy status, allowing download"
                    );
                }
            }
        }

        DownloadDecision::Allow
    }

    /// Clears failed artifacts of every configured repository and identifies them again
    ///
    /// An empty property list clears every inspection property. Repository roots
    /// are left alone; initialization retries them.
    ///
    /// # Returns
    /// Number of artifacts put back under inspection
    pub fn reinspect_failures(&self, properties_to_clear: &[InspectionProperty]) -> Result<usize> {
        let properties = self.tracker.properties();
        let failed =
            properties.paths_with_status(&self.inspection.repos, InspectionStatus::Failure)?;

        let mut reinspected = 0;
        for path in failed.iter().filter(|p| !p.is_root()) {
            properties.clear(path, properties_to_clear)?;
            if self.should_inspect_artifact(path)? {
                self.identify_and_mark(path)?;
                reinspected += 1;
            }
        }

        info!(failed = failed.len(), reinspected, "Reinspection of failures finished");
        Ok(reinspected)
    }

    /// Clears inspection properties from every inspected item and the roots
    /// of the given repositories
    ///
    /// # Returns
    /// Number of items cleared
    pub fn delete_inspection_properties(
        &self,
        repo_keys: &[String],
        properties_to_clear: &[InspectionProperty],
    ) -> Result<usize> {
        let properties = self.tracker.properties();
        let mut cleared = 0;
        for repo_key in repo_keys {
            let root = RepoPath::root(repo_key.as_str());
            let mut paths = properties.inspected_paths(std::slice::from_ref(repo_key))?;
            if !paths.contains(&root) {
                paths.push(root);
            }
            for path in &paths {
                properties.clear(path, properties_to_clear)?;
            }
            info!(repo_key = %repo_key, items = paths.len(), "Inspection properties deleted");
            cleared += paths.len();
        }
        Ok(cleared)
    }

    fn awaiting_inspection(&self, path: &RepoPath) -> Result<bool> {
        Ok(self.tracker.assert_status(path, InspectionStatus::Pending)?
            && self.should_inspect_artifact(path)?)
    }

    /// Resolves and records a coordinate; an unresolvable artifact is marked FAILURE
    fn identify_and_mark(&self, path: &RepoPath) -> Result<()> {
        match self.resolver.resolve(path) {
            Ok(Some(coordinate)) => self.tracker.record_coordinate(path, &coordinate),
            Ok(None) => self.tracker.mark_failure(
                path,
                "Failed to find component: Could not resolve a component identifier",
            ),
            Err(e) => self
                .tracker
                .mark_failure(path, &format!("Failed to find component: {}", e)),
        }
    }
}
