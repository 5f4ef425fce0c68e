use crate::application::dto::{DeltaReport, DownloadDecision, StatusReport, UpdateOutcome};
use crate::inspection::domain::{InspectionProperty, RepoPath};
use crate::shared::Result;
use async_trait::async_trait;

/// InspectionPort - Inbound port for the inspection system
///
/// This is the application's public API, consumed by the CLI, the scheduler
/// and storage-event glue. Operations of a disabled module log and return a
/// neutral result instead of failing.
#[async_trait]
pub trait InspectionPort: Send + Sync {
    /// Registers new and retryable artifacts of an initialized repository
    ///
    /// # Errors
    /// Returns an error if the repository is not configured or a repository-level
    /// precondition fails (patterns, project version)
    async fn inspect_repository_delta(&self, repo_key: &str) -> Result<DeltaReport>;

    /// Applies notifications created since the repository's checkpoint
    ///
    /// # Errors
    /// Returns an error if the notification window could not be processed;
    /// the checkpoint is left unchanged in that case
    async fn update_repository_metadata(&self, repo_key: &str) -> Result<UpdateOutcome>;

    /// Runs the initial scan of a repository
    async fn initialize_repository(&self, repo_key: &str) -> Result<DeltaReport>;

    /// Starts inspection over for a created, copied or moved item
    ///
    /// # Returns
    /// `true` when the item is under inspection
    fn handle_artifact_created_or_moved(&self, path: &RepoPath) -> Result<bool>;

    /// Allow or block a download
    fn handle_before_download(&self, path: &RepoPath) -> DownloadDecision;

    /// Puts failed artifacts back under inspection; an empty list clears every property
    fn reinspect_failures(&self, properties_to_clear: &[InspectionProperty]) -> Result<usize>;

    /// Removes inspection properties from the given repositories
    fn delete_inspection_properties(
        &self,
        repo_keys: &[String],
        properties_to_clear: &[InspectionProperty],
    ) -> Result<usize>;

    /// Per-module enabled flag and validation errors
    fn status_report(&self) -> StatusReport;

    /// Repository keys configured for inspection
    fn configured_repositories(&self) -> Vec<String>;
}
