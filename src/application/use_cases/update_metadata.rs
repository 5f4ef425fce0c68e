use super::reconcile_notifications::ReconcileNotificationsUseCase;
use crate::application::dto::UpdateOutcome;
use crate::application::services::InspectionStateTracker;
use crate::inspection::domain::{InspectionProperty, InspectionStatus, RepoPath, UpdateStatus};
use crate::ports::outbound::{RepositoryStore, ScanService};
use crate::shared::error::InspectionError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// UpdateMetadataUseCase - Incremental notification catch-up for one repository
///
/// The window starts at the later of the repository's last update and last
/// inspection. The checkpoint only moves after every derived write succeeded;
/// on failure the repository is flagged OUT_OF_DATE and the next run replays
/// the same window.
pub struct UpdateMetadataUseCase<S: RepositoryStore, C: ScanService> {
    tracker: InspectionStateTracker<S>,
    reconciler: ReconcileNotificationsUseCase<S, C>,
}

impl<S: RepositoryStore, C: ScanService> UpdateMetadataUseCase<S, C> {
    pub fn new(
        tracker: InspectionStateTracker<S>,
        reconciler: ReconcileNotificationsUseCase<S, C>,
    ) -> Self {
        Self {
            tracker,
            reconciler,
        }
    }

    pub async fn execute(&self, repo_key: &str) -> Result<UpdateOutcome> {
        self.execute_at(repo_key, Utc::now()).await
    }

    /// Same as `execute` with an explicit window end
    pub async fn execute_at(&self, repo_key: &str, now: DateTime<Utc>) -> Result<UpdateOutcome> {
        let root = RepoPath::root(repo_key);
        if !self.tracker.assert_status(&root, InspectionStatus::Success)? {
            info!(repo_key, "Repository not inspected, skipping metadata update");
            return Ok(UpdateOutcome::Skipped);
        }

        match self.update_window(repo_key, &root, now).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(repo_key, error = %e, "Metadata update failed, checkpoint kept");
                let properties = self.tracker.properties();
                if let Err(write_error) =
                    properties.set_update_status(&root, UpdateStatus::OutOfDate)
                {
                    warn!(repo_key, error = %write_error, "Could not flag repository out of date");
                }
                Err(e)
            }
        }
    }

    async fn update_window(
        &self,
        repo_key: &str,
        root: &RepoPath,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome> {
        let properties = self.tracker.properties();
        let window_start = match (
            properties.last_update(root)?,
            properties.last_inspection(root)?,
        ) {
            (Some(update), Some(inspection)) => update.max(inspection),
            (Some(at), None) | (None, Some(at)) => at,
            (None, None) => {
                return Err(InspectionError::malformed(
                    root,
                    format!(
                        "Could not find a {} or {} timestamp; the repository requires re-inspection",
                        InspectionProperty::LastUpdate.key(),
                        InspectionProperty::LastInspection.key()
                    ),
                )
                .into())
            }
        };

        let report = self
            .reconciler
            .execute(&[repo_key.to_string()], window_start, now)
            .await?;

        // An empty window keeps its start: late-arriving notifications stay visible
        let checkpoint = report
            .latest_created_at
            .map_or(window_start, |latest| latest.max(window_start));

        properties.set_update_status(root, UpdateStatus::UpToDate)?;
        properties.set_timestamp(root, InspectionProperty::LastUpdate, checkpoint)?;

        info!(
            repo_key,
            window_start = %window_start,
            checkpoint = %checkpoint,
            artifacts_updated = report.artifacts_updated,
            "Repository metadata up to date"
        );

        Ok(UpdateOutcome::UpToDate {
            window_start,
            window_end: now,
            checkpoint,
            artifacts_updated: report.artifacts_updated,
        })
    }
}
