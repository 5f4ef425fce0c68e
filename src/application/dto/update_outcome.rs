use chrono::{DateTime, Utc};

/// Outcome of reconciling one notification window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub notifications_seen: usize,
    pub notifications_applied: usize,
    pub artifacts_updated: usize,
    /// Latest `created_at` in the window; `None` when the window was empty
    pub latest_created_at: Option<DateTime<Utc>>,
}

/// Result of a repository metadata update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The repository has not completed inspection; nothing was done
    Skipped,
    UpToDate {
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        checkpoint: DateTime<Utc>,
        artifacts_updated: usize,
    },
}

impl UpdateOutcome {
    pub fn summary(&self) -> String {
        match self {
            UpdateOutcome::Skipped => "skipped (repository not inspected)".to_string(),
            UpdateOutcome::UpToDate {
                checkpoint,
                artifacts_updated,
                ..
            } => format!(
                "{} artifacts updated, checkpoint {}",
                artifacts_updated,
                checkpoint.to_rfc3339()
            ),
        }
    }
}
