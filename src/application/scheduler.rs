use crate::application::dto::{RepositoryOutcome, SweepReport};
use crate::ports::inbound::InspectionPort;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Which repository-level operation a sweep runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Initialize,
    InspectDelta,
    UpdateMetadata,
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepKind::Initialize => write!(f, "initialize"),
            SweepKind::InspectDelta => write!(f, "inspect-delta"),
            SweepKind::UpdateMetadata => write!(f, "update-metadata"),
        }
    }
}

/// ReconciliationScheduler - Runs one operation over many repositories
///
/// Repositories are processed with bounded parallelism and share the port's
/// scan service connection pool. One repository's failure is recorded and
/// never aborts the others.
pub struct ReconciliationScheduler<P: InspectionPort> {
    port: Arc<P>,
    concurrency: usize,
}

impl<P: InspectionPort> ReconciliationScheduler<P> {
    pub fn new(port: Arc<P>, concurrency: usize) -> Self {
        Self {
            port,
            concurrency: concurrency.max(1),
        }
    }

    /// Sweeps every configured repository
    pub async fn run_sweep(&self, kind: SweepKind) -> SweepReport {
        let repo_keys = self.port.configured_repositories();
        self.run_sweep_over(kind, &repo_keys).await
    }

    /// Sweeps the given repositories; the report lists them in input order
    pub async fn run_sweep_over(&self, kind: SweepKind, repo_keys: &[String]) -> SweepReport {
        info!(kind = %kind, repositories = repo_keys.len(), "Starting sweep");

        let mut results: Vec<(usize, RepositoryOutcome)> =
            stream::iter(repo_keys.iter().enumerate())
                .map(|(index, repo_key)| async move {
                    (index, self.run_one(kind, repo_key).await)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut report = SweepReport::default();
        for (index, outcome) in results {
            report.push(repo_keys[index].clone(), outcome);
        }

        info!(kind = %kind, failed = report.has_failures(), "Sweep finished");
        report
    }

    async fn run_one(&self, kind: SweepKind, repo_key: &str) -> RepositoryOutcome {
        let result = match kind {
            SweepKind::Initialize => self
                .port
                .initialize_repository(repo_key)
                .await
                .map(|report| report.summary()),
            SweepKind::InspectDelta => self
                .port
                .inspect_repository_delta(repo_key)
                .await
                .map(|report| report.summary()),
            SweepKind::UpdateMetadata => self
                .port
                .update_repository_metadata(repo_key)
                .await
                .map(|outcome| outcome.summary()),
        };

        match result {
            Ok(summary) => RepositoryOutcome::Completed(summary),
            Err(e) => {
                error!(repo_key, kind = %kind, error = %e, "Repository sweep failed");
                RepositoryOutcome::Failed(e.to_string())
            }
        }
    }
}
