/// Data Transfer Objects for application layer
///
/// DTOs carry use-case results out to the CLI and the scheduler,
/// keeping the domain layer isolated.
mod delta_report;
mod download_decision;
mod status_report;
mod sweep_report;
mod update_outcome;

pub use delta_report::{ArtifactFailure, DeltaReport};
pub use download_decision::{DownloadDecision, FORBIDDEN};
pub use status_report::{ModuleStatus, PropertyError, StatusReport};
pub use sweep_report::{RepositoryOutcome, SweepEntry, SweepReport};
pub use update_outcome::{ReconcileReport, UpdateOutcome};
