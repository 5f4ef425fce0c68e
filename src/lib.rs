//! bom-inspector - Reconciles artifact repository contents with a BOM scanning service
//!
//! Artifacts stored in a repository manager are identified (forge, name, version),
//! registered against a project version on a remote scanning service, and kept up
//! to date with the policy and vulnerability notifications that service emits.
//! All state lives as key/value properties on the repository items themselves.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inspection`): Value types and pure services
//! - **Application Layer** (`application`): Use cases, the inspection facade and the scheduler
//! - **Ports** (`ports`): Interface definitions for the host store and the scanning service
//! - **Adapters** (`adapters`): In-memory repository store and the HTTP scanning-service client
//! - **Shared** (`shared`): Error taxonomy and the Result alias
//!
//! # Example
//!
//! ```no_run
//! use bom_inspector::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let config = Arc::new(load_config_from_path(Path::new("bom-inspector.config.yml"))?);
//! let store = Arc::new(InMemoryRepositoryStore::load(Path::new("snapshot.json"))?);
//! let client = CachingScanService::new(BomServiceClient::new(&config.scan_service)?);
//!
//! let service = Arc::new(InspectionService::new(store, Arc::new(client), Arc::clone(&config)));
//! let scheduler = ReconciliationScheduler::new(service, config.scan_service.concurrency);
//! let report = scheduler.run_sweep(SweepKind::InspectDelta).await;
//! assert!(!report.has_failures());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod inspection;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::network::{BomServiceClient, CachingScanService};
    pub use crate::adapters::outbound::storage::InMemoryRepositoryStore;
    pub use crate::application::dto::{
        DeltaReport, DownloadDecision, StatusReport, SweepReport, UpdateOutcome,
    };
    pub use crate::application::{InspectionService, ReconciliationScheduler, SweepKind};
    pub use crate::config::{load_config_from_path, ConfigFile};
    pub use crate::inspection::domain::{
        Coordinate, Forge, InspectionProperty, InspectionStatus, Notification, PolicyStatus,
        RepoPath, UpdateStatus,
    };
    pub use crate::ports::inbound::InspectionPort;
    pub use crate::ports::outbound::{RepositoryStore, ScanService};
    pub use crate::shared::Result;
}
