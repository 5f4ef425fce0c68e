use crate::application::dto::{DeltaReport, DownloadDecision, StatusReport, UpdateOutcome};
use crate::application::services::{IdentifierResolver, InspectionStateTracker, PropertyStore};
use crate::application::use_cases::{
    InitializeRepositoryUseCase, InspectDeltaUseCase, ReconcileNotificationsUseCase,
    StorageEventsUseCase, UpdateMetadataUseCase,
};
use crate::config::{self, ConfigFile, INSPECTION_MODULE};
use crate::inspection::domain::{InspectionProperty, RepoPath};
use crate::ports::inbound::InspectionPort;
use crate::ports::outbound::{RepositoryStore, ScanService};
use crate::shared::error::InspectionError;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// InspectionService - Wires the use cases together behind `InspectionPort`
///
/// All collaborators are injected here once; the use cases share one
/// `PropertyStore` and one scan service handle.
pub struct InspectionService<S: RepositoryStore, C: ScanService> {
    config: Arc<ConfigFile>,
    initialize: InitializeRepositoryUseCase<S, C>,
    delta: InspectDeltaUseCase<S, C>,
    update: UpdateMetadataUseCase<S, C>,
    events: StorageEventsUseCase<S>,
}

impl<S: RepositoryStore, C: ScanService> InspectionService<S, C> {
    pub fn new(store: Arc<S>, scan_service: Arc<C>, config: Arc<ConfigFile>) -> Self {
        let inspection = Arc::new(config.inspection.clone());
        let policy = Arc::new(config.policy.clone());

        let properties = PropertyStore::new(store);
        let tracker = InspectionStateTracker::new(properties.clone(), inspection.max_retries);
        let resolver = IdentifierResolver::new(properties.clone());
        let reconciler = ReconcileNotificationsUseCase::new(properties, Arc::clone(&scan_service));

        Self {
            initialize: InitializeRepositoryUseCase::new(
                tracker.clone(),
                resolver.clone(),
                Arc::clone(&scan_service),
                Arc::clone(&inspection),
            ),
            delta: InspectDeltaUseCase::new(
                tracker.clone(),
                resolver.clone(),
                scan_service,
                Arc::clone(&inspection),
            ),
            update: UpdateMetadataUseCase::new(tracker.clone(), reconciler),
            events: StorageEventsUseCase::new(tracker, resolver, inspection, policy),
            config,
        }
    }

    fn inspection_enabled(&self, operation: &str) -> bool {
        if !self.config.inspection.enabled {
            info!(module = INSPECTION_MODULE, operation, "Module disabled, nothing to do");
        }
        self.config.inspection.enabled
    }

    fn ensure_configured(&self, repo_key: &str) -> Result<()> {
        if self.config.inspection.is_configured(repo_key) {
            return Ok(());
        }
        Err(InspectionError::configuration(
            repo_key,
            "The repository is not listed under inspection.repos",
        )
        .into())
    }
}

#[async_trait]
impl<S: RepositoryStore, C: ScanService> InspectionPort for InspectionService<S, C> {
    async fn inspect_repository_delta(&self, repo_key: &str) -> Result<DeltaReport> {
        if !self.inspection_enabled("inspect_repository_delta") {
            return Ok(DeltaReport::skipped(repo_key));
        }
        self.ensure_configured(repo_key)?;
        self.delta.execute(repo_key).await
    }

    async fn update_repository_metadata(&self, repo_key: &str) -> Result<UpdateOutcome> {
        if !self.inspection_enabled("update_repository_metadata") {
            return Ok(UpdateOutcome::Skipped);
        }
        self.ensure_configured(repo_key)?;
        self.update.execute(repo_key).await
    }

    async fn initialize_repository(&self, repo_key: &str) -> Result<DeltaReport> {
        if !self.inspection_enabled("initialize_repository") {
            return Ok(DeltaReport::skipped(repo_key));
        }
        self.ensure_configured(repo_key)?;
        self.initialize.execute(repo_key).await
    }

    fn handle_artifact_created_or_moved(&self, path: &RepoPath) -> Result<bool> {
        if !self.inspection_enabled("handle_artifact_created_or_moved") {
            return Ok(false);
        }
        self.events.handle_artifact_created_or_moved(path)
    }

    fn handle_before_download(&self, path: &RepoPath) -> DownloadDecision {
        self.events.handle_before_download(path)
    }

    fn reinspect_failures(&self, properties_to_clear: &[InspectionProperty]) -> Result<usize> {
        if !self.inspection_enabled("reinspect_failures") {
            return Ok(0);
        }
        self.events.reinspect_failures(properties_to_clear)
    }

    fn delete_inspection_properties(
        &self,
        repo_keys: &[String],
        properties_to_clear: &[InspectionProperty],
    ) -> Result<usize> {
        if !self.inspection_enabled("delete_inspection_properties") {
            return Ok(0);
        }
        self.events
            .delete_inspection_properties(repo_keys, properties_to_clear)
    }

    fn status_report(&self) -> StatusReport {
        config::status_report(&self.config)
    }

    fn configured_repositories(&self) -> Vec<String> {
        self.config.inspection.repos.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryRepositoryStore;
    use crate::application::use_cases::test_support::{maven_store, FakeScanService};
    use crate::config::{InspectionConfig, POLICY_MODULE};
    use std::collections::HashMap;

    fn config(enabled: bool) -> Arc<ConfigFile> {
        Arc::new(ConfigFile {
            inspection: InspectionConfig {
                enabled,
                repos: vec!["maven-remote".to_string()],
                patterns: HashMap::from([("maven".to_string(), vec!["*.jar".to_string()])]),
                ..InspectionConfig::default()
            },
            ..ConfigFile::default()
        })
    }

    fn service(
        config: Arc<ConfigFile>,
    ) -> (
        InspectionService<InMemoryRepositoryStore, FakeScanService>,
        Arc<FakeScanService>,
    ) {
        let (store, _) = maven_store("maven-remote", &[("junit", "junit", "4.13.2")]);
        store.add_repository("npm-remote", Some("npm"));
        let scan = Arc::new(FakeScanService::default());
        (
            InspectionService::new(Arc::new(store), Arc::clone(&scan), config),
            scan,
        )
    }

    #[tokio::test]
    async fn test_initialize_then_delta_registers_artifacts() {
        let (service, scan) = service(config(true));

        let init = service.initialize_repository("maven-remote").await.unwrap();
        assert_eq!(init.succeeded.len(), 1);

        let delta = service.inspect_repository_delta("maven-remote").await.unwrap();
        assert_eq!(delta.succeeded.len(), 1);
        assert_eq!(scan.registered(), vec!["junit:junit:4.13.2".to_string()]);
    }

    #[tokio::test]
    async fn test_unconfigured_repository_is_rejected() {
        let (service, _) = service(config(true));
        let err = service
            .inspect_repository_delta("npm-remote")
            .await
            .unwrap_err();
        assert!(err
            .downcast_ref::<InspectionError>()
            .is_some_and(InspectionError::is_configuration));
    }

    #[tokio::test]
    async fn test_disabled_module_does_nothing() {
        let (service, scan) = service(config(false));

        assert!(!service.initialize_repository("maven-remote").await.unwrap().ran);
        assert_eq!(
            service.update_repository_metadata("maven-remote").await.unwrap(),
            UpdateOutcome::Skipped
        );
        assert_eq!(service.reinspect_failures(&[]).unwrap(), 0);
        assert!(scan.registered().is_empty());
    }

    #[test]
    fn test_status_report_lists_modules() {
        let (service, _) = service(config(true));
        let report = service.status_report();
        assert!(report.module(INSPECTION_MODULE).is_some_and(|m| m.enabled));
        assert!(report.module(POLICY_MODULE).is_some_and(|m| !m.enabled));
        assert_eq!(service.configured_repositories(), vec!["maven-remote".to_string()]);
    }
}
