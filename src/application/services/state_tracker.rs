use super::property_store::PropertyStore;
use crate::inspection::domain::{
    BomComponent, Coordinate, InspectionProperty, InspectionStatus, RepoPath,
};
use crate::ports::outbound::RepositoryStore;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// InspectionStateTracker - Per-path inspection state machine
///
/// Owns the status / retry counter / failure reason triple for artifacts and
/// repository roots. The retry ceiling is fixed at construction.
pub struct InspectionStateTracker<S: RepositoryStore> {
    properties: PropertyStore<S>,
    max_retries: u32,
}

impl<S: RepositoryStore> Clone for InspectionStateTracker<S> {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
            max_retries: self.max_retries,
        }
    }
}

impl<S: RepositoryStore> InspectionStateTracker<S> {
    pub fn new(properties: PropertyStore<S>, max_retries: u32) -> Self {
        Self {
            properties,
            max_retries,
        }
    }

    pub fn properties(&self) -> &PropertyStore<S> {
        &self.properties
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Status with absence read as PENDING
    pub fn status(&self, path: &RepoPath) -> Result<InspectionStatus> {
        Ok(self
            .properties
            .inspection_status(path)?
            .unwrap_or(InspectionStatus::Pending))
    }

    pub fn assert_status(&self, path: &RepoPath, expected: InspectionStatus) -> Result<bool> {
        Ok(self.status(path)? == expected)
    }

    /// Records a failed attempt: bumps the retry counter, stores the reason
    pub fn mark_failure(&self, path: &RepoPath, reason: &str) -> Result<()> {
        let attempts = self.properties.retry_count(path)?.saturating_add(1);
        warn!(path = %path, attempts, reason, "Inspection failed");

        self.properties.set_retry_count(path, attempts)?;
        self.properties.set_failure_reason(path, reason)?;
        self.properties
            .set_inspection_status(path, InspectionStatus::Failure)
    }

    /// True iff the path is FAILURE and still below the retry ceiling
    pub fn should_retry(&self, path: &RepoPath) -> Result<bool> {
        if !self.assert_status(path, InspectionStatus::Failure)? {
            return Ok(false);
        }
        Ok(self.properties.retry_count(path)? < self.max_retries)
    }

    /// PENDING, or FAILURE with retries left
    pub fn is_pending_or_retryable(&self, path: &RepoPath) -> Result<bool> {
        Ok(self.assert_status(path, InspectionStatus::Pending)? || self.should_retry(path)?)
    }

    /// Persists registration results and marks the path SUCCESS.
    ///
    /// The coordinate is required so SUCCESS can only follow a resolved identity.
    pub fn mark_success(
        &self,
        path: &RepoPath,
        coordinate: &Coordinate,
        component: &BomComponent,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.properties.set_coordinate(path, coordinate)?;
        self.properties.set_bom_component(path, component)?;
        self.properties
            .delete(path, InspectionProperty::InspectionStatusMessage)?;
        self.properties
            .delete(path, InspectionProperty::InspectionRetryCount)?;
        self.properties
            .set_timestamp(path, InspectionProperty::LastInspection, at)?;
        self.properties
            .set_inspection_status(path, InspectionStatus::Success)?;

        debug!(path = %path, coordinate = %coordinate, "Inspection succeeded");
        Ok(())
    }

    /// Whether a coordinate was already recorded for the path
    pub fn has_identifier_properties(&self, path: &RepoPath) -> Result<bool> {
        let forge = self.properties.get(path, InspectionProperty::Forge)?;
        let origin_id = self.properties.get(path, InspectionProperty::OriginId)?;
        Ok(forge.is_some() && origin_id.is_some())
    }

    /// Records a freshly resolved coordinate and puts the path back to PENDING.
    ///
    /// Resets the retry counter, so callers must not invoke it for paths that
    /// already carry identifier properties.
    pub fn record_coordinate(&self, path: &RepoPath, coordinate: &Coordinate) -> Result<()> {
        self.properties.set_coordinate(path, coordinate)?;
        self.properties
            .delete(path, InspectionProperty::InspectionStatusMessage)?;
        self.properties.set_retry_count(path, 0)?;
        self.properties
            .set_inspection_status(path, InspectionStatus::Pending)
    }

    /// Marks a repository root SUCCESS after its initial scan
    pub fn mark_repository_success(&self, repo_key: &str, at: DateTime<Utc>) -> Result<()> {
        let root = RepoPath::root(repo_key);
        self.properties
            .delete(&root, InspectionProperty::InspectionStatusMessage)?;
        self.properties
            .delete(&root, InspectionProperty::InspectionRetryCount)?;
        self.properties
            .set_timestamp(&root, InspectionProperty::LastInspection, at)?;
        self.properties
            .set_inspection_status(&root, InspectionStatus::Success)
    }
}
