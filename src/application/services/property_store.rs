use crate::inspection::domain::{
    BomComponent, Coordinate, Forge, InspectionProperty, InspectionStatus, NameVersion,
    PolicyStatus, PolicyVulnerabilityAggregate, ProjectVersion, RepoPath, UpdateStatus,
    VulnerabilityAggregate, PROPERTY_PREFIX,
};
use crate::ports::outbound::RepositoryStore;
use crate::shared::error::InspectionError;
use crate::shared::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::str::FromStr;
use std::sync::Arc;

/// PropertyStore - Typed access to inspection state kept as string properties
///
/// Every read of a persisted value goes through here; no other component
/// parses property strings. Values that do not parse are reported as
/// `InspectionError::MalformedState` rather than silently reinterpreted.
pub struct PropertyStore<S: RepositoryStore> {
    store: Arc<S>,
}

impl<S: RepositoryStore> Clone for PropertyStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RepositoryStore> PropertyStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn repository_store(&self) -> &S {
        &self.store
    }

    /// Raw value, with blank values treated as absent
    pub fn get(&self, path: &RepoPath, property: InspectionProperty) -> Result<Option<String>> {
        let properties = self.store.properties(path)?;
        Ok(properties
            .get(property.key())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// A property written by the host repository manager itself (e.g. `npm.name`)
    pub fn host_property(&self, path: &RepoPath, key: &str) -> Result<Option<String>> {
        let properties = self.store.properties(path)?;
        Ok(properties
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    pub fn set(&self, path: &RepoPath, property: InspectionProperty, value: &str) -> Result<()> {
        self.store.set_property(path, property.key(), value)
    }

    pub fn delete(&self, path: &RepoPath, property: InspectionProperty) -> Result<()> {
        self.store.delete_property(path, property.key())
    }

    fn parse<T>(&self, path: &RepoPath, property: InspectionProperty) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(path, property)? {
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
                InspectionError::malformed(
                    path,
                    format!("Property {} has an invalid value '{}': {}", property.key(), raw, e),
                )
                .into()
            }),
            None => Ok(None),
        }
    }

    // Inspection state

    /// Stored status; `None` means the path was never inspected (implicitly PENDING)
    pub fn inspection_status(&self, path: &RepoPath) -> Result<Option<InspectionStatus>> {
        self.parse(path, InspectionProperty::InspectionStatus)
    }

    pub fn set_inspection_status(&self, path: &RepoPath, status: InspectionStatus) -> Result<()> {
        self.set(path, InspectionProperty::InspectionStatus, status.as_str())
    }

    /// Retry counter; absent means zero
    pub fn retry_count(&self, path: &RepoPath) -> Result<u32> {
        Ok(self
            .parse::<u32>(path, InspectionProperty::InspectionRetryCount)?
            .unwrap_or(0))
    }

    pub fn set_retry_count(&self, path: &RepoPath, count: u32) -> Result<()> {
        self.set(
            path,
            InspectionProperty::InspectionRetryCount,
            &count.to_string(),
        )
    }

    pub fn failure_reason(&self, path: &RepoPath) -> Result<Option<String>> {
        self.get(path, InspectionProperty::InspectionStatusMessage)
    }

    pub fn set_failure_reason(&self, path: &RepoPath, reason: &str) -> Result<()> {
        self.set(path, InspectionProperty::InspectionStatusMessage, reason)
    }

    /// Persisted coordinate, rebuilt from the forge and origin id properties
    pub fn coordinate(&self, path: &RepoPath) -> Result<Option<Coordinate>> {
        let forge = self.parse::<Forge>(path, InspectionProperty::Forge)?;
        let origin_id = self.get(path, InspectionProperty::OriginId)?;
        Ok(match (forge, origin_id) {
            (Some(forge), Some(origin_id)) => Coordinate::from_origin_id(forge, &origin_id),
            _ => None,
        })
    }

    pub fn set_coordinate(&self, path: &RepoPath, coordinate: &Coordinate) -> Result<()> {
        self.set(path, InspectionProperty::Forge, coordinate.forge().name())?;
        self.set(path, InspectionProperty::OriginId, &coordinate.origin_id())
    }

    // Timestamps

    pub fn timestamp(
        &self,
        path: &RepoPath,
        property: InspectionProperty,
    ) -> Result<Option<DateTime<Utc>>> {
        match self.get(path, property)? {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(|e| {
                    InspectionError::malformed(
                        path,
                        format!(
                            "Property {} is not an RFC 3339 timestamp '{}': {}",
                            property.key(),
                            raw,
                            e
                        ),
                    )
                    .into()
                }),
            None => Ok(None),
        }
    }

    pub fn set_timestamp(
        &self,
        path: &RepoPath,
        property: InspectionProperty,
        value: DateTime<Utc>,
    ) -> Result<()> {
        self.set(
            path,
            property,
            &value.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }

    pub fn last_inspection(&self, path: &RepoPath) -> Result<Option<DateTime<Utc>>> {
        self.timestamp(path, InspectionProperty::LastInspection)
    }

    pub fn last_update(&self, path: &RepoPath) -> Result<Option<DateTime<Utc>>> {
        self.timestamp(path, InspectionProperty::LastUpdate)
    }

    // Update state

    pub fn update_status(&self, path: &RepoPath) -> Result<Option<UpdateStatus>> {
        self.parse(path, InspectionProperty::UpdateStatus)
    }

    pub fn set_update_status(&self, path: &RepoPath, status: UpdateStatus) -> Result<()> {
        self.set(path, InspectionProperty::UpdateStatus, status.as_str())
    }

    // Policy and vulnerabilities

    pub fn policy_status(&self, path: &RepoPath) -> Result<Option<PolicyStatus>> {
        self.parse(path, InspectionProperty::PolicyStatus)
    }

    pub fn vulnerabilities(&self, path: &RepoPath) -> Result<Option<VulnerabilityAggregate>> {
        let critical = self.parse::<u32>(path, InspectionProperty::CriticalVulnerabilities)?;
        let high = self.parse::<u32>(path, InspectionProperty::HighVulnerabilities)?;
        let medium = self.parse::<u32>(path, InspectionProperty::MediumVulnerabilities)?;
        let low = self.parse::<u32>(path, InspectionProperty::LowVulnerabilities)?;

        if critical.is_none() && high.is_none() && medium.is_none() && low.is_none() {
            return Ok(None);
        }
        Ok(Some(VulnerabilityAggregate::new(
            critical.unwrap_or(0),
            high.unwrap_or(0),
            medium.unwrap_or(0),
            low.unwrap_or(0),
        )))
    }

    fn set_vulnerabilities(
        &self,
        path: &RepoPath,
        vulnerabilities: &VulnerabilityAggregate,
    ) -> Result<()> {
        self.set(
            path,
            InspectionProperty::CriticalVulnerabilities,
            &vulnerabilities.critical.to_string(),
        )?;
        self.set(
            path,
            InspectionProperty::HighVulnerabilities,
            &vulnerabilities.high.to_string(),
        )?;
        self.set(
            path,
            InspectionProperty::MediumVulnerabilities,
            &vulnerabilities.medium.to_string(),
        )?;
        self.set(
            path,
            InspectionProperty::LowVulnerabilities,
            &vulnerabilities.low.to_string(),
        )
    }

    /// Writes only the fields present in the aggregate
    pub fn set_policy_and_vulnerabilities(
        &self,
        path: &RepoPath,
        aggregate: &PolicyVulnerabilityAggregate,
    ) -> Result<()> {
        if let Some(status) = aggregate.policy_status {
            self.set(path, InspectionProperty::PolicyStatus, status.as_str())?;
        }
        if let Some(vulnerabilities) = &aggregate.vulnerabilities {
            self.set_vulnerabilities(path, vulnerabilities)?;
        }
        if let Some(url) = &aggregate.component_version_url {
            self.set(path, InspectionProperty::ComponentVersionUrl, url)?;
        }
        Ok(())
    }

    /// Persists what registration in a BOM reported about the component
    pub fn set_bom_component(&self, path: &RepoPath, component: &BomComponent) -> Result<()> {
        self.set_policy_and_vulnerabilities(
            path,
            &PolicyVulnerabilityAggregate {
                policy_status: component.policy_status,
                vulnerabilities: Some(component.vulnerabilities),
                component_version_url: Some(component.component_version_url.clone()),
            },
        )
    }

    // Repository-level state

    /// Project name and version a repository is registered under
    pub fn project(&self, repo_key: &str) -> Result<Option<NameVersion>> {
        let root = RepoPath::root(repo_key);
        let name = self.get(&root, InspectionProperty::ProjectName)?;
        let version = self.get(&root, InspectionProperty::ProjectVersionName)?;
        Ok(match (name, version) {
            (Some(name), Some(version)) => Some(NameVersion::new(name, version)),
            _ => None,
        })
    }

    pub fn set_project(&self, repo_key: &str, project_version: &ProjectVersion) -> Result<()> {
        let root = RepoPath::root(repo_key);
        self.set(
            &root,
            InspectionProperty::ProjectName,
            &project_version.project_name,
        )?;
        self.set(
            &root,
            InspectionProperty::ProjectVersionName,
            &project_version.version_name,
        )?;
        if let Some(ui_url) = &project_version.ui_url {
            self.set(&root, InspectionProperty::ProjectVersionUiUrl, ui_url)?;
        }
        Ok(())
    }

    // Bulk operations

    /// Removes the given properties, or every inspection property when the list is empty
    pub fn clear(&self, path: &RepoPath, properties: &[InspectionProperty]) -> Result<()> {
        if properties.is_empty() {
            return self.store.delete_properties_with_prefix(path, PROPERTY_PREFIX);
        }
        for property in properties {
            self.delete(path, *property)?;
        }
        Ok(())
    }

    pub fn paths_with_status(
        &self,
        repo_keys: &[String],
        status: InspectionStatus,
    ) -> Result<Vec<RepoPath>> {
        self.store.find_by_property(
            repo_keys,
            InspectionProperty::InspectionStatus.key(),
            Some(status.as_str()),
        )
    }

    /// Every path in the repositories that carries an inspection status
    pub fn inspected_paths(&self, repo_keys: &[String]) -> Result<Vec<RepoPath>> {
        self.store
            .find_by_property(repo_keys, InspectionProperty::InspectionStatus.key(), None)
    }

    /// Artifacts whose persisted coordinate has this forge and origin id
    pub fn paths_with_origin(
        &self,
        repo_keys: &[String],
        forge: &str,
        origin_id: &str,
    ) -> Result<Vec<RepoPath>> {
        let candidates = self.store.find_by_property(
            repo_keys,
            InspectionProperty::OriginId.key(),
            Some(origin_id),
        )?;

        let mut matched = Vec::with_capacity(candidates.len());
        for path in candidates {
            let stored = self.get(&path, InspectionProperty::Forge)?;
            if stored.is_some_and(|f| f.eq_ignore_ascii_case(forge)) {
                matched.push(path);
            }
        }
        Ok(matched)
    }
}
