use super::property_store::PropertyStore;
use crate::inspection::domain::{Coordinate, ManifestSource, RepoPath, SupportedPackageType};
use crate::ports::outbound::RepositoryStore;
use crate::shared::Result;
use serde::Deserialize;
use tracing::{debug, warn};

/// Maximum manifest size read from the store (1 MB)
const MAX_MANIFEST_SIZE: usize = 1024 * 1024;

/// Name/version fields of a composer.json manifest
#[derive(Debug, Deserialize)]
struct ComposerManifest {
    name: Option<String>,
    version: Option<String>,
}

/// IdentifierResolver - Maps a stored artifact to its component coordinate
///
/// Strategies are tried in priority order and the first complete coordinate wins:
/// 1. Previously persisted forge + origin id
/// 2. Name/version properties written by the repository manager
/// 3. A manifest stored beside the artifact (only for package types whose
///    properties are unreliable)
/// 4. The repository layout (organization/module/revision)
///
/// Each strategy yields a complete coordinate or nothing.
pub struct IdentifierResolver<S: RepositoryStore> {
    properties: PropertyStore<S>,
}

impl<S: RepositoryStore> Clone for IdentifierResolver<S> {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
        }
    }
}

impl<S: RepositoryStore> IdentifierResolver<S> {
    pub fn new(properties: PropertyStore<S>) -> Self {
        Self { properties }
    }

    /// Resolves the coordinate of an artifact
    ///
    /// # Returns
    /// `None` when the package type is unsupported or no strategy produced a
    /// complete coordinate
    ///
    /// # Errors
    /// Only host store failures; unresolvable artifacts are not errors
    pub fn resolve(&self, path: &RepoPath) -> Result<Option<Coordinate>> {
        let store = self.properties.repository_store();
        let package_type = store.package_type(path.repo_key())?;

        let Some(supported) = package_type
            .as_deref()
            .and_then(SupportedPackageType::from_package_type)
        else {
            warn!(
                path = %path,
                package_type = package_type.as_deref().unwrap_or("<none>"),
                "Package type not supported"
            );
            return Ok(None);
        };

        if let Some(coordinate) = self.from_persisted(path)? {
            debug!(path = %path, strategy = "persisted", "Resolved coordinate");
            return Ok(Some(coordinate));
        }
        if let Some(coordinate) = self.from_package_properties(path, supported)? {
            debug!(path = %path, strategy = "properties", "Resolved coordinate");
            return Ok(Some(coordinate));
        }
        if let Some(coordinate) = self.from_manifest(path, supported)? {
            debug!(path = %path, strategy = "manifest", "Resolved coordinate");
            return Ok(Some(coordinate));
        }
        if let Some(coordinate) = self.from_layout(path, supported)? {
            debug!(path = %path, strategy = "layout", "Resolved coordinate");
            return Ok(Some(coordinate));
        }

        debug!(path = %path, "No strategy resolved a coordinate");
        Ok(None)
    }

    fn from_persisted(&self, path: &RepoPath) -> Result<Option<Coordinate>> {
        match self.properties.coordinate(path) {
            Ok(coordinate) => Ok(coordinate),
            // Unreadable persisted state falls through to the derived strategies
            Err(e) => {
                debug!(path = %path, error = %e, "Ignoring unreadable persisted coordinate");
                Ok(None)
            }
        }
    }

    fn from_package_properties(
        &self,
        path: &RepoPath,
        package_type: SupportedPackageType,
    ) -> Result<Option<Coordinate>> {
        let Some((name_key, version_key)) = package_type.name_version_properties() else {
            return Ok(None);
        };

        let name = self.properties.host_property(path, name_key)?;
        let version = self.properties.host_property(path, version_key)?;

        Ok(match (name, version) {
            (Some(name), Some(version)) => {
                Coordinate::name_version(package_type.forge(), &name, &version)
            }
            _ => None,
        })
    }

    fn from_manifest(
        &self,
        path: &RepoPath,
        package_type: SupportedPackageType,
    ) -> Result<Option<Coordinate>> {
        let Some(source) = package_type.manifest() else {
            return Ok(None);
        };

        let manifest_path = path.sibling(source.file_name());
        let Some(content) = self.properties.repository_store().read_content(&manifest_path)? else {
            return Ok(None);
        };

        if content.len() > MAX_MANIFEST_SIZE {
            warn!(path = %manifest_path, size = content.len(), "Manifest too large, skipping");
            return Ok(None);
        }

        match source {
            ManifestSource::ComposerJson => {
                let manifest: ComposerManifest = match serde_json::from_slice(&content) {
                    Ok(manifest) => manifest,
                    Err(e) => {
                        warn!(path = %manifest_path, error = %e, "Unparseable composer.json");
                        return Ok(None);
                    }
                };
                Ok(match (manifest.name, manifest.version) {
                    (Some(name), Some(version)) => {
                        Coordinate::name_version(package_type.forge(), &name, &version)
                    }
                    _ => None,
                })
            }
        }
    }

    fn from_layout(
        &self,
        path: &RepoPath,
        package_type: SupportedPackageType,
    ) -> Result<Option<Coordinate>> {
        let layout = self.properties.repository_store().layout_info(path)?;
        let module = layout.module.unwrap_or_default();
        let revision = layout.base_revision.unwrap_or_default();

        Ok(match package_type {
            SupportedPackageType::Maven | SupportedPackageType::Gradle => {
                let organization = layout.organization.unwrap_or_default();
                Coordinate::maven(&organization, &module, &revision)
            }
            _ => Coordinate::name_version(package_type.forge(), &module, &revision),
        })
    }
}
