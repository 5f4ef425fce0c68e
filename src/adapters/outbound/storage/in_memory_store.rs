use crate::inspection::domain::RepoPath;
use crate::inspection::services::ArtifactPatterns;
use crate::ports::outbound::{ItemInfo, LayoutInfo, RepositoryStore};
use crate::shared::error::InspectionError;
use crate::shared::security::{read_guarded, MAX_SNAPSHOT_SIZE};
use crate::shared::Result;
use anyhow::Context;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
struct StoredItem {
    is_folder: bool,
    layout: LayoutInfo,
    properties: BTreeMap<String, String>,
    content: Option<Vec<u8>>,
}

/// InMemoryRepositoryStore adapter backed by concurrent maps
///
/// Stands in for the host repository manager: the CLI loads it from a JSON
/// snapshot, runs a command, and saves the mutated properties back.
/// Every property write touches one key under the item's shard lock.
#[derive(Debug, Default)]
pub struct InMemoryRepositoryStore {
    package_types: DashMap<String, Option<String>>,
    items: DashMap<RepoPath, StoredItem>,
}

impl InMemoryRepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repository; its root carries repository-level properties
    pub fn add_repository(&self, repo_key: &str, package_type: Option<&str>) {
        self.package_types
            .insert(repo_key.to_string(), package_type.map(str::to_string));
        self.items.entry(RepoPath::root(repo_key)).or_insert(StoredItem {
            is_folder: true,
            ..StoredItem::default()
        });
    }

    pub fn add_artifact(&self, path: RepoPath, layout: LayoutInfo) {
        self.items.insert(
            path,
            StoredItem {
                layout,
                ..StoredItem::default()
            },
        );
    }

    pub fn add_file(&self, path: RepoPath, content: impl Into<Vec<u8>>) {
        self.items.insert(
            path,
            StoredItem {
                content: Some(content.into()),
                ..StoredItem::default()
            },
        );
    }

    pub fn add_folder(&self, path: RepoPath) {
        self.items.insert(
            path,
            StoredItem {
                is_folder: true,
                ..StoredItem::default()
            },
        );
    }

    /// Loads a store from a JSON snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_guarded(path, "snapshot", MAX_SNAPSHOT_SIZE)?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }

    /// Writes the current state back as a JSON snapshot
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        let store = Self::new();

        for repository in snapshot.repositories {
            store.add_repository(&repository.key, repository.package_type.as_deref());
            if let Some(mut root) = store.items.get_mut(&RepoPath::root(&repository.key)) {
                root.properties = repository.properties;
            }

            for item in repository.items {
                let layout = item.layout.unwrap_or_default();
                store.items.insert(
                    RepoPath::new(repository.key.clone(), &item.path),
                    StoredItem {
                        is_folder: item.folder,
                        layout: LayoutInfo {
                            organization: layout.organization,
                            module: layout.module,
                            base_revision: layout.base_revision,
                        },
                        properties: item.properties,
                        content: item.content.map(String::into_bytes),
                    },
                );
            }
        }

        Ok(store)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut repositories: BTreeMap<String, RepositorySnapshot> = self
            .package_types
            .iter()
            .map(|entry| {
                (
                    entry.key().clone(),
                    RepositorySnapshot {
                        key: entry.key().clone(),
                        package_type: entry.value().clone(),
                        ..RepositorySnapshot::default()
                    },
                )
            })
            .collect();

        let mut items: Vec<(RepoPath, StoredItem)> = self
            .items
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));

        for (path, item) in items {
            let repository = repositories
                .entry(path.repo_key().to_string())
                .or_insert_with(|| RepositorySnapshot {
                    key: path.repo_key().to_string(),
                    ..RepositorySnapshot::default()
                });

            if path.is_root() {
                repository.properties = item.properties;
                continue;
            }

            let has_layout = item.layout != LayoutInfo::default();
            repository.items.push(ItemSnapshot {
                path: path.path().to_string(),
                folder: item.is_folder,
                layout: has_layout.then(|| LayoutSnapshot {
                    organization: item.layout.organization,
                    module: item.layout.module,
                    base_revision: item.layout.base_revision,
                }),
                properties: item.properties,
                content: item
                    .content
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
            });
        }

        let snapshot = Snapshot {
            repositories: repositories.into_values().collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn missing(path: &RepoPath) -> anyhow::Error {
        InspectionError::store("lookup", format!("No item at '{}'", path)).into()
    }
}

impl RepositoryStore for InMemoryRepositoryStore {
    fn item_info(&self, path: &RepoPath) -> Result<Option<ItemInfo>> {
        Ok(self.items.get(path).map(|item| ItemInfo {
            is_folder: item.is_folder,
            name: if path.is_root() {
                path.repo_key().to_string()
            } else {
                path.name().to_string()
            },
        }))
    }

    fn layout_info(&self, path: &RepoPath) -> Result<LayoutInfo> {
        Ok(self
            .items
            .get(path)
            .map(|item| item.layout.clone())
            .unwrap_or_default())
    }

    fn properties(&self, path: &RepoPath) -> Result<HashMap<String, String>> {
        Ok(self
            .items
            .get(path)
            .map(|item| item.properties.clone().into_iter().collect())
            .unwrap_or_default())
    }

    fn search_by_patterns(
        &self,
        repo_keys: &[String],
        patterns: &[String],
    ) -> Result<Vec<RepoPath>> {
        let matcher = ArtifactPatterns::new(patterns)?;

        let mut found: Vec<RepoPath> = self
            .items
            .iter()
            .filter(|entry| {
                let path = entry.key();
                !entry.value().is_folder
                    && repo_keys.iter().any(|k| k == path.repo_key())
                    && matcher.matches(path.name())
            })
            .map(|entry| entry.key().clone())
            .collect();
        found.sort();
        Ok(found)
    }

    fn find_by_property(
        &self,
        repo_keys: &[String],
        key: &str,
        value: Option<&str>,
    ) -> Result<Vec<RepoPath>> {
        let mut found: Vec<RepoPath> = self
            .items
            .iter()
            .filter(|entry| repo_keys.iter().any(|k| k == entry.key().repo_key()))
            .filter(|entry| match (entry.value().properties.get(key), value) {
                (Some(_), None) => true,
                (Some(stored), Some(expected)) => stored == expected,
                (None, _) => false,
            })
            .map(|entry| entry.key().clone())
            .collect();
        found.sort();
        Ok(found)
    }

    fn package_type(&self, repo_key: &str) -> Result<Option<String>> {
        Ok(self
            .package_types
            .get(repo_key)
            .and_then(|entry| entry.value().clone()))
    }

    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64> {
        let count = self
            .items
            .iter()
            .filter(|entry| {
                !entry.value().is_folder && repo_keys.iter().any(|k| k == entry.key().repo_key())
            })
            .count();
        Ok(count as u64)
    }

    fn read_content(&self, path: &RepoPath) -> Result<Option<Vec<u8>>> {
        Ok(self.items.get(path).and_then(|item| item.content.clone()))
    }

    fn set_property(&self, path: &RepoPath, key: &str, value: &str) -> Result<()> {
        let mut item = self.items.get_mut(path).ok_or_else(|| Self::missing(path))?;
        item.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_property(&self, path: &RepoPath, key: &str) -> Result<()> {
        if let Some(mut item) = self.items.get_mut(path) {
            item.properties.remove(key);
        }
        Ok(())
    }

    fn delete_properties_with_prefix(&self, path: &RepoPath, prefix: &str) -> Result<()> {
        if let Some(mut item) = self.items.get_mut(path) {
            item.properties.retain(|key, _| !key.starts_with(prefix));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    repositories: Vec<RepositorySnapshot>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RepositorySnapshot {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    items: Vec<ItemSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemSnapshot {
    path: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<LayoutSnapshot>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayoutSnapshot {
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    base_revision: Option<String>,
}
