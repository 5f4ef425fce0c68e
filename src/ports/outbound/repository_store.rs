use crate::inspection::domain::RepoPath;
use crate::shared::Result;
use std::collections::HashMap;

/// Basic facts about an item in the host repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub is_folder: bool,
    pub name: String,
}

/// Layout-derived coordinates of an artifact path
///
/// Any field may be missing when the repository layout cannot explain the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutInfo {
    pub organization: Option<String>,
    pub module: Option<String>,
    pub base_revision: Option<String>,
}

/// RepositoryStore port for the host repository manager
///
/// This port abstracts item lookup, pattern search and per-path key/value
/// metadata. The metadata facility is the only persistence layer; writes are
/// assumed atomic per key but not across keys.
///
/// Implementations must be `Send + Sync` so repositories can be processed
/// concurrently.
pub trait RepositoryStore: Send + Sync {
    /// Returns `None` when nothing exists at the path
    fn item_info(&self, path: &RepoPath) -> Result<Option<ItemInfo>>;

    fn layout_info(&self, path: &RepoPath) -> Result<LayoutInfo>;

    /// All properties currently set on the path
    fn properties(&self, path: &RepoPath) -> Result<HashMap<String, String>>;

    /// Finds files in the given repositories whose name matches any wildcard pattern
    fn search_by_patterns(&self, repo_keys: &[String], patterns: &[String])
        -> Result<Vec<RepoPath>>;

    /// Finds paths carrying `key`, optionally restricted to an exact value
    fn find_by_property(
        &self,
        repo_keys: &[String],
        key: &str,
        value: Option<&str>,
    ) -> Result<Vec<RepoPath>>;

    /// Package type of a repository (e.g. `maven`, `npm`); `None` if unknown
    fn package_type(&self, repo_key: &str) -> Result<Option<String>>;

    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64>;

    /// Raw content of a stored file, used for manifests stored beside artifacts
    fn read_content(&self, path: &RepoPath) -> Result<Option<Vec<u8>>>;

    fn set_property(&self, path: &RepoPath, key: &str, value: &str) -> Result<()>;

    fn delete_property(&self, path: &RepoPath, key: &str) -> Result<()>;

    /// Deletes every property on the path whose key starts with `prefix`
    fn delete_properties_with_prefix(&self, path: &RepoPath, prefix: &str) -> Result<()>;
}
