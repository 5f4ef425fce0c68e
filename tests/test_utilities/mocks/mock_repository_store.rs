use bom_inspector::adapters::outbound::storage::InMemoryRepositoryStore;
use bom_inspector::ports::outbound::{ItemInfo, LayoutInfo};
use bom_inspector::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Mock RepositoryStore for testing
///
/// Delegates to an in-memory store and can be told to fail property writes
/// on chosen paths or to fail searches altogether.
pub struct MockRepositoryStore {
    pub inner: InMemoryRepositoryStore,
    failing_writes: Mutex<HashSet<RepoPath>>,
    fail_search: Mutex<bool>,
    writes: Mutex<usize>,
}

impl MockRepositoryStore {
    pub fn new(inner: InMemoryRepositoryStore) -> Self {
        Self {
            inner,
            failing_writes: Mutex::new(HashSet::new()),
            fail_search: Mutex::new(false),
            writes: Mutex::new(0),
        }
    }

    pub fn fail_writes_on(&self, path: &RepoPath) {
        self.failing_writes.lock().unwrap().insert(path.clone());
    }

    pub fn heal(&self) {
        self.failing_writes.lock().unwrap().clear();
        *self.fail_search.lock().unwrap() = false;
    }

    pub fn fail_searches(&self) {
        *self.fail_search.lock().unwrap() = true;
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn check_write(&self, path: &RepoPath) -> Result<()> {
        if self.failing_writes.lock().unwrap().contains(path) {
            anyhow::bail!("Simulated write failure on {}", path);
        }
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn check_search(&self) -> Result<()> {
        if *self.fail_search.lock().unwrap() {
            anyhow::bail!("Simulated search failure");
        }
        Ok(())
    }
}

impl RepositoryStore for MockRepositoryStore {
    fn item_info(&self, path: &RepoPath) -> Result<Option<ItemInfo>> {
        self.inner.item_info(path)
    }

    fn layout_info(&self, path: &RepoPath) -> Result<LayoutInfo> {
        self.inner.layout_info(path)
    }

    fn properties(&self, path: &RepoPath) -> Result<HashMap<String, String>> {
        self.inner.properties(path)
    }

    fn search_by_patterns(
        &self,
        repo_keys: &[String],
        patterns: &[String],
    ) -> Result<Vec<RepoPath>> {
        self.check_search()?;
        self.inner.search_by_patterns(repo_keys, patterns)
    }

    fn find_by_property(
        &self,
        repo_keys: &[String],
        key: &str,
        value: Option<&str>,
    ) -> Result<Vec<RepoPath>> {
        self.check_search()?;
        self.inner.find_by_property(repo_keys, key, value)
    }

    fn package_type(&self, repo_key: &str) -> Result<Option<String>> {
        self.inner.package_type(repo_key)
    }

    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64> {
        self.inner.artifact_count(repo_keys)
    }

    fn read_content(&self, path: &RepoPath) -> Result<Option<Vec<u8>>> {
        self.inner.read_content(path)
    }

    fn set_property(&self, path: &RepoPath, key: &str, value: &str) -> Result<()> {
        self.check_write(path)?;
        self.inner.set_property(path, key, value)
    }

    fn delete_property(&self, path: &RepoPath, key: &str) -> Result<()> {
        self.check_write(path)?;
        self.inner.delete_property(path, key)
    }

    fn delete_properties_with_prefix(&self, path: &RepoPath, prefix: &str) -> Result<()> {
        self.check_write(path)?;
        self.inner.delete_properties_with_prefix(path, prefix)
    }
}
