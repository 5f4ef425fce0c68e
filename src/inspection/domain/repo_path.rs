use std::fmt;

/// Location of an item in the host repository manager: repository key + item path.
///
/// The repository root (empty item path) carries repository-level state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoPath {
    repo_key: String,
    path: String,
}

impl RepoPath {
    pub fn new(repo_key: impl Into<String>, path: impl AsRef<str>) -> Self {
        Self {
            repo_key: repo_key.into(),
            path: path.as_ref().trim_matches('/').to_string(),
        }
    }

    /// Root of a repository
    pub fn root(repo_key: impl Into<String>) -> Self {
        Self::new(repo_key, "")
    }

    /// Parses `repo-key/some/item/path`; a bare key yields the repository root
    pub fn parse(full_path: &str) -> Option<Self> {
        let trimmed = full_path.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.split_once('/') {
            Some((repo_key, path)) => Some(Self::new(repo_key, path)),
            None => Some(Self::root(trimmed)),
        }
    }

    pub fn repo_key(&self) -> &str {
        &self.repo_key
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Last path segment, the file name for an artifact
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// A sibling of this item in the same folder
    pub fn sibling(&self, name: &str) -> Self {
        match self.path.rsplit_once('/') {
            Some((parent, _)) => Self::new(self.repo_key.clone(), format!("{}/{}", parent, name)),
            None => Self::new(self.repo_key.clone(), name),
        }
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.repo_key)
        } else {
            write!(f, "{}/{}", self.repo_key, self.path)
        }
    }
}
