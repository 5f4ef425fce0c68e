use crate::inspection::domain::RepoPath;

/// An artifact that could not be inspected in a delta pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFailure {
    pub path: RepoPath,
    pub reason: String,
}

/// DeltaReport - Outcome of one repository's delta inspection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaReport {
    pub repo_key: String,
    /// False when the repository has not completed its initial scan
    pub ran: bool,
    pub succeeded: Vec<RepoPath>,
    pub failed: Vec<ArtifactFailure>,
}

impl DeltaReport {
    pub fn new(repo_key: impl Into<String>) -> Self {
        Self {
            repo_key: repo_key.into(),
            ran: true,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn skipped(repo_key: impl Into<String>) -> Self {
        Self {
            ran: false,
            ..Self::new(repo_key)
        }
    }

    pub fn candidates(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn summary(&self) -> String {
        if !self.ran {
            return "skipped (repository not initialized)".to_string();
        }
        format!(
            "{} inspected, {} succeeded, {} failed",
            self.candidates(),
            self.succeeded.len(),
            self.failed.len()
        )
    }
}
