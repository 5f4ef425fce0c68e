/// Per-repository result of a scheduled sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOutcome {
    Completed(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepEntry {
    pub repo_key: String,
    pub outcome: RepositoryOutcome,
}

/// SweepReport - Collected results of one sweep over all configured repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    pub fn push(&mut self, repo_key: impl Into<String>, outcome: RepositoryOutcome) {
        self.entries.push(SweepEntry {
            repo_key: repo_key.into(),
            outcome,
        });
    }

    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, RepositoryOutcome::Failed(_)))
    }
}
