use std::collections::BTreeMap;

use crate::inspection::domain::{Notification, PolicyVulnerabilityAggregate, RepoPath};

/// Running per-artifact aggregates for one notification window.
///
/// Notifications are applied as they arrive; the book is flushed once at the
/// end of the window so each artifact receives a single write.
#[derive(Debug, Default)]
pub struct AggregateBook {
    entries: BTreeMap<RepoPath, PolicyVulnerabilityAggregate>,
}

impl AggregateBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one notification's payload into the aggregate of every given artifact
    pub fn apply(&mut self, notification: &Notification, artifacts: &[RepoPath]) {
        for path in artifacts {
            let aggregate = self.entries.entry(path.clone()).or_default();
            match notification {
                Notification::PolicyStatus(n) | Notification::PolicyOverride(n) => {
                    aggregate.merge_policy(n.policy_status, &n.component_version.url);
                }
                Notification::VulnerabilityUpdate(n) => {
                    aggregate.merge_vulnerabilities(n.vulnerabilities, &n.component_version.url);
                }
            }
        }
    }

    pub fn get(&self, path: &RepoPath) -> Option<&PolicyVulnerabilityAggregate> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (RepoPath, PolicyVulnerabilityAggregate)> {
        self.entries.into_iter()
    }
}
