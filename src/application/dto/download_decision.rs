/// Status code reported with every blocked download
pub const FORBIDDEN: u16 = 403;

/// Verdict of the before-download check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDecision {
    Allow,
    Block { reason: String, status: u16 },
}

impl DownloadDecision {
    pub fn block(reason: impl Into<String>) -> Self {
        DownloadDecision::Block {
            reason: reason.into(),
            status: FORBIDDEN,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, DownloadDecision::Block { .. })
    }
}
