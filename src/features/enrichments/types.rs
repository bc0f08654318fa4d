use serde::{Deserialize, Serialize};

/// Usage counters shown on the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EnrichmentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub credits_used: u64,
    #[serde(default)]
    pub credits_remaining: Option<u64>,
}

impl EnrichmentStats {
    /// Completed share of finished enrichments, `None` before any finished.
    #[must_use]
    pub fn success_rate(&self) -> Option<f64> {
        let finished = self.completed + self.failed;
        if finished == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.completed as f64 / finished as f64)
    }
}
