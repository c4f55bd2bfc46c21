use serde::{Deserialize, Serialize};

/// Share of the task's URLs that must be scanned before a run counts as complete.
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 0.9;

/// Tunables for a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub completion_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
        }
    }
}
