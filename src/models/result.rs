use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Pass/fail/skip counters for one browser or for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl Stats {
    pub fn new(success: usize, failed: usize, skipped: usize, total: usize) -> Self {
        Self {
            success,
            failed,
            skipped,
            total,
        }
    }

    /// Number of specs that have reported an outcome.
    pub fn completed(&self) -> usize {
        self.success
            .saturating_add(self.failed)
            .saturating_add(self.skipped)
    }

    /// True once every expected spec has reported.
    pub fn is_complete(&self) -> bool {
        self.completed() == self.total
    }
}

/// Saturates; counts come straight from the host.
impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.success = self.success.saturating_add(rhs.success);
        self.failed = self.failed.saturating_add(rhs.failed);
        self.skipped = self.skipped.saturating_add(rhs.skipped);
        self.total = self.total.saturating_add(rhs.total);
    }
}

/// Outcome of a single spec as handed over by the host runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecResult {
    /// Enclosing suite names, outermost first.
    pub suite: Vec<String>,
    pub description: String,
    pub success: bool,
    pub skipped: bool,
    /// Error output; entries may span several lines.
    pub log: Vec<String>,
}

impl SpecResult {
    /// The log flattened to individual lines, in emission order.
    pub fn error_lines(&self) -> Vec<String> {
        self.log
            .iter()
            .flat_map(|entry| entry.lines())
            .map(str::to_string)
            .collect()
    }
}
