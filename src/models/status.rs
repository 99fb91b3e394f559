use serde::{Deserialize, Serialize};

use super::result::SpecResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecStatus {
    Passed,
    Failed,
    Skipped,
}

impl SpecStatus {
    pub fn of(result: &SpecResult) -> Self {
        if result.skipped {
            SpecStatus::Skipped
        } else if result.success {
            SpecStatus::Passed
        } else {
            SpecStatus::Failed
        }
    }

    /// Only failures end up in the result tree.
    pub fn is_reportable(&self) -> bool {
        matches!(self, SpecStatus::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpecStatus::Passed => "passed",
            SpecStatus::Failed => "failed",
            SpecStatus::Skipped => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_wins_over_success_flag() {
        let result = SpecResult {
            success: true,
            skipped: true,
            ..Default::default()
        };
        assert_eq!(SpecStatus::of(&result), SpecStatus::Skipped);
    }

    #[test]
    fn unsuccessful_spec_is_reportable() {
        let result = SpecResult::default();
        let status = SpecStatus::of(&result);
        assert_eq!(status, SpecStatus::Failed);
        assert!(status.is_reportable());
    }
}
