use serde::{Deserialize, Serialize};

use super::result::Stats;

/// Browser descriptor as reported by the host runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Browser {
    pub id: String,
    pub name: String,
    /// The browser's cumulative counts for the current run.
    pub last_result: Stats,
}

impl Browser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            last_result: Stats::default(),
        }
    }

    pub fn with_result(mut self, last_result: Stats) -> Self {
        self.last_result = last_result;
        self
    }
}

/// Console output captured from one browser instance.
#[derive(Debug, Clone)]
pub struct BrowserLog {
    pub browser_id: String,
    pub browser_name: String,
    pub messages: Vec<String>,
}

/// A browser-level failure that is not tied to any spec (compile or runtime error).
#[derive(Debug, Clone)]
pub struct BrowserError {
    pub browser_name: String,
    pub error: String,
}
