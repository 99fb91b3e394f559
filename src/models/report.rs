use super::browser::{Browser, BrowserError, BrowserLog};
use super::result::Stats;
use super::stats::StatsAggregator;
use super::tree::ResultTree;

/// Everything accumulated during one run. Reset at every run start.
#[derive(Debug, Default)]
pub struct RunReport {
    pub tree: ResultTree,
    pub stats: StatsAggregator,
    pub logs: Vec<BrowserLog>,
    pub browser_errors: Vec<BrowserError>,
    /// Numbers printed failures across the whole run.
    pub failure_counter: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.tree.clear();
        self.stats.reset();
        self.logs.clear();
        self.browser_errors.clear();
        self.failure_counter = 0;
    }

    pub fn totals(&self) -> Stats {
        self.stats.total()
    }

    /// Append a console message to the log of `browser`, creating it on first use.
    pub fn push_log(&mut self, browser: &Browser, message: String) {
        match self.logs.iter_mut().find(|l| l.browser_id == browser.id) {
            Some(log) => log.messages.push(message),
            None => self.logs.push(BrowserLog {
                browser_id: browser.id.clone(),
                browser_name: browser.name.clone(),
                messages: vec![message],
            }),
        }
    }

    pub fn push_browser_error(&mut self, browser: &Browser, error: String) {
        self.browser_errors.push(BrowserError {
            browser_name: browser.name.clone(),
            error,
        });
    }
}
