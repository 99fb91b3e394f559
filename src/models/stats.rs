use std::collections::HashMap;

use super::result::Stats;

/// Latest counters per browser id, summed into a grand total on every update.
///
/// Browsers report cumulative counts in any interleaving, so a later snapshot
/// for an id replaces the earlier one and the total is recomputed from scratch.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    browsers: HashMap<String, Stats>,
    total: Stats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for `browser_id` and return the new grand total.
    pub fn upsert(&mut self, browser_id: &str, counts: Stats) -> Stats {
        self.browsers.insert(browser_id.to_string(), counts);
        self.total = self
            .browsers
            .values()
            .fold(Stats::default(), |mut acc, &stats| {
                acc += stats;
                acc
            });
        self.total
    }

    /// Register a browser without overwriting a snapshot it already has.
    /// Returns true if the id was not known before.
    pub fn register(&mut self, browser_id: &str, counts: Stats) -> bool {
        if self.browsers.contains_key(browser_id) {
            return false;
        }
        self.upsert(browser_id, counts);
        true
    }

    pub fn total(&self) -> Stats {
        self.total
    }

    pub fn get(&self, browser_id: &str) -> Option<Stats> {
        self.browsers.get(browser_id).copied()
    }

    pub fn len(&self) -> usize {
        self.browsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }

    pub fn reset(&mut self) {
        self.browsers.clear();
        self.total = Stats::default();
    }
}
