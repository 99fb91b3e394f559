pub mod browser;
pub mod report;
pub mod result;
pub mod stats;
pub mod status;
pub mod tree;

pub use browser::{Browser, BrowserError, BrowserLog};
pub use report::RunReport;
pub use result::{SpecResult, Stats};
pub use stats::StatsAggregator;
pub use status::SpecStatus;
pub use tree::{FailureNode, NodeKind, ResultTree};
