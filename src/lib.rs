//! Console reporter for browser test runs: a live progress chart while specs
//! execute, then a tree of failures, captured console logs and a stats line.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod runner;
pub mod terminal;
pub mod ui;

pub use app::{HostEvent, Lifecycle, Reporter, RunPhase, handle_host_event};
pub use config::Config;
pub use error::{Error, Result};
pub use terminal::{CrosstermTerminal, Terminal};
