use serde::Deserialize;

use crate::{
    app::Lifecycle,
    error::Result,
    models::{Browser, SpecResult},
    ui::theme::strip_ansi,
};

/// One lifecycle call from the host runner, as carried on the NDJSON stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostEvent {
    RunStart {
        #[serde(default)]
        browsers: Vec<Browser>,
    },
    BrowserStart {
        browser: Browser,
    },
    BrowserLog {
        browser: Browser,
        message: String,
    },
    SpecComplete {
        browser: Browser,
        result: SpecResult,
    },
    BrowserError {
        browser: Browser,
        /// Usually a string; structured errors are kept as their JSON text.
        error: serde_json::Value,
    },
    RunComplete,
}

impl HostEvent {
    /// Parse one NDJSON line. Returns `None` for anything that is not an event.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::RunStart { .. } => "run-start",
            HostEvent::BrowserStart { .. } => "browser-start",
            HostEvent::BrowserLog { .. } => "browser-log",
            HostEvent::SpecComplete { .. } => "spec-complete",
            HostEvent::BrowserError { .. } => "browser-error",
            HostEvent::RunComplete => "run-complete",
        }
    }
}

/// Apply a host event to the reporter.
pub fn handle_host_event(reporter: &mut impl Lifecycle, event: HostEvent) -> Result<()> {
    match event {
        HostEvent::RunStart { browsers } => reporter.on_run_start(&browsers),

        HostEvent::BrowserStart { browser } => reporter.on_browser_start(&browser),

        HostEvent::BrowserLog { browser, message } => {
            reporter.on_browser_log(&browser, &strip_ansi(&message))
        }

        HostEvent::SpecComplete { browser, mut result } => {
            for entry in &mut result.log {
                *entry = strip_ansi(entry);
            }
            reporter.on_spec_complete(&browser, &result)
        }

        HostEvent::BrowserError { browser, error } => {
            let text = match error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            reporter.on_browser_error(&browser, &strip_ansi(&text))
        }

        HostEvent::RunComplete => reporter.on_run_complete(),
    }
}
