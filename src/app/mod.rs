use crate::{
    config::Config,
    error::Result,
    models::{Browser, RunReport, SpecResult, SpecStatus},
    terminal::Terminal,
    ui::{
        Renderer,
        format::{ErrorFormatter, default_formatter},
    },
};

pub mod events;
pub mod lifecycle;

pub use events::{HostEvent, handle_host_event};
pub use lifecycle::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Complete,
}

/// Folds host lifecycle events into a [`RunReport`] and draws it on `T`.
pub struct Reporter<T: Terminal> {
    config: Config,
    term: T,
    renderer: Renderer,
    report: RunReport,
    phase: RunPhase,
    cursor_hidden: bool,
    browser_count: usize,
}

impl<T: Terminal> Reporter<T> {
    pub fn new(config: Config, term: T) -> Self {
        Self::with_formatter(config, term, default_formatter())
    }

    /// Use `formatter` instead of the default query-suffix stripping for error lines.
    pub fn with_formatter(config: Config, term: T, formatter: ErrorFormatter) -> Self {
        let renderer = Renderer::new(&config, formatter, term.width());
        Self {
            config,
            term,
            renderer,
            report: RunReport::new(),
            phase: RunPhase::Idle,
            cursor_hidden: false,
            browser_count: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn browser_count(&self) -> usize {
        self.browser_count
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    pub fn into_terminal(self) -> T {
        self.term
    }

    /// True when the last run finished with no failed specs and no browser errors.
    pub fn succeeded(&self) -> bool {
        self.phase == RunPhase::Complete
            && self.report.totals().failed == 0
            && self.report.browser_errors.is_empty()
    }

    /// Show the cursor again if a run left it hidden (stream ended early or a draw failed).
    pub fn restore_cursor(&mut self) -> Result<()> {
        if self.phase == RunPhase::Running {
            tracing::warn!("event stream ended mid-run");
        }
        if self.cursor_hidden {
            self.show_cursor()?;
        }
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.term.show_cursor()?;
        self.term.flush()?;
        self.cursor_hidden = false;
        Ok(())
    }

    fn accepts(&self, event: &'static str) -> bool {
        if self.phase == RunPhase::Running {
            return true;
        }
        tracing::warn!(event, phase = ?self.phase, "ignoring event outside of a run");
        false
    }

    fn register(&mut self, browser: &Browser) {
        if self.report.stats.register(&browser.id, browser.last_result) {
            tracing::debug!(id = %browser.id, name = %browser.name, "browser registered");
        }
        self.browser_count = self.browser_count.max(self.report.stats.len());
    }
}

impl<T: Terminal> Lifecycle for Reporter<T> {
    fn on_run_start(&mut self, browsers: &[Browser]) -> Result<()> {
        self.cursor_hidden = true;
        self.term.hide_cursor()?;
        if self.config.clear_screen_before_every_run {
            self.term.clear_screen()?;
        }

        self.report.reset();
        self.renderer.reset(self.term.width());
        // Counts carried on the run-start list belong to the previous run.
        self.browser_count = browsers.len();
        self.phase = RunPhase::Running;
        tracing::debug!(browsers = self.browser_count, "run started");

        self.term.write_str("\n")?;
        self.term.flush()?;
        Ok(())
    }

    fn on_browser_start(&mut self, browser: &Browser) -> Result<()> {
        if self.accepts("browser-start") {
            self.register(browser);
        }
        Ok(())
    }

    fn on_browser_log(&mut self, browser: &Browser, message: &str) -> Result<()> {
        if self.accepts("browser-log") {
            self.report.push_log(browser, message.to_string());
        }
        Ok(())
    }

    fn on_spec_complete(&mut self, browser: &Browser, result: &SpecResult) -> Result<()> {
        if !self.accepts("spec-complete") {
            return Ok(());
        }

        let totals = self.report.stats.upsert(&browser.id, browser.last_result);
        self.browser_count = self.browser_count.max(self.report.stats.len());

        let status = SpecStatus::of(result);
        tracing::debug!(
            browser = %browser.id,
            spec = %result.description,
            status = status.label(),
            "spec complete"
        );

        if status.is_reportable() && !self.config.suppress_error_report {
            self.report.tree.record(
                &browser.name,
                &result.suite,
                &result.description,
                result.error_lines(),
            );
        }

        if !self.config.render_on_run_complete_only {
            self.renderer.draw_progress(&mut self.term, &totals)?;
        }
        Ok(())
    }

    fn on_browser_error(&mut self, browser: &Browser, error: &str) -> Result<()> {
        if self.accepts("browser-error") {
            tracing::debug!(browser = %browser.id, "browser error");
            self.report.push_browser_error(browser, error.to_string());
        }
        Ok(())
    }

    fn on_run_complete(&mut self) -> Result<()> {
        match self.phase {
            RunPhase::Idle => {
                tracing::warn!("run complete before any run started");
                return Ok(());
            }
            RunPhase::Running => {
                self.renderer.draw_final(&mut self.term, &mut self.report)?;
                self.phase = RunPhase::Complete;
                let totals = self.report.totals();
                tracing::debug!(
                    success = totals.success,
                    failed = totals.failed,
                    skipped = totals.skipped,
                    total = totals.total,
                    "run complete"
                );
            }
            RunPhase::Complete => {
                let totals = self.report.totals();
                self.renderer.redraw_chart(&mut self.term, &totals)?;
            }
        }
        self.show_cursor()
    }
}
