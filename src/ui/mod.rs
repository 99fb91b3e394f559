pub mod chart;
pub mod failure_list;
pub mod format;
pub mod summary;
pub mod theme;

use std::io;

use crate::config::{AnimationStyle, Config};
use crate::models::{RunReport, Stats};
use crate::terminal::Terminal;

use chart::{CHART_HEIGHT, Chart, chart_width};
use failure_list::FailureStyle;
use format::{ErrorFormatter, LineFormatter};
use theme::Palette;

/// Draws the in-place chart during a run and the static report at its end.
pub struct Renderer {
    palette: Palette,
    lines: LineFormatter,
    show_browser: bool,
    highlight_errors: bool,
    animation: AnimationStyle,
    chart: Chart,
}

impl Renderer {
    pub fn new(config: &Config, formatter: ErrorFormatter, term_width: u16) -> Self {
        Self {
            palette: Palette::from_config(config),
            lines: LineFormatter::new(config, formatter),
            show_browser: !config.hide_browser,
            highlight_errors: !config.suppress_error_highlighting,
            animation: config.animation_style,
            chart: Chart::new(term_width, config.animation_style),
        }
    }

    /// Recompute the chart geometry and restart the animation.
    pub fn reset(&mut self, term_width: u16) {
        self.chart = Chart::new(term_width, self.animation);
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Redraw the chart region in place.
    pub fn draw_progress<T: Terminal>(&mut self, term: &mut T, stats: &Stats) -> io::Result<()> {
        self.chart.draw(term, stats, &self.palette)
    }

    /// Redraw the chart once more and print the report below it.
    ///
    /// Browser errors take over the whole report when present.
    pub fn draw_final<T: Terminal>(&mut self, term: &mut T, report: &mut RunReport) -> io::Result<()> {
        let totals = report.totals();
        self.chart.draw(term, &totals, &self.palette)?;
        self.move_below_chart(term)?;

        if !report.browser_errors.is_empty() {
            term.write_str(&summary::runtime_errors(&report.browser_errors, &self.palette))?;
            return term.flush();
        }

        let style = FailureStyle {
            palette: &self.palette,
            lines: &self.lines,
            show_browser: self.show_browser,
            highlight_errors: self.highlight_errors,
        };
        let failures = failure_list::render(&report.tree, &mut report.failure_counter, &style);
        term.write_str(&failures)?;
        term.write_str(&summary::browser_logs(&report.logs, &self.palette))?;
        term.write_str(&summary::stats_line(
            &totals,
            &self.palette,
            chart_width(term.width()),
        ))?;
        term.flush()
    }

    /// Redraw only the chart and step past it, leaving earlier output alone.
    pub fn redraw_chart<T: Terminal>(&mut self, term: &mut T, stats: &Stats) -> io::Result<()> {
        self.chart.draw(term, stats, &self.palette)?;
        self.move_below_chart(term)?;
        term.flush()
    }

    fn move_below_chart<T: Terminal>(&self, term: &mut T) -> io::Result<()> {
        term.write_str(&"\n".repeat(usize::from(CHART_HEIGHT) + 1))
    }
}
