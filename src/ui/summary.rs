use super::theme::{Palette, paint};
use crate::models::{BrowserError, BrowserLog, Stats};

/// Gap between the counters of the stats line.
const STAT_GAP: usize = 3;

/// Indentation of captured console lines.
const LOG_INDENT: usize = 4;

const BANNER_ROWS: usize = 10;

/// Braille dot in the top-right corner, used for the closing rule.
const RULE_GLYPH: &str = "\u{2808}";

/// The colored pass/fail/skip counts followed by a rule `width + 1` glyphs long.
pub fn stats_line(stats: &Stats, palette: &Palette, width: usize) -> String {
    let gap = " ".repeat(STAT_GAP);
    format!(
        "{gap}{}{gap}{}{gap}{}\n\n{}\n",
        paint(palette.pass, &format!("{} passed", stats.success)),
        paint(palette.fail, &format!("{} failed", stats.failed)),
        paint(palette.skip, &format!("{} skipped", stats.skipped)),
        RULE_GLYPH.repeat(width + 1),
    )
}

/// Console output grouped by browser instance. Empty when nothing was logged.
pub fn browser_logs(logs: &[BrowserLog], palette: &Palette) -> String {
    if logs.iter().all(|l| l.messages.is_empty()) {
        return String::new();
    }

    let indent = " ".repeat(LOG_INDENT);
    let mut out = String::new();
    for log in logs {
        out.push_str(&format!(
            " LOG MESSAGES FOR: {} INSTANCE #: {}\n",
            log.browser_name, log.browser_id
        ));
        for message in &log.messages {
            out.push_str(&indent);
            out.push_str(&paint(palette.console_logs, message));
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

/// Browser-level errors framed by a shrinking and a growing `#` banner.
pub fn runtime_errors(errors: &[BrowserError], palette: &Palette) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for row in (1..=BANNER_ROWS).rev() {
        out.push_str(&"#".repeat(row));
        out.push('\n');
    }
    for e in errors {
        out.push('\n');
        out.push_str(&paint(palette.runtime_error, &e.browser_name));
        out.push('\n');
        out.push_str(&paint(palette.runtime_error, &e.error));
        out.push('\n');
    }
    out.push('\n');
    for row in 1..=BANNER_ROWS {
        out.push_str(&"#".repeat(row));
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::strip_ansi;

    #[test]
    fn stats_line_lists_counts_and_rule() {
        let out = strip_ansi(&stats_line(&Stats::new(4, 1, 2, 7), &Palette::default(), 5));
        assert_eq!(
            out,
            format!("   4 passed   1 failed   2 skipped\n\n{}\n", RULE_GLYPH.repeat(6))
        );
    }

    #[test]
    fn logs_are_grouped_under_browser_header() {
        let logs = vec![BrowserLog {
            browser_id: "42".into(),
            browser_name: "Chrome".into(),
            messages: vec!["'hello'".into(), "'world'".into()],
        }];
        let out = strip_ansi(&browser_logs(&logs, &Palette::default()));
        assert_eq!(
            out,
            " LOG MESSAGES FOR: Chrome INSTANCE #: 42\n    'hello'\n    'world'\n\n"
        );
    }

    #[test]
    fn no_logs_means_no_output() {
        assert_eq!(browser_logs(&[], &Palette::default()), "");
    }

    #[test]
    fn runtime_errors_are_framed() {
        let errors = vec![BrowserError {
            browser_name: "Chrome".into(),
            error: "SyntaxError: unexpected token".into(),
        }];
        let out = strip_ansi(&runtime_errors(&errors, &Palette::default()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "##########");
        assert_eq!(lines[9], "#");
        assert_eq!(&lines[10..13], &["", "Chrome", "SyntaxError: unexpected token"]);
        assert_eq!(lines[14], "#");
        assert_eq!(lines[23], "##########");
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn no_runtime_errors_means_no_output() {
        assert_eq!(runtime_errors(&[], &Palette::default()), "");
    }
}
