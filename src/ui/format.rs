use std::fmt;
use std::sync::{Arc, LazyLock};

use crossterm::style::ContentStyle;
use regex::Regex;

use super::theme::paint;
use crate::config::Config;

/// Pluggable transform applied to every trimmed error line.
pub type ErrorFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Lines containing this come from third-party code and are rendered muted.
pub const NOISE_MARKER: &str = "node_modules/";

const TAIL_MARKER: &str = "<-";

/// `file.js?cachebuster:12` style suffixes left behind by bundlers.
static QUERY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?.+?:").expect("query suffix pattern is valid"));

/// Collapse the first `?...:` run to `:`.
pub fn default_formatter() -> ErrorFormatter {
    Arc::new(|line: &str| QUERY_SUFFIX.replacen(line, 1, ":").trim().to_string())
}

/// Cleans, filters and caps the raw error lines of a failure.
#[derive(Clone)]
pub struct LineFormatter {
    formatter: ErrorFormatter,
    exclusions: Vec<String>,
    remove_tail: bool,
    underline: Option<Regex>,
    max_lines: Option<usize>,
}

impl fmt::Debug for LineFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineFormatter")
            .field("exclusions", &self.exclusions)
            .field("remove_tail", &self.remove_tail)
            .field("underline", &self.underline.as_ref().map(Regex::as_str))
            .field("max_lines", &self.max_lines)
            .finish_non_exhaustive()
    }
}

impl LineFormatter {
    pub fn new(config: &Config, formatter: ErrorFormatter) -> Self {
        Self {
            formatter,
            exclusions: config
                .remove_lines_containing
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            remove_tail: config.remove_tail,
            underline: config
                .underline_file_type
                .as_deref()
                .and_then(underline_pattern),
            max_lines: config.max_log_lines,
        }
    }

    /// Run one raw line through trim, formatter, exclusion and tail stripping.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let formatted = (self.formatter)(raw.trim());
        let line = formatted.trim();
        if line.is_empty() {
            return None;
        }
        if self.exclusions.iter().any(|ex| line.contains(ex.as_str())) {
            return None;
        }
        let line = match (self.remove_tail, line.find(TAIL_MARKER)) {
            (true, Some(at)) => &line[..at],
            _ => line,
        };
        Some(line.to_string())
    }

    /// The lines that will be rendered, in order, at most `maxLogLines` of them.
    pub fn surviving(&self, lines: &[String]) -> Vec<String> {
        let cap = self.max_lines.unwrap_or(usize::MAX);
        lines
            .iter()
            .filter_map(|raw| self.clean(raw))
            .take(cap)
            .collect()
    }

    /// Underline the first file name ending in the configured suffix.
    pub fn underline_file(&self, line: &str, style: ContentStyle) -> String {
        let Some(re) = &self.underline else {
            return line.to_string();
        };
        match re.find(line) {
            Some(m) => format!(
                "{}{}{}",
                &line[..m.start()],
                paint(style, m.as_str()),
                &line[m.end()..]
            ),
            None => line.to_string(),
        }
    }
}

/// Match the last path segment ending in `suffix`, with or without its leading dot.
fn underline_pattern(suffix: &str) -> Option<Regex> {
    let suffix = suffix.trim().trim_start_matches('.');
    if suffix.is_empty() {
        return None;
    }
    Regex::new(&format!(r"[^/\s()]*\.{}", regex::escape(suffix))).ok()
}
