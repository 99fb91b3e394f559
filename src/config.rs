use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// File looked up by [`Config::load`].
pub const CONFIG_FILE: &str = "helpful.toml";

/// Key under which a host config may nest the reporter options.
const NESTED_KEY: &str = "helpfulReporter";

/// Reporter options, merged over the documented defaults.
///
/// Unknown keys are ignored so a shared host config can carry other sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub animation_style: AnimationStyle,
    pub clear_screen_before_every_run: bool,
    pub color_browser: u8,
    pub color_console_logs: u8,
    pub color_fail: u8,
    pub color_first_line: u8,
    pub color_logged_errors: u8,
    pub color_pass: u8,
    pub color_skip: u8,
    pub color_test_name: u8,
    pub color_underline: u8,
    /// Drop the browser name line under each failing test.
    pub hide_browser: bool,
    /// `None` renders every surviving line.
    pub max_log_lines: Option<usize>,
    /// Lines containing any of these substrings are dropped.
    pub remove_lines_containing: Vec<String>,
    /// Strip everything from the first `<-` marker onward.
    pub remove_tail: bool,
    pub render_on_run_complete_only: bool,
    pub suppress_error_highlighting: bool,
    /// Skip recording failures entirely; only the chart and stats are shown.
    pub suppress_error_report: bool,
    /// File suffix (e.g. `.spec.ts`) whose first match per line is underlined.
    pub underline_file_type: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation_style: AnimationStyle::Braille,
            clear_screen_before_every_run: false,
            color_browser: 224,
            color_console_logs: 45,
            color_fail: 210,
            color_first_line: 217,
            color_logged_errors: 250,
            color_pass: 154,
            color_skip: 117,
            color_test_name: 210,
            color_underline: 255,
            hide_browser: true,
            max_log_lines: None,
            remove_lines_containing: Vec::new(),
            remove_tail: false,
            render_on_run_complete_only: false,
            suppress_error_highlighting: false,
            suppress_error_report: false,
            underline_file_type: None,
        }
    }
}

/// Animation frame set used while a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum AnimationStyle {
    #[default]
    Braille,
    Clock,
}

impl From<String> for AnimationStyle {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "clock" => AnimationStyle::Clock,
            _ => AnimationStyle::Braille,
        }
    }
}

impl Config {
    /// Load `helpful.toml` from `dir`, falling back to defaults if absent or invalid.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid reporter config");
                Self::default()
            }
        }
    }

    /// Read an explicit `.toml` or `.json` config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };

        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let mut table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
        let value = match table.remove(NESTED_KEY) {
            Some(nested) => nested,
            None => toml::Value::Table(table),
        };
        value.try_into::<Self>().map_err(|e| e.to_string())
    }

    pub fn from_json_str(content: &str) -> std::result::Result<Self, String> {
        let mut value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| e.to_string())?;
        if let Some(nested) = value.get_mut(NESTED_KEY) {
            value = nested.take();
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.hide_browser);
        assert_eq!(config.max_log_lines, None);
        assert_eq!(config.color_pass, 154);
        assert_eq!(config.color_fail, 210);
        assert_eq!(config.color_skip, 117);
        assert_eq!(config.animation_style, AnimationStyle::Braille);
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let config = Config::from_toml_str(
            r#"
            hideBrowser = false
            maxLogLines = 4
            removeLinesContaining = ["node_modules/"]
            animationStyle = "clock"
            "#,
        )
        .unwrap();

        assert!(!config.hide_browser);
        assert_eq!(config.max_log_lines, Some(4));
        assert_eq!(config.remove_lines_containing, vec!["node_modules/"]);
        assert_eq!(config.animation_style, AnimationStyle::Clock);
        assert_eq!(config.color_browser, 224);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = Config::from_toml_str("someOtherOption = 12\nremoveTail = true").unwrap();
        assert!(config.remove_tail);
    }

    #[test]
    fn json_nested_under_reporter_key() {
        let config = Config::from_json_str(
            r#"{"browsers": ["Chrome"], "helpfulReporter": {"suppressErrorReport": true, "colorPass": 40}}"#,
        )
        .unwrap();
        assert!(config.suppress_error_report);
        assert_eq!(config.color_pass, 40);
    }

    #[test]
    fn json_null_max_lines_means_unlimited() {
        let config = Config::from_json_str(r#"{"maxLogLines": null}"#).unwrap();
        assert_eq!(config.max_log_lines, None);
    }

    #[test]
    fn unknown_animation_falls_back_to_braille() {
        let config = Config::from_json_str(r#"{"animationStyle": "sparkles"}"#).unwrap();
        assert_eq!(config.animation_style, AnimationStyle::Braille);
    }

    #[test]
    fn load_reads_file_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "renderOnRunCompleteOnly = true").unwrap();
        assert!(Config::load(dir.path()).render_on_run_complete_only);
    }

    #[test]
    fn load_falls_back_on_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "maxLogLines = \"many\"").unwrap();
        assert_eq!(Config::load(dir.path()), Config::default());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
