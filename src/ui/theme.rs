use crossterm::style::{Attribute, Color, ContentStyle, Stylize};

use crate::config::Config;

/// Styles for every colored element of the report, built once from the config.
#[derive(Debug, Clone)]
pub struct Palette {
    pub root_suite: ContentStyle,
    pub suite: ContentStyle,
    pub test_name: ContentStyle,
    pub browser: ContentStyle,
    pub first_line: ContentStyle,
    /// High-visibility style for error lines outside dependency paths.
    pub highlight: ContentStyle,
    pub logged_errors: ContentStyle,
    pub underline: ContentStyle,
    pub console_logs: ContentStyle,
    pub runtime_error: ContentStyle,
    pub pass: ContentStyle,
    pub fail: ContentStyle,
    pub skip: ContentStyle,
    pub pass_bar: ContentStyle,
    pub fail_bar: ContentStyle,
    pub skip_bar: ContentStyle,
}

impl Palette {
    pub fn from_config(config: &Config) -> Self {
        let fg = |index: u8| ContentStyle::new().with(Color::AnsiValue(index));
        let bar = |index: u8| ContentStyle::new().on(Color::AnsiValue(index));

        Self {
            root_suite: ContentStyle::new()
                .with(Color::White)
                .attribute(Attribute::Underlined),
            suite: ContentStyle::new().with(Color::White),
            test_name: fg(config.color_test_name),
            browser: fg(config.color_browser),
            first_line: fg(config.color_first_line),
            highlight: ContentStyle::new().with(Color::Black).on(Color::Red),
            logged_errors: fg(config.color_logged_errors),
            underline: fg(config.color_underline).attribute(Attribute::Underlined),
            console_logs: fg(config.color_console_logs),
            runtime_error: ContentStyle::new().with(Color::Red),
            pass: fg(config.color_pass),
            fail: fg(config.color_fail),
            skip: fg(config.color_skip),
            pass_bar: bar(config.color_pass),
            fail_bar: bar(config.color_fail),
            skip_bar: bar(config.color_skip),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Render `text` in `style`. Empty text stays empty so no stray escapes are emitted.
pub fn paint(style: ContentStyle, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    style.apply(text).to_string()
}

/// Strip ANSI escape sequences from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we hit a letter (end of escape sequence)
            for c2 in chars.by_ref() {
                if c2.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
