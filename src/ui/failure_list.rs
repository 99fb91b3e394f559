use super::format::{LineFormatter, NOISE_MARKER};
use super::theme::{Palette, paint};
use crate::models::{FailureNode, NodeKind, ResultTree};

/// Columns per nesting level.
pub const TAB_WIDTH: usize = 3;

pub fn indent(depth: usize) -> String {
    " ".repeat(depth * TAB_WIDTH + 1)
}

/// What a failure listing needs to know besides the tree itself.
pub struct FailureStyle<'a> {
    pub palette: &'a Palette,
    pub lines: &'a LineFormatter,
    pub show_browser: bool,
    pub highlight_errors: bool,
}

/// Render every root suite in recording order.
///
/// `counter` numbers the first line of each printed failure and keeps
/// counting across calls within one run.
pub fn render(tree: &ResultTree, counter: &mut usize, style: &FailureStyle<'_>) -> String {
    tree.roots()
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|suite| render_suite(tree, suite, counter, style).join("\n"))
        .collect()
}

fn render_suite(
    tree: &ResultTree,
    suite: &FailureNode,
    counter: &mut usize,
    style: &FailureStyle<'_>,
) -> Vec<String> {
    let header_style = if suite.depth == 0 {
        style.palette.root_suite
    } else {
        style.palette.suite
    };
    let mut out = vec![format!("{}{}", indent(suite.depth), paint(header_style, &suite.name))];

    for test in tree.children_of_kind(suite.id, NodeKind::Test) {
        out.extend(render_test(tree, test, counter, style));
        out.push(String::new());
    }

    for child in tree.children_of_kind(suite.id, NodeKind::Suite) {
        let mut lines = render_suite(tree, child, counter, style);
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        out.extend(lines);
        out.push(String::new());
    }

    out.push(String::new());
    out.push(String::new());
    out
}

fn render_test(
    tree: &ResultTree,
    test: &FailureNode,
    counter: &mut usize,
    style: &FailureStyle<'_>,
) -> Vec<String> {
    let mut out = vec![format!(
        "{}{}",
        indent(test.depth),
        paint(style.palette.test_name, &test.name)
    )];
    for browser in tree.children_of_kind(test.id, NodeKind::Browser) {
        out.extend(render_browser(browser, counter, style));
    }
    out
}

fn render_browser(browser: &FailureNode, counter: &mut usize, style: &FailureStyle<'_>) -> Vec<String> {
    let palette = style.palette;
    let mut out = Vec::new();

    // Without the browser header the error lines move up one level.
    let depth = if style.show_browser {
        out.push(format!(
            "{}{}",
            indent(browser.depth),
            paint(palette.browser, &browser.name)
        ));
        browser.depth
    } else {
        browser.depth.saturating_sub(1)
    };

    for (i, line) in style.lines.surviving(&browser.lines).iter().enumerate() {
        let text = style.lines.underline_file(line, palette.underline);
        if i == 0 {
            *counter += 1;
            out.push(format!(
                "{}{}) {}",
                indent(depth + 1),
                counter,
                paint(palette.first_line, &text)
            ));
        } else {
            let line_style = if style.highlight_errors && !line.contains(NOISE_MARKER) {
                palette.highlight
            } else {
                palette.logged_errors
            };
            out.push(format!("{}{}", indent(depth + 2), paint(line_style, &text)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ui::format::default_formatter;
    use crate::ui::theme::strip_ansi;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn render_plain(tree: &ResultTree, config: &Config, counter: &mut usize) -> String {
        let palette = Palette::from_config(config);
        let formatter = LineFormatter::new(config, default_formatter());
        let style = FailureStyle {
            palette: &palette,
            lines: &formatter,
            show_browser: !config.hide_browser,
            highlight_errors: !config.suppress_error_highlighting,
        };
        strip_ansi(&render(tree, counter, &style))
    }

    fn shown_browsers() -> Config {
        Config {
            hide_browser: false,
            ..Config::default()
        }
    }

    #[test]
    fn nested_levels_indent_one_step_each() {
        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A"]), "t1", lines(&["boom"]));

        let out = render_plain(&tree, &shown_browsers(), &mut 0);
        assert_eq!(out, " A\n    t1\n       chrome\n          1) boom\n\n\n");
    }

    #[test]
    fn hidden_browser_pulls_errors_up_a_level() {
        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A"]), "t1", lines(&["boom", "at x.js:1"]));

        let out = render_plain(&tree, &Config::default(), &mut 0);
        assert_eq!(out, " A\n    t1\n       1) boom\n          at x.js:1\n\n\n");
    }

    #[test]
    fn counter_runs_across_browsers_and_suites() {
        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A"]), "t1", lines(&["one"]));
        tree.record("firefox", &path(&["A"]), "t1", lines(&["two"]));
        tree.record("chrome", &path(&["B"]), "t2", lines(&["three"]));

        let mut counter = 0;
        let out = render_plain(&tree, &Config::default(), &mut counter);
        assert_eq!(counter, 3);
        assert!(out.contains("1) one"));
        assert!(out.contains("2) two"));
        assert!(out.contains("3) three"));
    }

    #[test]
    fn tests_come_before_child_suites() {
        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A", "B"]), "inner", lines(&["x"]));
        tree.record("chrome", &path(&["A"]), "outer", lines(&["y"]));

        let out = render_plain(&tree, &Config::default(), &mut 0);
        let expected = [
            " A",
            "    outer",
            "       1) y",
            "",
            "    B",
            "       inner",
            "          2) x",
            "",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn browser_without_surviving_lines_prints_only_header() {
        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A"]), "t1", lines(&["node_modules/x"]));
        let config = Config {
            remove_lines_containing: vec!["node_modules/".into()],
            ..shown_browsers()
        };
        let mut counter = 0;
        let out = render_plain(&tree, &config, &mut counter);
        assert_eq!(out, " A\n    t1\n       chrome\n\n\n");
        assert_eq!(counter, 0);
    }

    #[test]
    fn noise_lines_are_muted_and_others_highlighted() {
        let config = Config::default();
        let palette = Palette::from_config(&config);
        let formatter = LineFormatter::new(&config, default_formatter());
        let style = FailureStyle {
            palette: &palette,
            lines: &formatter,
            show_browser: false,
            highlight_errors: true,
        };

        let mut tree = ResultTree::new();
        tree.record(
            "chrome",
            &path(&["A"]),
            "t1",
            lines(&["Error Info", "node_modules/y", "z"]),
        );
        let out = render(&tree, &mut 0, &style);
        assert!(out.contains(&paint(palette.logged_errors, "node_modules/y")));
        assert!(out.contains(&paint(palette.highlight, "z")));

        let muted = FailureStyle {
            highlight_errors: false,
            ..style
        };
        let out = render(&tree, &mut 0, &muted);
        assert!(out.contains(&paint(palette.logged_errors, "z")));
    }

    #[test]
    fn root_suites_are_emphasized_and_nested_suites_plain() {
        let config = Config::default();
        let palette = Palette::from_config(&config);
        let formatter = LineFormatter::new(&config, default_formatter());
        let style = FailureStyle {
            palette: &palette,
            lines: &formatter,
            show_browser: false,
            highlight_errors: true,
        };
        assert_ne!(palette.root_suite, palette.suite);

        let mut tree = ResultTree::new();
        tree.record("chrome", &path(&["A", "B"]), "t1", lines(&["boom"]));
        let out = render(&tree, &mut 0, &style);

        assert!(out.starts_with(&format!(" {}\n", paint(palette.root_suite, "A"))));
        assert!(out.contains(&format!("\n    {}\n", paint(palette.suite, "B"))));
        assert!(!out.contains(&paint(palette.root_suite, "B")));
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(render_plain(&ResultTree::new(), &Config::default(), &mut 0), "");
    }
}
