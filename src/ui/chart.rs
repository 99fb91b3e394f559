use std::io;

use super::theme::{Palette, paint};
use crate::config::AnimationStyle;
use crate::models::Stats;
use crate::terminal::Terminal;

/// Columns between the left margin and the start of the bar.
pub const LEFT_OFFSET: usize = 5;

/// Share of the terminal width used by the chart, in tenths.
const WIDTH_TENTHS: usize = 7;

/// Lines written per redraw: top border, status line, bottom border.
pub const CHART_HEIGHT: u16 = 3;

const BRAILLE_FRAMES: &[&str] = &[
    "\u{2807}", "\u{2826}", "\u{2834}", "\u{2838}", "\u{2819}", "\u{280b}", "\u{280f}", "\u{2827}",
    "\u{2836}", "\u{283c}", "\u{2839}", "\u{281b}",
];

const CLOCK_FRAMES: &[&str] = &[
    "\u{1F55B}", "\u{1F550}", "\u{1F551}", "\u{1F552}", "\u{1F553}", "\u{1F554}", "\u{1F555}",
    "\u{1F556}", "\u{1F557}", "\u{1F558}", "\u{1F559}", "\u{1F55A}",
];

/// Width of the chart region for a terminal `term_width` columns wide.
pub fn chart_width(term_width: u16) -> usize {
    (usize::from(term_width) * WIDTH_TENTHS).div_ceil(10)
}

fn frames(style: AnimationStyle) -> &'static [&'static str] {
    match style {
        AnimationStyle::Braille => BRAILLE_FRAMES,
        AnimationStyle::Clock => CLOCK_FRAMES,
    }
}

/// Overall mood of a finished run, shown in place of the spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    VeryBad,
    Sad,
    Positive,
    Celebratory,
    Ok,
}

impl Verdict {
    /// First matching rule wins.
    pub fn of(stats: &Stats) -> Self {
        if stats.failed.saturating_mul(2) > stats.total {
            Verdict::VeryBad
        } else if stats.failed > stats.success {
            Verdict::Sad
        } else if stats.failed == 0 && stats.skipped != 0 {
            Verdict::Positive
        } else if stats.success == stats.total {
            Verdict::Celebratory
        } else {
            Verdict::Ok
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Verdict::VeryBad => "\u{1F4A9}",
            Verdict::Sad => "\u{1F61E}",
            Verdict::Positive => "\u{1F642}",
            Verdict::Celebratory => "\u{1F389}",
            Verdict::Ok => "\u{1F44C}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentWidths {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SegmentWidths {
    pub fn sum(&self) -> usize {
        self.success + self.failed + self.skipped
    }
}

/// Split `inner` columns between the three counters.
///
/// Each segment is rounded up on its own; any overshoot is taken back from
/// the widest segment, the first one in success, failed, skipped order on ties.
pub fn segment_widths(stats: &Stats, inner: usize) -> SegmentWidths {
    if stats.total == 0 {
        return SegmentWidths::default();
    }

    let scaled = |count: usize| {
        let cols = (inner as u128 * count as u128).div_ceil(stats.total as u128);
        usize::try_from(cols).unwrap_or(usize::MAX).min(inner)
    };
    let mut widths = [
        scaled(stats.success),
        scaled(stats.failed),
        scaled(stats.skipped),
    ];

    let mut excess = widths.iter().sum::<usize>().saturating_sub(inner);
    while excess > 0 {
        let (widest, _) = widths
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &w)| if w > best.1 { (i, w) } else { best });
        let take = excess.min(widths[widest]);
        widths[widest] -= take;
        excess -= take;
    }

    SegmentWidths {
        success: widths[0],
        failed: widths[1],
        skipped: widths[2],
    }
}

/// The fixed-height progress region redrawn in place during a run.
#[derive(Debug, Clone)]
pub struct Chart {
    width: usize,
    top: String,
    bottom: String,
    frames: &'static [&'static str],
    frame: usize,
}

impl Chart {
    pub fn new(term_width: u16, style: AnimationStyle) -> Self {
        let width = chart_width(term_width);
        let margin = " ".repeat(LEFT_OFFSET);
        let rule = width.saturating_sub(LEFT_OFFSET - 1);
        Self {
            width,
            top: format!("{margin}{}", "_".repeat(rule)),
            bottom: format!("{margin}{}", "\u{203E}".repeat(rule)),
            frames: frames(style),
            frame: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Columns available to the bar itself.
    pub fn inner_width(&self) -> usize {
        self.width.saturating_sub(LEFT_OFFSET)
    }

    /// The spinner frame while specs are outstanding, the verdict emoji afterwards.
    pub fn status_glyph(&mut self, stats: &Stats) -> &'static str {
        if stats.is_complete() {
            return Verdict::of(stats).emoji();
        }
        let glyph = self.frames[self.frame % self.frames.len()];
        self.frame = (self.frame + 1) % self.frames.len();
        glyph
    }

    pub fn bar(&self, stats: &Stats, palette: &Palette) -> String {
        let widths = segment_widths(stats, self.inner_width());
        [
            paint(palette.pass_bar, &" ".repeat(widths.success)),
            paint(palette.fail_bar, &" ".repeat(widths.failed)),
            paint(palette.skip_bar, &" ".repeat(widths.skipped)),
        ]
        .concat()
    }

    /// Write the three chart lines and move the cursor back to the top of them.
    pub fn draw<T: Terminal>(&mut self, term: &mut T, stats: &Stats, palette: &Palette) -> io::Result<()> {
        let glyph = self.status_glyph(stats);
        let bar = self.bar(stats, palette);
        term.write_str(&self.top)?;
        term.write_str("\n")?;
        term.write_str(&format!(" {glyph}   {bar} \n"))?;
        term.write_str(&self.bottom)?;
        term.write_str("\n")?;
        term.cursor_up(CHART_HEIGHT)?;
        term.flush()
    }
}
