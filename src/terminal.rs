use std::io::{self, Write};

use crossterm::{cursor, queue, terminal};

/// Size assumed when the output is not attached to a terminal.
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// The terminal operations the reporter needs.
pub trait Terminal {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// Move the cursor up `lines` rows. Zero is a no-op.
    fn cursor_up(&mut self, lines: u16) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;

    fn show_cursor(&mut self) -> io::Result<()>;

    /// Clear the whole screen and home the cursor.
    fn clear_screen(&mut self) -> io::Result<()>;

    fn width(&self) -> u16;

    fn height(&self) -> u16;

    fn flush(&mut self) -> io::Result<()>;
}

/// [`Terminal`] over any writer, emitting crossterm's ANSI sequences.
pub struct CrosstermTerminal<W: Write> {
    out: W,
    /// Overrides the queried size (non-tty output, tests).
    fixed_size: Option<(u16, u16)>,
}

impl CrosstermTerminal<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fixed_size: None,
        }
    }

    pub fn with_size(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            fixed_size: Some((width, height)),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn size(&self) -> (u16, u16) {
        self.fixed_size
            .or_else(|| terminal::size().ok())
            .filter(|&(w, _)| w > 0)
            .unwrap_or(FALLBACK_SIZE)
    }
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn cursor_up(&mut self, lines: u16) -> io::Result<()> {
        if lines == 0 {
            return Ok(());
        }
        queue!(self.out, cursor::MoveUp(lines))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Show)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    fn width(&self) -> u16 {
        self.size().0
    }

    fn height(&self) -> u16 {
        self.size().1
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
