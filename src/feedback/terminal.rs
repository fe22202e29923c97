//! Terminal output capability used by the train animation.
//!
//! The animation only needs a handful of primitives: write lines, move the
//! cursor up, clear the current line, and toggle cursor visibility.
//! [`CrosstermTerminal`] maps them onto crossterm commands; [`RecordingTerminal`]
//! captures them for tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::{cursor, queue, terminal};

/// Width used when the terminal size cannot be queried.
pub const DEFAULT_WIDTH: usize = 80;

/// Minimal set of terminal operations the animation relies on.
pub trait Terminal: Send {
    /// Write each line followed by a newline.
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()>;

    /// Move the cursor up `n` lines.
    fn move_cursor_up(&mut self, n: u16) -> io::Result<()>;

    /// Clear the line the cursor is on.
    fn clear_line(&mut self) -> io::Result<()>;

    /// Hide the text cursor.
    fn hide_cursor(&mut self) -> io::Result<()>;

    /// Show the text cursor.
    fn show_cursor(&mut self) -> io::Result<()>;

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Query the terminal width, falling back to [`DEFAULT_WIDTH`].
pub fn terminal_width() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Terminal backed by any writer, using crossterm control sequences.
pub struct CrosstermTerminal<W: Write + Send> {
    out: W,
}

impl CrosstermTerminal<io::Stdout> {
    /// Terminal writing to the process's stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> CrosstermTerminal<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the terminal and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Terminal for CrosstermTerminal<W> {
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn move_cursor_up(&mut self, n: u16) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        queue!(self.out, cursor::MoveUp(n))
    }

    fn clear_line(&mut self) -> io::Result<()> {
        queue!(self.out, terminal::Clear(terminal::ClearType::CurrentLine))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide)?;
        self.out.flush()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Show)?;
        self.out.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One recorded terminal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOp {
    /// A single written line.
    Write(String),
    /// Cursor moved up by n lines.
    MoveUp(u16),
    /// Current line cleared.
    ClearLine,
    /// Cursor hidden.
    HideCursor,
    /// Cursor shown.
    ShowCursor,
}

/// Test double that records every operation instead of printing.
///
/// Clones share the same log, so a test can keep one handle while the
/// animation owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminal {
    ops: Arc<Mutex<Vec<TerminalOp>>>,
}

impl RecordingTerminal {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all operations so far.
    pub fn ops(&self) -> Vec<TerminalOp> {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines written, in order.
    pub fn written(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                TerminalOp::Write(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Number of lines erased (one clear per erased line).
    pub fn lines_erased(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| **op == TerminalOp::ClearLine)
            .count()
    }

    fn push(&self, op: TerminalOp) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

impl Terminal for RecordingTerminal {
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.push(TerminalOp::Write(line.clone()));
        }
        Ok(())
    }

    fn move_cursor_up(&mut self, n: u16) -> io::Result<()> {
        self.push(TerminalOp::MoveUp(n));
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.push(TerminalOp::ClearLine);
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.push(TerminalOp::HideCursor);
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.push(TerminalOp::ShowCursor);
        Ok(())
    }
}
