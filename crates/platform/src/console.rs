//! Line-oriented diagnostic console
//!
//! The device prints short human-readable status lines (register writes,
//! connection changes, heartbeat dumps) to a serial stream. Lines are
//! formatted into a fixed-capacity [`ConsoleLine`] so no allocation happens
//! on the hot path; anything longer than [`CONSOLE_LINE_CAPACITY`] is
//! truncated.

use core::fmt::{self, Write as _};

/// Maximum length of one console line, excluding the line terminator.
pub const CONSOLE_LINE_CAPACITY: usize = 96;

/// A single formatted console line.
pub type ConsoleLine = heapless::String<CONSOLE_LINE_CAPACITY>;

/// Diagnostic text sink.
pub trait Console {
    /// Emit one complete line. Implementations add their own terminator.
    fn write_line(&mut self, line: &str);

    /// Format `args` into a [`ConsoleLine`] and emit it.
    fn print(&mut self, args: fmt::Arguments<'_>) {
        let line = format_line(args);
        self.write_line(&line);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }
}

/// Format `args` into a [`ConsoleLine`], keeping whatever fits.
pub fn format_line(args: fmt::Arguments<'_>) -> ConsoleLine {
    let mut line = ConsoleLine::new();
    let mut sink = Truncating(&mut line);
    // Truncating never reports an error; a failing Display impl just
    // shortens the line.
    let _ = sink.write_fmt(args);
    line
}

struct Truncating<'a>(&'a mut ConsoleLine);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// ── embedded-io adapter ──────────────────────────────────────────────────────

/// Console over any blocking `embedded_io::Write` (typically a UART TX).
///
/// Write errors are counted rather than propagated: a stalled diagnostic
/// port must never stop event processing.
pub struct IoConsole<W> {
    writer: W,
    write_errors: u32,
}

impl<W> IoConsole<W>
where
    W: embedded_io::Write,
{
    /// Wrap a byte writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            write_errors: 0,
        }
    }

    /// Number of lines that failed to write.
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    /// Release the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Console for IoConsole<W>
where
    W: embedded_io::Write,
{
    fn write_line(&mut self, line: &str) {
        let result = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\r\n"))
            .and_then(|()| self.writer.flush());
        if result.is_err() {
            self.write_errors = self.write_errors.saturating_add(1);
        }
    }
}
