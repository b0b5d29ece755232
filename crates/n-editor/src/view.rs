//! View: paints an [`EditorState`] as one full terminal frame.
//!
//! The screen is split into three bands:
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ text rows (buffer lines)      │ ← rows - 2
//! │                               │
//! ├───────────────────────────────┤
//! │ notes.txt [+]        1k  3:7  │ ← status line, inverse
//! ├───────────────────────────────┤
//! │ C-x-                          │ ← message line
//! └───────────────────────────────┘
//! ```
//!
//! Every frame is painted from scratch; the event loop wraps it in
//! synchronized output so there is no flicker. The only state the view
//! keeps between frames is its vertical scroll offset.
//!
//! Buffer lines are bytes. For display they are decoded lossily, tabs are
//! shown as a single space and other control characters as `?`, so one
//! byte never turns into an escape sequence on the user's terminal.
//! Lines wider than the screen are cut, not wrapped.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use n_term::ansi;
use n_term::color::{Attr, CellColor, Style};
use n_term::terminal::Size;

use crate::editor::EditorState;
use crate::status::{MessageKind, StatusLine, truncate};
use crate::store::LineStore;

/// Status line colors.
const STATUS_STYLE: Style = Style::PLAIN.with(Attr::INVERSE);

/// Message line color for rejected input.
const ERROR_STYLE: Style = Style::fg(CellColor::RED);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The printable form of a line.
#[must_use]
pub fn display_text(line: &[u8]) -> String {
    String::from_utf8_lossy(line)
        .chars()
        .map(|c| match c {
            '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect()
}

/// Screen column of a 1-based byte column in `line`.
#[must_use]
pub fn display_col(line: &[u8], col: usize) -> usize {
    let end = col.saturating_sub(1).min(line.len());
    display_text(&line[..end])
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

#[inline]
fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Scroll state for the text area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct View {
    /// Buffer row (0-indexed) shown on the first screen row.
    top: usize,
}

impl View {
    #[must_use]
    pub const fn new() -> Self {
        Self { top: 0 }
    }

    /// First visible buffer row, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    /// Number of rows available for text on a screen of `rows` rows.
    #[inline]
    #[must_use]
    pub const fn text_height(rows: u16) -> usize {
        rows.saturating_sub(2) as usize
    }

    /// Scroll so that 0-indexed buffer row `row` is on screen.
    pub const fn scroll_to(&mut self, row: usize, height: usize) {
        if height == 0 {
            return;
        }
        if row < self.top {
            self.top = row;
        } else if row >= self.top + height {
            self.top = row + 1 - height;
        }
    }

    /// Paint the whole screen for `state` and leave the terminal cursor on
    /// the editing position.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn paint<S: LineStore>(
        &mut self,
        out: &mut impl Write,
        size: Size,
        state: &EditorState<S>,
    ) -> io::Result<()> {
        let width = usize::from(size.cols);
        let height = Self::text_height(size.rows);
        let cursor = state.cursor();
        let buffer = state.buffer();

        self.scroll_to(cursor.row() - 1, height);

        ansi::cursor_hide(out)?;
        ansi::reset(out)?;

        // ── Text ────────────────────────────────────────────────────
        for y in 0..height {
            ansi::cursor_to(out, 0, to_u16(y))?;
            let row = self.top + y + 1;
            if row <= buffer.line_count() {
                let text = display_text(buffer.fetch(row));
                out.write_all(truncate(&text, width).as_bytes())?;
            }
            ansi::clear_to_eol(out)?;
        }

        // ── Status ──────────────────────────────────────────────────
        if size.rows >= 2 {
            let status = StatusLine::new(
                &state.path().display().to_string(),
                buffer.is_modified(),
                buffer.byte_size(),
                cursor,
            );
            ansi::cursor_to(out, 0, size.rows - 2)?;
            ansi::style(out, STATUS_STYLE)?;
            out.write_all(status.fit(width).as_bytes())?;
            ansi::reset(out)?;
        }

        // ── Message ─────────────────────────────────────────────────
        if size.rows >= 1 {
            ansi::cursor_to(out, 0, size.rows - 1)?;
            if let Some(msg) = state.message() {
                if msg.kind == MessageKind::Error {
                    ansi::style(out, ERROR_STYLE)?;
                }
                out.write_all(truncate(&msg.text, width).as_bytes())?;
                ansi::reset(out)?;
            }
            ansi::clear_to_eol(out)?;
        }

        // ── Cursor ──────────────────────────────────────────────────
        if height > 0 {
            let x = display_col(buffer.fetch(cursor.row()), cursor.col());
            let y = cursor.row() - 1 - self.top;
            ansi::cursor_to(out, to_u16(x.min(width.saturating_sub(1))), to_u16(y))?;
        }
        ansi::cursor_show(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::options::Options;
    use crate::store::MemoryStore;

    fn editor_with(text: &str) -> EditorState<MemoryStore> {
        let mut store = MemoryStore::new();
        store.insert("f.txt", text);
        EditorState::open("f.txt", Options::default(), store).unwrap()
    }

    fn paint(view: &mut View, e: &EditorState<MemoryStore>, cols: u16, rows: u16) -> String {
        let mut out = Vec::new();
        view.paint(&mut out, Size { cols, rows }, e).unwrap();
        String::from_utf8(out).unwrap()
    }

    // -- Helpers -------------------------------------------------------------

    #[test]
    fn display_text_replaces_controls() {
        assert_eq!(display_text(b"a\tb"), "a b");
        assert_eq!(display_text(b"a\x1bb"), "a?b");
        assert_eq!(display_text(b"ok"), "ok");
        assert_eq!(display_text(b"\xff"), "\u{fffd}");
    }

    #[test]
    fn display_col_counts_columns() {
        assert_eq!(display_col(b"abc", 1), 0);
        assert_eq!(display_col(b"abc", 4), 3);
        assert_eq!(display_col("日本".as_bytes(), 4), 2);
        assert_eq!(display_col("日本".as_bytes(), 7), 4);
        assert_eq!(display_col(b"", 1), 0);
    }

    // -- Scrolling -----------------------------------------------------------

    #[test]
    fn scroll_follows_row() {
        let mut v = View::new();
        v.scroll_to(0, 10);
        assert_eq!(v.top(), 0);
        v.scroll_to(15, 10);
        assert_eq!(v.top(), 6);
        v.scroll_to(8, 10);
        assert_eq!(v.top(), 6);
        v.scroll_to(2, 10);
        assert_eq!(v.top(), 2);
    }

    #[test]
    fn scroll_zero_height_is_noop() {
        let mut v = View::new();
        v.scroll_to(50, 0);
        assert_eq!(v.top(), 0);
    }

    #[test]
    fn text_height_reserves_two_rows() {
        assert_eq!(View::text_height(24), 22);
        assert_eq!(View::text_height(2), 0);
        assert_eq!(View::text_height(1), 0);
    }

    // -- Painting ------------------------------------------------------------

    #[test]
    fn paint_shows_lines_status_and_cursor() {
        let mut e = editor_with("alpha\nbeta");
        e.apply(Command::Down, 1).unwrap();
        e.apply(Command::LineEnd, 1).unwrap();
        let mut v = View::new();
        let frame = paint(&mut v, &e, 40, 6);

        assert!(frame.contains("\x1b[1;1Halpha\x1b[K"));
        assert!(frame.contains("\x1b[2;1Hbeta\x1b[K"));
        // Status on row 5, inverse.
        assert!(frame.contains("\x1b[5;1H\x1b[7m f.txt"));
        assert!(frame.contains("9  2:5 "));
        // Cursor after "beta".
        assert!(frame.ends_with("\x1b[2;5H\x1b[?25h"));
    }

    #[test]
    fn paint_marks_modified() {
        let mut e = editor_with("a");
        e.apply(Command::Insert(b"x".to_vec()), 1).unwrap();
        let frame = paint(&mut View::new(), &e, 40, 5);
        assert!(frame.contains(" f.txt [+]"));
    }

    #[test]
    fn paint_cuts_wide_lines() {
        let e = editor_with("0123456789abcdef");
        let frame = paint(&mut View::new(), &e, 10, 4);
        assert!(frame.contains("0123456789\x1b[K"));
        assert!(!frame.contains("abcdef"));
    }

    #[test]
    fn paint_message_line() {
        let mut e = editor_with("a");
        e.handle(&n_term::input::Event::Key(n_term::input::KeyEvent::ctrl('x')))
            .unwrap();
        let frame = paint(&mut View::new(), &e, 20, 4);
        assert!(frame.contains("\x1b[4;1HC-x-"));
    }

    #[test]
    fn paint_error_message_in_red() {
        let mut e = editor_with("a");
        for ev in [
            n_term::input::Event::Key(n_term::input::KeyEvent::ctrl('x')),
            n_term::input::Event::Key(n_term::input::KeyEvent::ctrl('t')),
        ] {
            e.handle(&ev).unwrap();
        }
        let frame = paint(&mut View::new(), &e, 40, 4);
        assert!(frame.contains("\x1b[4;1H\x1b[31minvalid command: C-x C-t"));
    }

    #[test]
    fn paint_scrolls_to_cursor() {
        let text: Vec<String> = (1..=30).map(|i| format!("line{i}")).collect();
        let mut e = editor_with(&text.join("\n"));
        e.apply(Command::Down, 25).unwrap();
        let mut v = View::new();
        let frame = paint(&mut v, &e, 20, 12);
        // 10 text rows; row 26 must be the last one.
        assert_eq!(v.top(), 16);
        assert!(frame.contains("\x1b[1;1Hline17"));
        assert!(frame.contains("\x1b[10;1Hline26"));
        assert!(frame.ends_with("\x1b[10;1H\x1b[?25h"));
    }

    #[test]
    fn paint_tiny_terminal_does_not_panic() {
        let e = editor_with("abc");
        for rows in 0..3 {
            for cols in 0..3 {
                let _ = paint(&mut View::new(), &e, cols, rows);
            }
        }
    }
}
