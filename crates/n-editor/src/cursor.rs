//! Cursor: a 1-based (row, column) position in a [`LineBuffer`].
//!
//! Columns are byte offsets. The cursor may sit one past the last byte of
//! its line (the append position) and one row past the last line (the
//! virtual row where typing starts a new line). Every movement ends by
//! clamping into that range:
//!
//! ```text
//!   1 <= row <= line_count + 1
//!   1 <= col <= len(line at row) + 1
//! ```
//!
//! Vertical moves clamp the row and then the column against the new row.
//! Horizontal moves clamp the column and then the row; they never wrap
//! onto a neighbouring line.
//!
//! The cursor does not own or borrow the buffer. Movement methods take it
//! as a parameter, the same way edits on the buffer take the cursor.

use crate::buffer::LineBuffer;
use crate::word;

/// A position in a line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    row: usize,
    col: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// The top-left corner, (1, 1).
    #[must_use]
    pub const fn new() -> Self {
        Self { row: 1, col: 1 }
    }

    /// A cursor at (`row`, `col`), taken as given. Call
    /// [`clamp`](Self::clamp) before relying on it against a buffer.
    #[must_use]
    pub const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current row, 1-based.
    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Current column, 1-based byte offset.
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    // -- Clamping -----------------------------------------------------------

    /// Pull the row into `1..=line_count + 1`.
    pub fn clamp_row(&mut self, buf: &LineBuffer) {
        self.row = self.row.clamp(1, buf.line_count() + 1);
    }

    /// Pull the column into `1..=len + 1` for the current row's line.
    pub fn clamp_col(&mut self, buf: &LineBuffer) {
        self.col = self.col.clamp(1, buf.line_len(self.row) + 1);
    }

    /// Clamp the row, then the column.
    pub fn clamp(&mut self, buf: &LineBuffer) {
        self.clamp_row(buf);
        self.clamp_col(buf);
    }

    /// Clamp order for horizontal motion: column first, then row.
    fn clamp_horizontal(&mut self, buf: &LineBuffer) {
        self.clamp_col(buf);
        self.clamp_row(buf);
    }

    // -- Character and line motions -----------------------------------------

    /// Move up `n` rows.
    pub fn up(&mut self, buf: &LineBuffer, n: usize) {
        self.row = self.row.saturating_sub(n);
        self.clamp(buf);
    }

    /// Move down `n` rows. The row after the last line is reachable.
    pub fn down(&mut self, buf: &LineBuffer, n: usize) {
        self.row = self.row.saturating_add(n);
        self.clamp(buf);
    }

    /// Move right `n` bytes, stopping at the append position.
    pub fn forward(&mut self, buf: &LineBuffer, n: usize) {
        self.col = self.col.saturating_add(n);
        self.clamp_horizontal(buf);
    }

    /// Move left `n` bytes, stopping at column 1.
    pub fn backward(&mut self, buf: &LineBuffer, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.clamp_horizontal(buf);
    }

    /// Jump to column 1.
    pub const fn line_start(&mut self) {
        self.col = 1;
    }

    /// Jump to the append position of the current line.
    pub fn line_end(&mut self, buf: &LineBuffer) {
        self.col = buf.line_len(self.row) + 1;
    }

    // -- Word motions -------------------------------------------------------

    /// Move to the start of the next word on this line. Stays put when
    /// there is none.
    pub fn word_forward(&mut self, buf: &LineBuffer) {
        let line = buf.fetch(self.row);
        let tail = line.get(self.col.saturating_sub(1)..).unwrap_or_default();
        if let Some(offset) = word::next_word_offset(tail) {
            self.col += offset + 1;
        }
        self.clamp_horizontal(buf);
    }

    /// Move to the start of the previous word on this line. Stays put when
    /// there is none.
    pub fn word_backward(&mut self, buf: &LineBuffer) {
        let line = buf.fetch(self.row);
        let head = &line[..self.col.saturating_sub(1).min(line.len())];
        if let Some(offset) = word::last_word_offset(head) {
            self.col = offset + 1;
        }
        self.clamp_horizontal(buf);
    }

    // -- Edit support -------------------------------------------------------

    /// Step right by `n` bytes without clamping. Used by inserts, which
    /// grow the line first.
    pub(crate) const fn advance(&mut self, n: usize) {
        self.col = self.col.saturating_add(n);
    }

    /// Step left by one byte without clamping (never below column 1).
    pub(crate) const fn retreat(&mut self) {
        if self.col > 1 {
            self.col -= 1;
        }
    }
}
