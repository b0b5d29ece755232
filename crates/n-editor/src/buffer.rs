//! Line buffer: the text being edited.
//!
//! A `LineBuffer` is an ordered list of lines, each an arbitrary byte string.
//! Nothing is decoded: columns are byte offsets and a line may hold invalid
//! UTF-8 without complaint. Rows are 1-based at the API, matching the
//! [`Cursor`], and the row just past the last line is a valid "virtual" row
//! where typing starts a new line.
//!
//! Edits take the cursor they apply at and move it as part of the edit, so
//! the caller never has to patch the column up afterwards.

use std::fmt;

use crate::cursor::Cursor;

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// An editable list of byte lines with a modified flag.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Vec<u8>>,
    modified: bool,
}

impl LineBuffer {
    /// An empty buffer (zero lines).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            modified: false,
        }
    }

    /// A buffer holding `lines`, unmodified.
    #[must_use]
    pub const fn from_lines(lines: Vec<Vec<u8>>) -> Self {
        Self {
            lines,
            modified: false,
        }
    }

    // -- Queries ------------------------------------------------------------

    /// Number of stored lines. The cursor may sit one row past this.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True if the buffer holds no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at 1-based `row`.
    ///
    /// Row 0 and rows past the end yield an empty slice rather than failing;
    /// that is what the virtual row after the last line looks like.
    #[must_use]
    pub fn fetch(&self, row: usize) -> &[u8] {
        row.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Byte length of the line at `row` (0 outside the buffer).
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.fetch(row).len()
    }

    /// All lines, in order.
    #[must_use]
    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Total number of bytes across all lines. Line separators are not
    /// counted.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    // -- Modified flag ------------------------------------------------------

    /// True if the buffer changed since it was loaded or last saved.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Record that the buffer now matches the file on disk.
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at the cursor and advance the cursor past it.
    ///
    /// On the virtual row after the last line, `text` becomes a new line.
    /// Otherwise it is spliced in before the byte at the cursor's column.
    /// Empty text changes nothing.
    pub fn insert(&mut self, cursor: &mut Cursor, text: &[u8]) {
        if text.is_empty() {
            return;
        }

        let idx = cursor.row().saturating_sub(1);
        match self.lines.get_mut(idx) {
            Some(line) => {
                let at = cursor.col().saturating_sub(1).min(line.len());
                line.splice(at..at, text.iter().copied());
            }
            None => self.lines.push(text.to_vec()),
        }

        cursor.advance(text.len());
        self.modified = true;
    }

    /// Delete the byte before the cursor (backspace).
    ///
    /// At column 1 nothing happens: lines are never joined.
    pub fn delete_backward(&mut self, cursor: &mut Cursor) {
        if cursor.col() <= 1 {
            return;
        }
        let idx = cursor.row().saturating_sub(1);
        let Some(line) = self.lines.get_mut(idx) else {
            return;
        };

        let at = cursor.col() - 2;
        if at < line.len() {
            line.remove(at);
            cursor.retreat();
            self.modified = true;
        }
    }

    /// Truncate the current line at the cursor (kill to end of line).
    ///
    /// The next line is never pulled up, and on the virtual row this is a
    /// no-op. The cursor does not move.
    pub fn kill_to_eol(&mut self, cursor: &Cursor) {
        let idx = cursor.row().saturating_sub(1);
        let Some(line) = self.lines.get_mut(idx) else {
            return;
        };

        let at = cursor.col().saturating_sub(1);
        if at < line.len() {
            line.truncate(at);
            self.modified = true;
        }
    }
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("lines", &self.lines.len())
            .field("bytes", &self.byte_size())
            .field("modified", &self.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
