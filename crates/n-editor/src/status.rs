//! Status line and message line text.
//!
//! Pure string builders; [`view`](crate::view) decides where they go and
//! how they are colored.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::cursor::Cursor;

/// Human-readable byte count: raw below 1000, then whole `k`, then whole
/// `M`. Division truncates.
#[must_use]
pub fn format_size(bytes: usize) -> String {
    match bytes {
        0..1_000 => bytes.to_string(),
        1_000..1_000_000 => format!("{}k", bytes / 1_000),
        _ => format!("{}M", bytes / 1_000_000),
    }
}

/// `row:col`, both 1-based.
#[must_use]
pub fn location(cursor: &Cursor) -> String {
    format!("{}:{}", cursor.row(), cursor.col())
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// How a message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Echo and confirmations.
    Info,
    /// Rejected input.
    Error,
}

/// A transient line of text under the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// StatusLine
// ---------------------------------------------------------------------------

/// The two halves of the status line: file on the left, size and position
/// on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub left: String,
    pub right: String,
}

impl StatusLine {
    /// Build the status for `name` with `bytes` of content and the cursor
    /// at `cursor`.
    #[must_use]
    pub fn new(name: &str, modified: bool, bytes: usize, cursor: &Cursor) -> Self {
        let marker = if modified { " [+]" } else { "" };
        Self {
            left: format!(" {name}{marker}"),
            right: format!("{}  {} ", format_size(bytes), location(cursor)),
        }
    }

    /// Lay the status out in exactly `width` display columns.
    ///
    /// The right half is kept whole when it fits; the left half is cut to
    /// make room.
    #[must_use]
    pub fn fit(&self, width: usize) -> String {
        let right_w = display_width(&self.right);
        if right_w >= width {
            return pad_to(truncate(&self.right, width), width);
        }
        let left = truncate(&self.left, width - right_w - 1);
        let gap = width - right_w - display_width(&left);
        format!("{left}{}{}", " ".repeat(gap), self.right)
    }
}

/// Display width of `s` in terminal columns.
#[must_use]
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// The longest prefix of `s` that fits in `width` columns.
#[must_use]
pub fn truncate(s: &str, width: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

fn pad_to(mut s: String, width: usize) -> String {
    let w = display_width(&s);
    if w < width {
        s.push_str(&" ".repeat(width - w));
    }
    s
}
