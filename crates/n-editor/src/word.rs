//! Word motions (`M-f` / `M-b`).
//!
//! Words are runs of ASCII word bytes (`A-Z`, `a-z`, `0-9`, `_`). Matching
//! runs on bytes so a line holding invalid UTF-8 behaves like any other:
//!
//! - forward: search the line from the cursor on for
//!   `[^A-Za-z0-9_][A-Za-z0-9_]` and land on the word byte.
//! - backward: search the line before the cursor, minus trailing spaces,
//!   for a word followed by at most one more character at the end, and
//!   land on the start of the match.
//!
//! That trailing character is one UTF-8 character or, where the bytes are
//! not valid UTF-8, one raw byte. So from just after `bar-` or `baré` the
//! motion still lands on `bar`.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// A non-word byte followed by a word byte: the boundary into the next word.
static NEXT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)[^A-Za-z0-9_][A-Za-z0-9_]").expect("word boundary pattern is valid")
});

/// The last word in a prefix, optionally followed by one more character.
static LAST_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:[A-Za-z0-9_])+(?:.|(?-u:[\x80-\xFF]))?$")
        .expect("trailing word pattern is valid")
});

/// Offset in `tail` of the non-word byte just before the next word.
///
/// `tail` is the line from the cursor to the end. `None` means there is no
/// further word on the line.
#[must_use]
pub fn next_word_offset(tail: &[u8]) -> Option<usize> {
    NEXT_WORD.find(tail).map(|m| m.start())
}

/// Byte offset of the start of the last word in `head`.
///
/// `head` is the line before the cursor. Trailing spaces are skipped first,
/// so a cursor sitting after `"foo   "` still finds `foo`.
#[must_use]
pub fn last_word_offset(head: &[u8]) -> Option<usize> {
    let end = head
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |i| i + 1);
    LAST_WORD.find(&head[..end]).map(|m| m.start())
}
