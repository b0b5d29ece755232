// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key tokens the editor can resolve. Handles
// the encodings a plain VT100/xterm terminal produces in raw mode:
//
// - Single bytes: printable ASCII and C0 control codes (Ctrl+letter)
// - CSI sequences (arrows, Home/End, editing and function keys)
// - SS3 sequences (arrows and F1-F4 in application cursor mode)
// - Meta/Alt+key (ESC followed by a printable or control byte)
// - Bracketed paste (accumulated between the paste delimiters)
// - UTF-8 multi-byte characters
//
// Bytes that decode to none of these are not dropped: they come out as an
// `Unknown` token carrying the bytes verbatim.
//
// # Design
//
// The parser keeps a small byte buffer because a sequence can straddle
// two `read()` calls. Feed bytes with [`Parser::advance`] and take the
// returned events. When the buffer still holds an incomplete sequence
// and no more bytes arrive within the reader's poll window, call
// [`Parser::flush`] to emit the leftovers as literal keys (a lone ESC
// becomes the Escape key).

use std::fmt;

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A single key press.
    Key(KeyEvent),
    /// Bracketed paste content, delivered as one token.
    Paste(String),
    /// Bytes that form no key this parser knows.
    Unknown(Vec<u8>),
}

/// A key press: key identity plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// `Ctrl` + `ch`.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// `Alt` (Meta) + `ch`.
    #[must_use]
    pub const fn alt(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::ALT,
        }
    }

    /// True if this is `Ctrl` + `ch` with no other modifier.
    #[inline]
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers == Modifiers::CTRL && self.code == KeyCode::Char(ch)
    }

    /// The bytes an xterm-style terminal sends for this key.
    ///
    /// Keys that arrive as one byte or as `ESC` plus one key encode back to
    /// exactly those bytes. Named keys use the canonical CSI form, or SS3
    /// for unmodified F1-F4.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let rest = self.modifiers.difference(Modifiers::ALT);
        if let Some(mut bytes) = byte_form(self.code, rest) {
            if self.modifiers.contains(Modifiers::ALT) {
                bytes.insert(0, 0x1B);
            }
            return bytes;
        }
        sequence_form(self.code, self.modifiers)
    }
}

/// Encoding of keys that fit in one byte or one UTF-8 character.
fn byte_form(code: KeyCode, mods: Modifiers) -> Option<Vec<u8>> {
    let plain = mods.is_empty();
    let byte = match code {
        KeyCode::Char(ch) if plain || mods == Modifiers::SHIFT => {
            let mut buf = [0; 4];
            return Some(ch.encode_utf8(&mut buf).as_bytes().to_vec());
        }
        KeyCode::Char(ch) if mods == Modifiers::CTRL => ctrl_byte(ch)?,
        KeyCode::Enter if plain => 0x0D,
        KeyCode::Tab if plain => 0x09,
        KeyCode::Backspace if plain => 0x7F,
        KeyCode::Escape if plain => 0x1B,
        _ => return None,
    };
    Some(vec![byte])
}

/// Encoding of keys that need an escape sequence.
fn sequence_form(code: KeyCode, mods: Modifiers) -> Vec<u8> {
    let param = mods.bits() + 1;
    let letter = |c: char| {
        if mods.is_empty() {
            format!("\x1b[{c}")
        } else {
            format!("\x1b[1;{param}{c}")
        }
    };
    let tilde = |n: u8| {
        if mods.is_empty() {
            format!("\x1b[{n}~")
        } else {
            format!("\x1b[{n};{param}~")
        }
    };
    let seq = match code {
        KeyCode::Up => letter('A'),
        KeyCode::Down => letter('B'),
        KeyCode::Right => letter('C'),
        KeyCode::Left => letter('D'),
        KeyCode::Home => letter('H'),
        KeyCode::End => letter('F'),
        KeyCode::Insert => tilde(2),
        KeyCode::Delete => tilde(3),
        KeyCode::PageUp => tilde(5),
        KeyCode::PageDown => tilde(6),
        KeyCode::F(n @ 1..=4) if mods.is_empty() => format!("\x1bO{}", char::from(b'O' + n)),
        KeyCode::F(n @ 1..=4) => letter(char::from(b'O' + n)),
        KeyCode::F(n) => tilde(function_code(n)),
        KeyCode::Tab if mods == Modifiers::SHIFT => "\x1b[Z".to_string(),
        // Modifier combinations no terminal sends: drop the modifiers.
        _ => return byte_form(code, Modifiers::empty()).unwrap_or_default(),
    };
    seq.into_bytes()
}

/// The C0 byte for `Ctrl` + `ch`.
#[allow(clippy::cast_possible_truncation)]
const fn ctrl_byte(ch: char) -> Option<u8> {
    match ch {
        'a'..='z' => Some(ch as u8 - 0x60),
        '@'..='_' => Some(ch as u8 - 0x40),
        _ => None,
    }
}

/// The `CSI n ~` parameter for function key F`n`, n >= 5.
const fn function_code(n: u8) -> u8 {
    match n {
        0..=5 => n + 10,
        6..=10 => n + 11,
        11..=14 => n + 12,
        15..=16 => n + 13,
        _ => n.saturating_add(14),
    }
}

/// Emacs-style key notation: `C-x`, `M-f`, `C-M-a`, `<up>`, `a`.
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("M-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("S-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("SPC"),
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::Enter => f.write_str("RET"),
            KeyCode::Tab => f.write_str("TAB"),
            KeyCode::Backspace => f.write_str("DEL"),
            KeyCode::Escape => f.write_str("ESC"),
            KeyCode::Delete => f.write_str("<delete>"),
            KeyCode::Insert => f.write_str("<insert>"),
            KeyCode::Up => f.write_str("<up>"),
            KeyCode::Down => f.write_str("<down>"),
            KeyCode::Left => f.write_str("<left>"),
            KeyCode::Right => f.write_str("<right>"),
            KeyCode::Home => f.write_str("<home>"),
            KeyCode::End => f.write_str("<end>"),
            KeyCode::PageUp => f.write_str("<prior>"),
            KeyCode::PageDown => f.write_str("<next>"),
            KeyCode::F(n) => write!(f, "<f{n}>"),
        }
    }
}

/// Identity of a key.
///
/// Printable characters use [`Char`](KeyCode::Char); Ctrl+letter arrives
/// as `Char(letter)` with [`Modifiers::CTRL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F20.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Bit layout matches the xterm CSI modifier encoding
    /// (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Bracketed paste opening delimiter: `ESC [ 200 ~`
const PASTE_START: &[u8] = b"\x1b[200~";
/// Bracketed paste closing delimiter: `ESC [ 201 ~`
const PASTE_END: &[u8] = b"\x1b[201~";

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect [`Event`]s.
/// Incomplete sequences stay buffered until more bytes arrive or
/// [`flush`](Parser::flush) is called.
pub struct Parser {
    /// Raw bytes not yet turned into events.
    buf: Vec<u8>,
    /// Inside a bracketed paste, waiting for the closing delimiter.
    in_paste: bool,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Feed raw bytes and return every event that can be parsed so far.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            // ── Paste mode: scan for closing delimiter ──────────────
            if self.in_paste {
                let remaining = &self.buf[pos..];
                if let Some(end_offset) = find_subsequence(remaining, PASTE_END) {
                    let text = String::from_utf8_lossy(&remaining[..end_offset]).into_owned();
                    events.push(Event::Paste(text));
                    pos += end_offset + PASTE_END.len();
                    self.in_paste = false;
                } else {
                    break;
                }
                continue;
            }

            let remaining = &self.buf[pos..];
            if remaining.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            // A strict prefix of the paste opener: wait for the rest.
            if remaining.len() < PASTE_START.len()
                && remaining.len() > 2
                && PASTE_START.starts_with(remaining)
            {
                break;
            }

            match try_parse(remaining) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there buffered bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Emit buffered bytes as literal keys.
    ///
    /// A lone ESC becomes [`KeyCode::Escape`]; `ESC [` and `ESC O`
    /// prefixes that never completed become Escape plus the literal
    /// characters. A truncated UTF-8 character comes out one
    /// [`Event::Unknown`] byte at a time. An unterminated paste is
    /// delivered as-is.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.in_paste {
            let text = String::from_utf8_lossy(&self.buf).into_owned();
            events.push(Event::Paste(text));
            self.in_paste = false;
            self.buf.clear();
            return events;
        }
        for &byte in &self.buf {
            let event = match byte {
                0x1B => Event::Key(KeyEvent::plain(KeyCode::Escape)),
                b => single_byte(b).map_or_else(|| Event::Unknown(vec![b]), Event::Key),
            };
            events.push(event);
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// Each function reads from the front of a slice and reports what it found
// plus how many bytes that consumed.

/// Result of trying to parse one event from the front of the buffer.
enum Parsed {
    /// An event, consuming `usize` bytes.
    Event(Event, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
}

/// The first `len` bytes of `buf` as an [`Event::Unknown`] token.
fn unknown(buf: &[u8], len: usize) -> Parsed {
    Parsed::Event(Event::Unknown(buf[..len].to_vec()), len)
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0xC0..=0xFF => parse_utf8(buf),
        b => single_byte(b).map_or_else(|| unknown(buf, 1), |key| Parsed::Event(Event::Key(key), 1)),
    }
}

/// Decode a single non-ESC byte below 0x80.
const fn single_byte(b: u8) -> Option<KeyEvent> {
    let key = match b {
        0x00 => KeyEvent::ctrl('@'),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0D => KeyEvent::plain(KeyCode::Enter),
        0x01..=0x1A => KeyEvent::ctrl((b + b'a' - 1) as char),
        0x1C..=0x1F => KeyEvent::ctrl((b + b'A' - 1) as char),
        0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
        _ => return None,
    };
    Some(key)
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Event(
            Event::Key(KeyEvent {
                code: KeyCode::Escape,
                modifiers: Modifiers::ALT,
            }),
            2,
        ),
        // Meta+printable: the `ESC f` / `ESC b` encoding of M-f / M-b.
        b @ 0x20..=0x7E => Parsed::Event(Event::Key(KeyEvent::alt(b as char)), 2),
        b @ 0x01..=0x1A => Parsed::Event(
            Event::Key(KeyEvent {
                code: KeyCode::Char((b + b'a' - 1) as char),
                modifiers: Modifiers::ALT | Modifiers::CTRL,
            }),
            2,
        ),
        0x7F => Parsed::Event(
            Event::Key(KeyEvent {
                code: KeyCode::Backspace,
                modifiers: Modifiers::ALT,
            }),
            2,
        ),
        _ => Parsed::Event(Event::Key(KeyEvent::plain(KeyCode::Escape)), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E). Parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return unknown(buf, end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params
        .get(1)
        .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = if final_byte == b'~' {
        match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            n @ 11..=15 => KeyCode::F(function_key(n - 10)),
            n @ 17..=21 => KeyCode::F(function_key(n - 11)),
            n @ 23..=26 => KeyCode::F(function_key(n - 12)),
            n @ 28..=29 => KeyCode::F(function_key(n - 13)),
            n @ 31..=34 => KeyCode::F(function_key(n - 14)),
            _ => return unknown(buf, consumed),
        }
    } else {
        match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'Z' => {
                return Parsed::Event(
                    Event::Key(KeyEvent {
                        code: KeyCode::Tab,
                        modifiers: Modifiers::SHIFT,
                    }),
                    consumed,
                );
            }
            _ => return unknown(buf, consumed),
        }
    };

    Parsed::Event(Event::Key(KeyEvent { code, modifiers }), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return unknown(buf, 3),
    };

    Parsed::Event(Event::Key(KeyEvent::plain(code)), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return unknown(buf, 1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    match std::str::from_utf8(&buf[..expected]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Parsed::Event(Event::Key(KeyEvent::plain(KeyCode::Char(ch))), expected),
        None => unknown(buf, 1),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse semicolon-separated CSI numeric parameters. Empty fields are 0.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode an xterm modifier parameter (`1 + bitmask`).
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Narrow a function-key index already bounded by the match arm.
#[allow(clippy::cast_possible_truncation)]
const fn function_key(n: u16) -> u8 {
    n as u8
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for bytes that cannot start a character.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Event {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected one event from {data:?}, got {events:?}");
        events.into_iter().next().unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent { code, modifiers })
    }

    // ── Single bytes ─────────────────────────────────────────────

    #[test]
    fn ascii_char() {
        assert_eq!(parse_one(b"a"), key(KeyCode::Char('a')));
    }

    #[test]
    fn ascii_run_is_one_event_per_byte() {
        let events = parse(b"hi!");
        assert_eq!(
            events,
            vec![
                key(KeyCode::Char('h')),
                key(KeyCode::Char('i')),
                key(KeyCode::Char('!')),
            ]
        );
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse_one(&[0x01]), Event::Key(KeyEvent::ctrl('a')));
        assert_eq!(parse_one(&[0x0B]), Event::Key(KeyEvent::ctrl('k')));
        assert_eq!(parse_one(&[0x15]), Event::Key(KeyEvent::ctrl('u')));
        assert_eq!(parse_one(&[0x18]), Event::Key(KeyEvent::ctrl('x')));
        assert_eq!(parse_one(&[0x13]), Event::Key(KeyEvent::ctrl('s')));
    }

    #[test]
    fn ctrl_at_is_nul() {
        assert_eq!(parse_one(&[0x00]), Event::Key(KeyEvent::ctrl('@')));
    }

    #[test]
    fn backspace_both_encodings() {
        assert_eq!(parse_one(&[0x7F]), key(KeyCode::Backspace));
        assert_eq!(parse_one(&[0x08]), key(KeyCode::Backspace));
    }

    #[test]
    fn enter_and_tab() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), Event::Key(KeyEvent::ctrl('j')));
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
    }

    // ── CSI ──────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn modified_arrow() {
        assert_eq!(
            parse_one(b"\x1b[1;5C"),
            key_mod(KeyCode::Right, Modifiers::CTRL)
        );
    }

    #[test]
    fn home_end_variants() {
        assert_eq!(parse_one(b"\x1b[H"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[F"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[1~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[4~"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[7~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[8~"), key(KeyCode::End));
    }

    #[test]
    fn editing_keys() {
        assert_eq!(parse_one(b"\x1b[2~"), key(KeyCode::Insert));
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
    }

    #[test]
    fn function_keys() {
        assert_eq!(parse_one(b"\x1b[15~"), key(KeyCode::F(5)));
        assert_eq!(parse_one(b"\x1b[17~"), key(KeyCode::F(6)));
        assert_eq!(parse_one(b"\x1b[21~"), key(KeyCode::F(10)));
        assert_eq!(parse_one(b"\x1b[24~"), key(KeyCode::F(12)));
        assert_eq!(parse_one(b"\x1bOP"), key(KeyCode::F(1)));
    }

    #[test]
    fn shift_tab() {
        assert_eq!(parse_one(b"\x1b[Z"), key_mod(KeyCode::Tab, Modifiers::SHIFT));
    }

    #[test]
    fn unknown_csi_is_kept_verbatim() {
        assert_eq!(parse_one(b"\x1b[99~"), Event::Unknown(b"\x1b[99~".to_vec()));
        assert_eq!(parse_one(b"\x1b[5X"), Event::Unknown(b"\x1b[5X".to_vec()));
    }

    #[test]
    fn malformed_csi_is_kept_verbatim() {
        assert_eq!(
            parse(b"\x1b[1\x01a"),
            vec![
                Event::Unknown(b"\x1b[1\x01".to_vec()),
                key(KeyCode::Char('a')),
            ]
        );
    }

    // ── SS3 ──────────────────────────────────────────────────────

    #[test]
    fn ss3_arrows() {
        assert_eq!(parse_one(b"\x1bOA"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1bOD"), key(KeyCode::Left));
    }

    #[test]
    fn unknown_ss3_is_kept_verbatim() {
        assert_eq!(parse_one(b"\x1bOz"), Event::Unknown(b"\x1bOz".to_vec()));
    }

    // ── Meta ─────────────────────────────────────────────────────

    #[test]
    fn meta_letters() {
        assert_eq!(parse_one(b"\x1bf"), Event::Key(KeyEvent::alt('f')));
        assert_eq!(parse_one(b"\x1bb"), Event::Key(KeyEvent::alt('b')));
    }

    #[test]
    fn meta_ctrl() {
        assert_eq!(
            parse_one(&[0x1B, 0x01]),
            key_mod(KeyCode::Char('a'), Modifiers::ALT | Modifiers::CTRL)
        );
    }

    // ── Incomplete / flush ───────────────────────────────────────

    #[test]
    fn lone_escape_waits_then_flushes() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn sequence_split_across_reads() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.advance(b"A"), vec![key(KeyCode::Up)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn flush_unfinished_csi() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(
            p.flush(),
            vec![key(KeyCode::Escape), key(KeyCode::Char('['))]
        );
    }

    // ── UTF-8 ────────────────────────────────────────────────────

    #[test]
    fn utf8_two_byte() {
        assert_eq!(parse_one("é".as_bytes()), key(KeyCode::Char('é')));
    }

    #[test]
    fn utf8_four_byte() {
        assert_eq!(parse_one("🦀".as_bytes()), key(KeyCode::Char('🦀')));
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "世".as_bytes();
        let mut p = Parser::new();
        assert!(p.advance(&bytes[..1]).is_empty());
        assert_eq!(p.advance(&bytes[1..]), vec![key(KeyCode::Char('世'))]);
    }

    #[test]
    fn stray_continuation_byte_is_unknown() {
        assert_eq!(
            parse(&[0x80, b'a']),
            vec![Event::Unknown(vec![0x80]), key(KeyCode::Char('a'))]
        );
    }

    #[test]
    fn invalid_utf8_is_unknown_per_byte() {
        // A lead byte followed by a non-continuation byte.
        assert_eq!(
            parse(&[0xC3, b'a']),
            vec![Event::Unknown(vec![0xC3]), key(KeyCode::Char('a'))]
        );
    }

    #[test]
    fn flush_truncated_utf8() {
        let mut p = Parser::new();
        assert!(p.advance(&[0xE4, 0xB8]).is_empty());
        assert_eq!(
            p.flush(),
            vec![Event::Unknown(vec![0xE4]), Event::Unknown(vec![0xB8])]
        );
    }

    // ── Paste ────────────────────────────────────────────────────

    #[test]
    fn bracketed_paste() {
        assert_eq!(
            parse_one(b"\x1b[200~hello world\x1b[201~"),
            Event::Paste("hello world".into())
        );
    }

    #[test]
    fn paste_split_across_reads() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[200~abc").is_empty());
        assert_eq!(p.advance(b"def\x1b[201~x"), vec![
            Event::Paste("abcdef".into()),
            key(KeyCode::Char('x')),
        ]);
    }

    #[test]
    fn paste_opener_prefix_waits() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[20").is_empty());
        assert_eq!(p.advance(b"0~z\x1b[201~"), vec![Event::Paste("z".into())]);
    }

    // ── Display ──────────────────────────────────────────────────

    #[test]
    fn key_notation() {
        assert_eq!(KeyEvent::ctrl('x').to_string(), "C-x");
        assert_eq!(KeyEvent::alt('f').to_string(), "M-f");
        assert_eq!(KeyEvent::plain(KeyCode::Char('q')).to_string(), "q");
        assert_eq!(KeyEvent::plain(KeyCode::Char(' ')).to_string(), "SPC");
        assert_eq!(KeyEvent::plain(KeyCode::Up).to_string(), "<up>");
        assert_eq!(
            KeyEvent {
                code: KeyCode::Char('a'),
                modifiers: Modifiers::CTRL | Modifiers::ALT,
            }
            .to_string(),
            "C-M-a"
        );
    }

    #[test]
    fn key_predicates() {
        assert!(KeyEvent::ctrl('x').is_ctrl('x'));
        assert!(!KeyEvent::ctrl('x').is_ctrl('c'));
        assert!(!KeyEvent::alt('x').is_ctrl('x'));
    }

    // ── Encoding ─────────────────────────────────────────────────

    #[test]
    fn encode_single_byte_keys() {
        assert_eq!(KeyEvent::ctrl('t').encode(), b"\x14");
        assert_eq!(KeyEvent::ctrl('@').encode(), b"\x00");
        assert_eq!(KeyEvent::ctrl('j').encode(), b"\n");
        assert_eq!(KeyEvent::plain(KeyCode::Enter).encode(), b"\r");
        assert_eq!(KeyEvent::plain(KeyCode::Tab).encode(), b"\t");
        assert_eq!(KeyEvent::plain(KeyCode::Escape).encode(), b"\x1b");
        assert_eq!(KeyEvent::plain(KeyCode::Char('é')).encode(), "é".as_bytes());
    }

    #[test]
    fn encode_meta_keys() {
        assert_eq!(KeyEvent::alt('x').encode(), b"\x1bx");
        let meta_ctrl = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: Modifiers::ALT | Modifiers::CTRL,
        };
        assert_eq!(meta_ctrl.encode(), b"\x1b\x01");
    }

    #[test]
    fn encode_named_keys() {
        assert_eq!(KeyEvent::plain(KeyCode::Delete).encode(), b"\x1b[3~");
        assert_eq!(KeyEvent::plain(KeyCode::F(1)).encode(), b"\x1bOP");
        assert_eq!(KeyEvent::plain(KeyCode::F(5)).encode(), b"\x1b[15~");
        assert_eq!(KeyEvent::plain(KeyCode::F(12)).encode(), b"\x1b[24~");
        assert_eq!(key_code_with(KeyCode::Right, Modifiers::CTRL).encode(), b"\x1b[1;5C");
        assert_eq!(key_code_with(KeyCode::Tab, Modifiers::SHIFT).encode(), b"\x1b[Z");
    }

    #[test]
    fn encode_matches_parsed_bytes() {
        for bytes in [
            &b"\x14"[..],
            b"\r",
            b"\n",
            b"\x1bx",
            b"\x1b\x01",
            b"\x1b\x1b",
            b"\x1b[3~",
            b"\x1b[1;5C",
            b"\x1b[17~",
            b"\x1bOQ",
            "世".as_bytes(),
        ] {
            let Event::Key(k) = parse_one(bytes) else {
                panic!("{bytes:?} is not a key");
            };
            assert_eq!(k.encode(), bytes, "{k}");
        }
    }

    fn key_code_with(code: KeyCode, modifiers: Modifiers) -> KeyEvent {
        KeyEvent { code, modifiers }
    }
}
