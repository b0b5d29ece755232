//! Command resolution: input tokens in, editor commands out.
//!
//! The [`Resolver`] sits between the key reader and the editor. It owns the
//! only input state that spans keystrokes: a pending `C-x` prefix and the
//! `C-u` repeat multiplier.
//!
//! # Bindings
//!
//! | Command                          | Keys                |
//! |----------------------------------|---------------------|
//! | [`Up`](Command::Up)              | `<up>`, `C-p`       |
//! | [`Down`](Command::Down)          | `<down>`, `C-n`     |
//! | [`Forward`](Command::Forward)    | `<right>`, `C-f`    |
//! | [`Backward`](Command::Backward)  | `<left>`, `C-b`     |
//! | [`WordForward`](Command::WordForward)   | `M-f`        |
//! | [`WordBackward`](Command::WordBackward) | `M-b`        |
//! | [`LineStart`](Command::LineStart) | `C-a`, `<home>`    |
//! | [`LineEnd`](Command::LineEnd)    | `C-e`, `<end>`      |
//! | [`DeleteBackward`](Command::DeleteBackward) | `DEL`    |
//! | [`KillToEol`](Command::KillToEol) | `C-k`              |
//! | [`Save`](Command::Save)          | `C-x C-s`           |
//! | [`Quit`](Command::Quit)          | `C-x C-c` (and `C-q` with bare quit) |
//!
//! Every other token is literal text: it inserts the bytes the terminal
//! sent for it. Pasted text inserts itself with its line breaks removed.
//!
//! # States
//!
//! ```text
//!            C-x                          C-s / C-c
//!   Idle ───────────▶ PendingPrefix ──────────────▶ Execute, Idle
//!    │  ▲                  │   ▲
//!    │  │   any other key  │   │ C-x (restarts the prefix)
//!    │  └──────────────────┘   │
//!    │   "invalid command"  ───┘
//!    │
//!    │ C-u: multiplier 1 → 4 → 8 → 16 …
//!    │ anything else: Execute with the multiplier, reset it to 1
//! ```

use std::fmt;

use n_term::input::{Event, KeyCode, KeyEvent, Modifiers};

/// The prefix key for two-key commands.
pub const PREFIX: KeyEvent = KeyEvent::ctrl('x');

/// The repeat multiplier key.
pub const MULTIPLIER: KeyEvent = KeyEvent::ctrl('u');

/// Echoed while a prefix is pending.
const PREFIX_ECHO: &str = "C-x-";

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A semantic editor operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Forward,
    Backward,
    WordForward,
    WordBackward,
    LineStart,
    LineEnd,
    DeleteBackward,
    KillToEol,
    /// Insert these bytes at the cursor.
    Insert(Vec<u8>),
    Save,
    Quit,
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::WordForward => "word-forward",
            Self::WordBackward => "word-backward",
            Self::LineStart => "line-start",
            Self::LineEnd => "line-end",
            Self::DeleteBackward => "delete-backward",
            Self::KillToEol => "kill-line",
            Self::Insert(_) => "insert",
            Self::Save => "save",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// The outcome of feeding one input token to the [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A complete command, to run with the repeat `count` collected so far.
    Execute { command: Command, count: usize },

    /// More input is needed (a prefix or multiplier key). The string is the
    /// echo for the message line.
    Await(String),

    /// A prefix followed by a key that completes nothing. The key has been
    /// consumed; the string is the message to show.
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Maps input tokens to commands, tracking the prefix and multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    /// The prefix key waiting for its completion.
    pending: Option<KeyEvent>,

    /// Repeat count for the next command. Always >= 1.
    multiplier: usize,

    /// `C-u` presses since the multiplier was last consumed.
    multiplier_presses: usize,

    /// `C-q` quits without the prefix.
    bare_quit: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Resolver {
    /// A resolver in the idle state with multiplier 1.
    #[must_use]
    pub const fn new(bare_quit: bool) -> Self {
        Self {
            pending: None,
            multiplier: 1,
            multiplier_presses: 0,
            bare_quit,
        }
    }

    /// True while a prefix waits for its second key.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The repeat count the next command would get.
    #[inline]
    #[must_use]
    pub const fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// Feed one input token.
    pub fn resolve(&mut self, event: &Event) -> Step {
        match event {
            Event::Key(key) => self.resolve_key(*key),
            Event::Paste(text) => {
                if let Some(prefix) = self.pending.take() {
                    self.reset_multiplier();
                    return Step::Invalid(format!("invalid command: {prefix} <paste>"));
                }
                let bytes: Vec<u8> = text
                    .bytes()
                    .filter(|&b| b != b'\n' && b != b'\r')
                    .collect();
                self.execute(Command::Insert(bytes))
            }
            Event::Unknown(bytes) => {
                if let Some(prefix) = self.pending.take() {
                    self.reset_multiplier();
                    return Step::Invalid(format!(
                        "invalid command: {prefix} {}",
                        bytes.escape_ascii()
                    ));
                }
                self.execute(Command::Insert(bytes.clone()))
            }
        }
    }

    fn resolve_key(&mut self, key: KeyEvent) -> Step {
        if let Some(prefix) = self.pending.take() {
            if key == PREFIX {
                self.pending = Some(key);
                return Step::Await(PREFIX_ECHO.to_string());
            }
            return match completion(key) {
                Some(command) => self.execute(command),
                None => {
                    self.reset_multiplier();
                    Step::Invalid(format!("invalid command: {prefix} {key}"))
                }
            };
        }

        if key == PREFIX {
            self.pending = Some(key);
            return Step::Await(PREFIX_ECHO.to_string());
        }

        if key == MULTIPLIER {
            self.multiplier = if self.multiplier == 1 {
                4
            } else {
                self.multiplier.saturating_mul(2)
            };
            self.multiplier_presses += 1;
            return Step::Await(vec!["C-u"; self.multiplier_presses].join(" "));
        }

        if self.bare_quit && key.is_ctrl('q') {
            return self.execute(Command::Quit);
        }

        let command = single_key(key).unwrap_or_else(|| Command::Insert(key.encode()));
        self.execute(command)
    }

    /// Complete a command: hand out the multiplier and reset it.
    fn execute(&mut self, command: Command) -> Step {
        let count = self.multiplier;
        self.reset_multiplier();
        Step::Execute { command, count }
    }

    const fn reset_multiplier(&mut self) {
        self.multiplier = 1;
        self.multiplier_presses = 0;
    }
}

// ---------------------------------------------------------------------------
// Key tables
// ---------------------------------------------------------------------------

/// Second key after `C-x`.
fn completion(key: KeyEvent) -> Option<Command> {
    if key.is_ctrl('s') {
        Some(Command::Save)
    } else if key.is_ctrl('c') {
        Some(Command::Quit)
    } else {
        None
    }
}

/// Single-key bindings.
fn single_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.is_empty() {
        return match key.code {
            KeyCode::Up => Some(Command::Up),
            KeyCode::Down => Some(Command::Down),
            KeyCode::Right => Some(Command::Forward),
            KeyCode::Left => Some(Command::Backward),
            KeyCode::Home => Some(Command::LineStart),
            KeyCode::End => Some(Command::LineEnd),
            KeyCode::Backspace => Some(Command::DeleteBackward),
            _ => None,
        };
    }

    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    if key.modifiers == Modifiers::CTRL {
        match ch {
            'p' => Some(Command::Up),
            'n' => Some(Command::Down),
            'f' => Some(Command::Forward),
            'b' => Some(Command::Backward),
            'a' => Some(Command::LineStart),
            'e' => Some(Command::LineEnd),
            'k' => Some(Command::KillToEol),
            _ => None,
        }
    } else if key.modifiers == Modifiers::ALT {
        match ch {
            'f' => Some(Command::WordForward),
            'b' => Some(Command::WordBackward),
            _ => None,
        }
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
