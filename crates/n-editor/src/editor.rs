//! The editor state and the command interpreter that drives it.
//!
//! [`EditorState`] owns everything a session needs: the buffer, the
//! cursor, the key resolver, the file path, the message line, the options
//! and the store used for saving. One input token goes in through
//! [`handle`](EditorState::handle); it either updates the pending input
//! state or runs a command against the buffer and cursor.

use std::path::{Path, PathBuf};

use n_term::event_loop::Action;
use n_term::input::Event;
use tracing::{debug, info, warn};

use crate::buffer::LineBuffer;
use crate::command::{Command, Resolver, Step};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::options::Options;
use crate::status::Message;
use crate::store::{FileStore, LineStore};

/// A single-file editing session.
#[derive(Debug)]
pub struct EditorState<S: LineStore = FileStore> {
    buffer: LineBuffer,
    cursor: Cursor,
    resolver: Resolver,
    path: PathBuf,
    message: Option<Message>,
    options: Options,
    store: S,
}

impl EditorState<FileStore> {
    /// Open `path` from disk with the store the options ask for.
    ///
    /// # Errors
    ///
    /// [`EditorError::Load`](crate::error::EditorError::Load) if the file
    /// cannot be read.
    pub fn open_file(path: impl Into<PathBuf>, options: Options) -> Result<Self> {
        Self::open(path, options, FileStore::new(options.atomic_save))
    }
}

impl<S: LineStore> EditorState<S> {
    /// Load `path` through `store` and start with the cursor at (1, 1).
    ///
    /// # Errors
    ///
    /// [`EditorError::Load`](crate::error::EditorError::Load) if the store
    /// cannot read the file.
    pub fn open(path: impl Into<PathBuf>, options: Options, mut store: S) -> Result<Self> {
        let path = path.into();
        let lines = store.load_lines(&path)?;
        info!(path = %path.display(), lines = lines.len(), "opened");

        Ok(Self {
            buffer: LineBuffer::from_lines(lines),
            cursor: Cursor::new(),
            resolver: Resolver::new(options.bare_quit),
            path,
            message: None,
            options,
            store,
        })
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // -- Input ----------------------------------------------------------------

    /// Feed one input token.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`](crate::error::EditorError::Save) if a save
    /// command fails. Nothing else is fatal.
    pub fn handle(&mut self, event: &Event) -> Result<Action> {
        match self.resolver.resolve(event) {
            Step::Await(echo) => {
                self.message = Some(Message::info(echo));
                Ok(Action::Continue)
            }
            Step::Invalid(text) => {
                warn!(message = %text, "rejected key sequence");
                self.message = Some(Message::error(text));
                Ok(Action::Continue)
            }
            Step::Execute { command, count } => {
                debug!(%command, count, "execute");
                self.apply(command, count)
            }
        }
    }

    /// Run `command`. Motions by character or line move `count` steps;
    /// everything else runs once.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`](crate::error::EditorError::Save) if saving
    /// fails.
    pub fn apply(&mut self, command: Command, count: usize) -> Result<Action> {
        self.message = None;

        let buf = &mut self.buffer;
        let cur = &mut self.cursor;
        match command {
            Command::Up => cur.up(buf, count),
            Command::Down => cur.down(buf, count),
            Command::Forward => cur.forward(buf, count),
            Command::Backward => cur.backward(buf, count),
            Command::WordForward => cur.word_forward(buf),
            Command::WordBackward => cur.word_backward(buf),
            Command::LineStart => cur.line_start(),
            Command::LineEnd => cur.line_end(buf),
            Command::DeleteBackward => buf.delete_backward(cur),
            Command::KillToEol => buf.kill_to_eol(cur),
            Command::Insert(text) => buf.insert(cur, &text),
            Command::Save => self.save()?,
            Command::Quit => {
                info!(path = %self.path.display(), modified = self.buffer.is_modified(), "quit");
                return Ok(Action::Quit);
            }
        }
        Ok(Action::Continue)
    }

    /// Write the buffer back to its file.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`](crate::error::EditorError::Save) if the store
    /// cannot write.
    pub fn save(&mut self) -> Result<()> {
        self.store.save_lines(&self.path, self.buffer.lines())?;
        self.buffer.mark_saved();

        let n = self.buffer.line_count();
        info!(path = %self.path.display(), lines = n, "saved");
        self.message = Some(Message::info(format!(
            "Wrote {n} lines to {}",
            self.path.display()
        )));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::status::MessageKind;
    use crate::store::MemoryStore;
    use n_term::input::{KeyCode, KeyEvent};

    const PATH: &str = "test.txt";

    fn editor_with(text: &str) -> EditorState<MemoryStore> {
        let mut store = MemoryStore::new();
        store.insert(PATH, text);
        EditorState::open(PATH, Options::default(), store).unwrap()
    }

    fn feed(e: &mut EditorState<MemoryStore>, events: &[Event]) -> Action {
        let mut last = Action::Continue;
        for ev in events {
            last = e.handle(ev).unwrap();
        }
        last
    }

    fn ch(c: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(c)))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::ctrl(c))
    }

    fn typed(s: &str) -> Vec<Event> {
        s.chars().map(ch).collect()
    }

    fn lines(e: &EditorState<MemoryStore>) -> Vec<String> {
        e.buffer()
            .lines()
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    fn saved(e: &EditorState<MemoryStore>) -> Option<String> {
        e.store()
            .get(Path::new(PATH))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    fn at(e: &EditorState<MemoryStore>) -> (usize, usize) {
        (e.cursor().row(), e.cursor().col())
    }

    // -- Opening -------------------------------------------------------------

    #[test]
    fn open_loads_lines() {
        let e = editor_with("alpha\nbeta\n");
        assert_eq!(lines(&e), ["alpha", "beta"]);
        assert_eq!(at(&e), (1, 1));
        assert!(e.message().is_none());
        assert!(!e.buffer().is_modified());
    }

    #[test]
    fn open_missing_is_load_error() {
        let err = EditorState::open("nope", Options::default(), MemoryStore::new()).unwrap_err();
        assert!(matches!(err, EditorError::Load { .. }));
    }

    // -- Editing -------------------------------------------------------------

    #[test]
    fn typing_inserts_and_advances() {
        let mut e = editor_with("world");
        feed(&mut e, &typed("hello "));
        assert_eq!(lines(&e), ["hello world"]);
        assert_eq!(at(&e), (1, 7));
        assert!(e.buffer().is_modified());
    }

    #[test]
    fn append_line_at_end_of_buffer() {
        let mut e = editor_with("one\ntwo");
        feed(&mut e, &[ctrl('n'), ctrl('n')]);
        assert_eq!(at(&e), (3, 1));
        feed(&mut e, &typed("three"));
        assert_eq!(lines(&e), ["one", "two", "three"]);
        assert_eq!(e.buffer().line_count(), 3);
    }

    #[test]
    fn empty_file_typing_creates_first_line() {
        let mut e = editor_with("");
        assert_eq!(e.buffer().line_count(), 0);
        feed(&mut e, &typed("x"));
        assert_eq!(lines(&e), ["x"]);
    }

    #[test]
    fn backspace_and_kill() {
        let mut e = editor_with("hello world");
        feed(&mut e, &[ctrl('e')]);
        feed(&mut e, &[Event::Key(KeyEvent::plain(KeyCode::Backspace))]);
        assert_eq!(lines(&e), ["hello worl"]);
        feed(&mut e, &[ctrl('a'), Event::Key(KeyEvent::alt('f')), ctrl('k')]);
        assert_eq!(lines(&e), ["hello "]);
        assert_eq!(at(&e), (1, 7));
    }

    #[test]
    fn paste_inserts_on_one_line() {
        let mut e = editor_with("");
        feed(&mut e, &[Event::Paste("a\nb".into())]);
        assert_eq!(lines(&e), ["ab"]);
        assert_eq!(at(&e), (1, 3));
    }

    // -- Multiplier ----------------------------------------------------------

    #[test]
    fn multiplier_moves_and_resets() {
        let mut e = editor_with(&"line\n".repeat(20));
        feed(&mut e, &[ctrl('u')]);
        assert_eq!(e.message().unwrap().text, "C-u");
        feed(&mut e, &[ctrl('u')]);
        assert_eq!(e.message().unwrap().text, "C-u C-u");
        feed(&mut e, &[ctrl('n')]);
        assert_eq!(at(&e), (9, 1));
        assert!(e.message().is_none());
        feed(&mut e, &[ctrl('n')]);
        assert_eq!(at(&e), (10, 1));
    }

    #[test]
    fn multiplier_not_applied_to_word_motion() {
        let mut e = editor_with("a b c d e f");
        feed(&mut e, &[ctrl('u'), Event::Key(KeyEvent::alt('f'))]);
        assert_eq!(at(&e), (1, 3));
        assert_eq!(e.resolver().multiplier(), 1);
    }

    #[test]
    fn multiplier_inserts_once() {
        let mut e = editor_with("");
        feed(&mut e, &[ctrl('u'), ch('x')]);
        assert_eq!(lines(&e), ["x"]);
    }

    // -- Prefix commands -----------------------------------------------------

    #[test]
    fn prefix_echo() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ctrl('x')]);
        assert_eq!(e.message(), Some(&Message::info("C-x-")));
        assert!(e.resolver().is_pending());
    }

    #[test]
    fn prefix_invalid_leaves_buffer_alone() {
        let mut e = editor_with("abc");
        let action = feed(&mut e, &[ctrl('x'), ch('z')]);
        assert_eq!(action, Action::Continue);
        assert_eq!(lines(&e), ["abc"]);
        assert!(!e.buffer().is_modified());
        assert!(!e.resolver().is_pending());
        let msg = e.message().unwrap();
        assert_eq!(msg.text, "invalid command: C-x z");
        assert_eq!(msg.kind, MessageKind::Error);
    }

    #[test]
    fn prefix_save_persists() {
        let mut e = editor_with("alpha\nbeta\n");
        feed(&mut e, &[ctrl('e')]);
        feed(&mut e, &typed("!"));
        feed(&mut e, &[ctrl('x'), ctrl('s')]);
        assert_eq!(saved(&e).as_deref(), Some("alpha!\nbeta"));
        assert!(!e.buffer().is_modified());
        assert!(!e.resolver().is_pending());
        assert_eq!(e.message().unwrap().text, "Wrote 2 lines to test.txt");
    }

    #[test]
    fn save_then_reload_round_trips() {
        let mut e = editor_with("alpha\nbeta");
        feed(&mut e, &[ctrl('x'), ctrl('s')]);
        let store = e.store().clone();
        let again = EditorState::open(PATH, Options::default(), store).unwrap();
        assert_eq!(lines(&again), ["alpha", "beta"]);
    }

    #[test]
    fn save_failure_is_fatal() {
        let mut store = MemoryStore::new();
        store.insert(PATH, "x");
        store.fail_saves(true);
        let mut e = EditorState::open(PATH, Options::default(), store).unwrap();
        e.handle(&ctrl('x')).unwrap();
        let err = e.handle(&ctrl('s')).unwrap_err();
        assert!(matches!(err, EditorError::Save { .. }));
    }

    #[test]
    fn prefix_quit() {
        let mut e = editor_with("abc");
        assert_eq!(feed(&mut e, &[ctrl('x'), ctrl('c')]), Action::Quit);
    }

    #[test]
    fn bare_quit_only_when_enabled() {
        let mut e = editor_with("abc");
        assert_eq!(feed(&mut e, &[ctrl('q')]), Action::Continue);
        assert_eq!(lines(&e), ["abc"]);

        let mut store = MemoryStore::new();
        store.insert(PATH, "abc");
        let opts = Options {
            bare_quit: true,
            ..Options::default()
        };
        let mut e = EditorState::open(PATH, opts, store).unwrap();
        assert_eq!(e.handle(&ctrl('q')).unwrap(), Action::Quit);
    }

    // -- Messages ------------------------------------------------------------

    #[test]
    fn command_clears_message() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ctrl('x'), ch('z')]);
        assert!(e.message().is_some());
        feed(&mut e, &[ctrl('f')]);
        assert!(e.message().is_none());
    }

    #[test]
    fn unbound_key_is_literal_text() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ctrl('x'), ch('z'), ctrl('u')]);
        feed(&mut e, &[Event::Key(KeyEvent::plain(KeyCode::Escape))]);
        assert!(e.message().is_none());
        assert_eq!(e.resolver().multiplier(), 1);
        assert_eq!(e.buffer().fetch(1), b"\x1babc");
        assert_eq!(at(&e), (1, 2));
    }

    #[test]
    fn enter_ctrl_and_meta_chords_insert_bytes() {
        let mut e = editor_with("abc");
        feed(&mut e, &[
            Event::Key(KeyEvent::plain(KeyCode::Enter)),
            ctrl('t'),
            Event::Key(KeyEvent::alt('x')),
        ]);
        assert_eq!(e.buffer().fetch(1), b"\r\x14\x1bxabc");
        assert_eq!(at(&e), (1, 5));
        assert!(e.buffer().is_modified());
    }

    #[test]
    fn unknown_token_after_prefix_does_not_save() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ch('x'), ctrl('x'), Event::Unknown(b"\x1b[99~".to_vec()), ctrl('s')]);
        let msg = e.message();
        assert!(msg.is_none(), "{msg:?}");
        assert!(e.store().get(Path::new(PATH)).is_some_and(|saved| saved == b"abc"));
        assert_eq!(e.buffer().fetch(1), b"x\x13abc");
    }

    // -- Invariant -----------------------------------------------------------

    #[test]
    fn cursor_stays_in_bounds_through_session() {
        let mut e = editor_with("foo bar-baz\n\nshort\nlonger line here");
        let script = [
            ctrl('u'),
            ctrl('u'),
            ctrl('n'),
            ctrl('e'),
            Event::Key(KeyEvent::plain(KeyCode::Up)),
            Event::Key(KeyEvent::alt('b')),
            ctrl('k'),
            ctrl('p'),
            ctrl('u'),
            ctrl('f'),
            Event::Key(KeyEvent::plain(KeyCode::Backspace)),
            ch('Z'),
            Event::Key(KeyEvent::plain(KeyCode::End)),
            Event::Key(KeyEvent::plain(KeyCode::Down)),
            Event::Key(KeyEvent::alt('f')),
        ];
        for ev in &script {
            e.handle(ev).unwrap();
            let (row, col) = at(&e);
            let b = e.buffer();
            assert!((1..=b.line_count() + 1).contains(&row), "{ev:?}");
            assert!((1..=b.line_len(row) + 1).contains(&col), "{ev:?}");
        }
    }
}
