// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: render, wait for one key, dispatch, repeat.
//
// The loop is deliberately sequential. There is no tick, no background
// reader and no dirty tracking: every input token produces exactly one
// new frame, and the next token is not read until that frame is out.
//
//   Render ──▶ AwaitInput ──▶ on_event ──┐
//     ▲                                  │ Continue
//     └──────────────────────────────────┘
//                                        │ Quit
//                                        ▼
//                              restore terminal, return
//
// # SIGWINCH Handling
//
// The resize handler only sets an `AtomicBool`. The blocking read is
// restarted by the kernel (`SA_RESTART`), so the new size is picked up at
// the next render, after the next key.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ansi;
use crate::input::Event;
use crate::reader::{ByteSource, KeyReader, StdinSource};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, consumed before each render.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop to do after handling a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Render again and wait for the next token.
    Continue,
    /// Leave the loop without another render.
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration calls [`paint`](App::paint) once, then blocks for one
/// token and hands it to [`on_event`](App::on_event).
pub trait App {
    /// Error type for event handling. Terminal I/O errors convert into it,
    /// so the loop can surface both through one `Result`.
    type Error: From<io::Error>;

    /// Handle one input token.
    ///
    /// # Errors
    ///
    /// An error ends the loop; the terminal is still restored.
    fn on_event(&mut self, event: &Event) -> Result<Action, Self::Error>;

    /// Called before painting when the terminal size changed.
    fn on_resize(&mut self, _size: Size) {}

    /// Write a complete frame (screen contents and final cursor position)
    /// into `out`. The loop wraps it in synchronized output and flushes it
    /// in one write.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()>;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal and the key reader. [`run`](Self::run) returns when
/// the application answers [`Action::Quit`], input ends, or an error occurs;
/// in every case the terminal has been restored by then.
///
/// # Example
///
/// ```no_run
/// use std::io::{self, Write};
/// use n_term::event_loop::{Action, App, EventLoop};
/// use n_term::input::{Event, KeyEvent};
/// use n_term::terminal::Size;
///
/// struct Hello;
///
/// impl App for Hello {
///     type Error = io::Error;
///
///     fn on_event(&mut self, event: &Event) -> io::Result<Action> {
///         if *event == Event::Key(KeyEvent::ctrl('c')) {
///             return Ok(Action::Quit);
///         }
///         Ok(Action::Continue)
///     }
///
///     fn paint(&mut self, out: &mut Vec<u8>, _size: Size) -> io::Result<()> {
///         out.write_all(b"hello")
///     }
/// }
///
/// EventLoop::new()?.run(&mut Hello)?;
/// # Ok::<(), io::Error>(())
/// ```
pub struct EventLoop<S: ByteSource = StdinSource> {
    terminal: Terminal,
    keys: KeyReader<S>,
}

impl EventLoop<StdinSource> {
    /// Create an event loop reading the real terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_source(StdinSource)
    }
}

impl<S: ByteSource> EventLoop<S> {
    /// Create an event loop over a custom byte source.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_source(source: S) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            keys: KeyReader::new(source),
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter raw mode, run until quit, restore the terminal.
    ///
    /// # Errors
    ///
    /// Returns the application's error, or a terminal I/O error converted
    /// into it. The terminal is restored before either is returned.
    pub fn run<A: App>(&mut self, app: &mut A) -> Result<(), A::Error> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let size = self.terminal.size();
        let result = drive(&mut self.keys, app, &mut io::stdout(), size, || {
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                Some(self.terminal.refresh_size())
            } else {
                None
            }
        });

        let restored = self.terminal.leave();
        result?;
        restored?;
        Ok(())
    }
}

/// The loop body, independent of the real terminal.
///
/// `resized` is polled before every render and returns the new size when
/// the terminal changed.
///
/// # Errors
///
/// Returns the first error from reading input, painting, writing the frame,
/// or the application's `on_event`.
pub fn drive<S, A, W, F>(
    keys: &mut KeyReader<S>,
    app: &mut A,
    out: &mut W,
    initial: Size,
    mut resized: F,
) -> Result<(), A::Error>
where
    S: ByteSource,
    A: App,
    W: Write,
    F: FnMut() -> Option<Size>,
{
    let mut size = initial;
    let mut frame = Vec::with_capacity(16_384);

    loop {
        // ── Render ───────────────────────────────────────────────
        if let Some(new_size) = resized() {
            size = new_size;
            app.on_resize(size);
        }
        frame.clear();
        ansi::begin_sync(&mut frame)?;
        app.paint(&mut frame, size)?;
        ansi::end_sync(&mut frame)?;
        out.write_all(&frame)?;
        out.flush()?;

        // ── Await input ──────────────────────────────────────────
        let Some(event) = keys.next_event()? else {
            return Ok(());
        };
        if app.on_event(&event)? == Action::Quit {
            return Ok(());
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
