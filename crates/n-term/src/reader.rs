// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Blocking key reader: one input token at a time from the terminal.
//
// The editor loop is strictly sequential: render, then block until the
// next key, then resolve it. `KeyReader` owns the input parser and a small
// queue of already-parsed events, so a read that returns several keys at
// once (typing fast, or a paste without bracketed mode) is handed out one
// token per call.
//
// Escape ambiguity: a lone ESC byte might be the Escape key or the first
// byte of a sequence whose tail has not arrived yet. When the parser is
// left holding bytes, the reader polls the source for `ESC_TIMEOUT_MS`.
// More bytes → keep parsing. Silence → flush the leftovers as literal keys.

use std::collections::VecDeque;
use std::io;

use crate::input::{Event, Parser};

/// Size of one raw read. A key is 1-6 bytes; a paste can be far larger
/// and simply takes several reads.
const READ_BUF_SIZE: usize = 4096;

/// How long to wait for the tail of an escape sequence (milliseconds).
const ESC_TIMEOUT_MS: i32 = 10;

// ─── Byte Source ────────────────────────────────────────────────────────────

/// Where raw input bytes come from.
///
/// The terminal implementation is [`StdinSource`]; tests substitute a
/// scripted source.
pub trait ByteSource {
    /// Block until at least one byte is available and read it into `buf`.
    /// Returns `Ok(0)` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates the underlying read error.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Wait up to `timeout_ms` for input. Returns `true` if bytes are ready.
    ///
    /// # Errors
    ///
    /// Propagates the underlying poll error.
    fn wait(&mut self, timeout_ms: i32) -> io::Result<bool>;
}

/// Raw stdin, read through the file descriptor so Rust's line-buffered
/// `Stdin` never sits between the terminal and the parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            // SIGWINCH interrupts the blocking read; just retry.
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn wait(&mut self, timeout_ms: i32) -> io::Result<bool> {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, timeout_ms)
        };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(ready > 0)
    }
}

/// Non-unix fallback: blocking reads, no escape timeout.
#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;
        io::stdin().lock().read(buf)
    }

    fn wait(&mut self, _timeout_ms: i32) -> io::Result<bool> {
        Ok(false)
    }
}

// ─── KeyReader ──────────────────────────────────────────────────────────────

/// Turns a [`ByteSource`] into a stream of single input tokens.
///
/// # Example
///
/// ```no_run
/// use n_term::reader::{KeyReader, StdinSource};
///
/// let mut keys = KeyReader::new(StdinSource);
/// while let Some(event) = keys.next_event()? {
///     println!("{event:?}");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct KeyReader<S: ByteSource> {
    source: S,
    parser: Parser,
    queue: VecDeque<Event>,
    buf: Vec<u8>,
}

impl<S: ByteSource> KeyReader<S> {
    /// Wrap a byte source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: Parser::new(),
            queue: VecDeque::new(),
            buf: vec![0; READ_BUF_SIZE],
        }
    }

    /// Block until the next complete input token is available.
    ///
    /// Returns `Ok(None)` once the source reaches end of input and every
    /// buffered byte has been delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or polling the source fails.
    pub fn next_event(&mut self) -> io::Result<Option<Event>> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }

            if self.parser.has_pending() && !self.source.wait(ESC_TIMEOUT_MS)? {
                self.queue.extend(self.parser.flush());
                continue;
            }

            let n = self.source.read(&mut self.buf)?;
            if n == 0 {
                self.queue.extend(self.parser.flush());
                return Ok(self.queue.pop_front());
            }
            let events = self.parser.advance(&self.buf[..n]);
            self.queue.extend(events);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
