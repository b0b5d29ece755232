// SPDX-License-Identifier: MIT
//
// n-ed: a minimal full-screen terminal text editor.
//
// This is the binary that wires the crates together:
//
//   n-term   → raw mode, key decoding, ANSI output, event loop
//   n-editor → line buffer, cursor, key resolution, file store, view
//
// The Editor struct implements n-term's App trait. Each key flows through:
//
//   stdin → parser → on_event → resolver → buffer/cursor mutation
//   paint → view → frame bytes → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ message line                 │  ← 1 row
//   └──────────────────────────────┘
//
// Logging goes to a file, never the screen: set N_ED_LOG to a path to turn
// it on, and RUST_LOG to pick the level (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use n_editor::editor::EditorState;
use n_editor::error::EditorError;
use n_editor::options::Options;
use n_editor::store::{FileStore, LineStore};
use n_editor::view::View;
use n_term::event_loop::{Action, App, EventLoop};
use n_term::input::Event;
use n_term::terminal::Size;

/// Environment variable naming the log file.
const LOG_VAR: &str = "N_ED_LOG";

// ─── CLI ────────────────────────────────────────────────────────────────────

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "n-ed", version, about = "A minimal full-screen terminal text editor")]
struct Args {
    /// File to edit. It must exist; an empty file is fine.
    file: PathBuf,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The session plus its scroll state, driven by the event loop.
struct Editor<S: LineStore = FileStore> {
    state: EditorState<S>,
    view: View,
}

impl<S: LineStore> Editor<S> {
    const fn new(state: EditorState<S>) -> Self {
        Self {
            state,
            view: View::new(),
        }
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl<S: LineStore> App for Editor<S> {
    type Error = EditorError;

    fn on_event(&mut self, event: &Event) -> Result<Action, EditorError> {
        self.state.handle(event)
    }

    fn on_resize(&mut self, size: Size) {
        info!(cols = size.cols, rows = size.rows, "resized");
    }

    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()> {
        self.view.paint(out, size, &self.state)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file subscriber if `N_ED_LOG` is set.
///
/// The returned guard flushes the background writer when dropped, so it has
/// to live until the end of `main`.
fn init_logging() -> Option<WorkerGuard> {
    let path = PathBuf::from(std::env::var_os(LOG_VAR)?);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("n-ed: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<(), EditorError> {
    let options = Options::from_env();
    info!(?options, "options");

    let state = EditorState::open_file(&args.file, options)?;
    let mut editor = Editor::new(state);

    let mut event_loop = EventLoop::new()?;
    event_loop.run(&mut editor)?;

    if editor.state.buffer().is_modified() {
        warn!(path = %args.file.display(), "quit with unsaved changes");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let log_guard = init_logging();
    info!(file = %args.file.display(), version = env!("CARGO_PKG_VERSION"), "starting");

    if let Err(e) = run(&args) {
        error!(error = %e, "fatal");
        drop(log_guard);
        eprintln!("n-ed: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
