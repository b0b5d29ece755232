//! Fatal editor errors.
//!
//! Everything here ends the session: the terminal is restored, the error is
//! printed as `n-ed: <error>` and the process exits non-zero. Recoverable
//! conditions (an unknown `C-x` completion, a motion that cannot move) never
//! become an `EditorError`; they surface as a message or a no-op.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An I/O failure the editor cannot continue past.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The file named on the command line could not be read.
    #[error("cannot open {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the buffer back to disk failed.
    #[error("cannot write {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raw mode, size query, or screen output failed.
    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
