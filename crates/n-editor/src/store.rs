//! Loading and saving line files.
//!
//! The editor reaches the filesystem only through [`LineStore`]. The real
//! implementation is [`FileStore`]; [`MemoryStore`] keeps files in a map so
//! editor-level tests can save and inspect the result without touching
//! disk.
//!
//! # On-disk format
//!
//! Reading splits on `\n`, drops one trailing `\r` per line, and does not
//! produce an empty last line for a file that ends in a newline. Writing
//! joins lines with `\n` and adds no trailing newline.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{EditorError, Result};

// ---------------------------------------------------------------------------
// LineStore
// ---------------------------------------------------------------------------

/// Where the buffer's lines come from and go back to.
pub trait LineStore {
    /// Read the file at `path` as lines.
    ///
    /// # Errors
    ///
    /// [`EditorError::Load`] if the file cannot be read.
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>>;

    /// Replace the file at `path` with `lines`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`] if the file cannot be written.
    fn save_lines(&mut self, path: &Path, lines: &[Vec<u8>]) -> Result<()>;
}

/// Split file contents into lines.
#[must_use]
pub fn split_lines(data: &[u8]) -> Vec<Vec<u8>> {
    if data.is_empty() {
        return Vec::new();
    }
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}

/// Join lines into file contents.
#[must_use]
pub fn join_lines(lines: &[Vec<u8>]) -> Vec<u8> {
    lines.join(&b'\n')
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Lines stored in real files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStore {
    atomic: bool,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileStore {
    /// A file store. With `atomic`, saves go through a temporary sibling
    /// that is renamed over the target; without it, the target is truncated
    /// and written in place.
    #[must_use]
    pub const fn new(atomic: bool) -> Self {
        Self { atomic }
    }

    /// Name of the temporary file used for an atomic save of `path`:
    /// `.<name>.n-ed~` in the same directory.
    #[must_use]
    pub fn temp_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(path.file_name().unwrap_or(path.as_os_str()));
        name.push(".n-ed~");
        path.with_file_name(name)
    }
}

impl LineStore for FileStore {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>> {
        let data = fs::read(path).map_err(|source| EditorError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let lines = split_lines(&data);
        debug!(path = %path.display(), bytes = data.len(), lines = lines.len(), "read file");
        Ok(lines)
    }

    fn save_lines(&mut self, path: &Path, lines: &[Vec<u8>]) -> Result<()> {
        let data = join_lines(lines);
        let written = if self.atomic {
            write_atomic(path, &data)
        } else {
            fs::write(path, &data)
        };
        written.map_err(|source| EditorError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), atomic = self.atomic, "wrote file");
        Ok(())
    }
}

/// Write `data` to a temporary sibling, sync it, and rename it over `path`.
/// An existing file's permissions carry over to the replacement.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = FileStore::temp_path(path);
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        if let Some(perm) = permissions {
            fs::set_permissions(&tmp, perm)?;
        }
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %e, "could not remove temporary file");
            }
        }
    }
    result
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Files held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<PathBuf, Vec<u8>>,
    fail_saves: bool,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw file contents at `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Raw contents of the file at `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Make every later save fail with a permission error.
    pub const fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl LineStore for MemoryStore {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>> {
        self.files
            .get(path)
            .map(|data| split_lines(data))
            .ok_or_else(|| EditorError::Load {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }

    fn save_lines(&mut self, path: &Path, lines: &[Vec<u8>]) -> Result<()> {
        if self.fail_saves {
            return Err(EditorError::Save {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.files.insert(path.to_path_buf(), join_lines(lines));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
