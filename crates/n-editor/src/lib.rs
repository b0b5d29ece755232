//! # n-editor: editor core for n-ed
//!
//! Everything between a decoded key and a painted frame:
//!
//! - **[`buffer`]**: `LineBuffer`, byte lines addressed by 1-based row
//! - **[`cursor`]**: `Cursor` with clamping and motions
//! - **[`word`]**: word boundary search for `M-f` / `M-b`
//! - **[`command`]**: `Resolver`, the `C-x` prefix and `C-u` multiplier state machine
//! - **[`editor`]**: `EditorState`, the session aggregate that applies commands
//! - **[`store`]**: `LineStore` and the file-backed and in-memory stores
//! - **[`status`]**: size, location and message strings
//! - **[`view`]**: paints a frame from an `EditorState`
//! - **[`options`]** and **[`error`]**: runtime switches and fatal errors

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod options;
pub mod status;
pub mod store;
pub mod view;
pub mod word;
