// SPDX-License-Identifier: MIT
//
// n-term: terminal plumbing for n-ed.
//
// Raw mode, key decoding and ANSI output over plain termios and escape
// sequences, with no TUI framework in between. The editor renders a full
// frame per key, so there is no cell grid or diffing here: a frame is a
// byte buffer written in one go inside synchronized output.

pub mod ansi;
pub mod color;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
