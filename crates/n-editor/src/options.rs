//! Editor options.
//!
//! There are no configuration files. Each option has a built-in default
//! that an environment variable can override:
//!
//! | Option        | Variable           | Default | Effect                                  |
//! |---------------|--------------------|---------|-----------------------------------------|
//! | `bare_quit`   | `N_ED_BARE_QUIT`   | false   | `C-q` quits without the `C-x` prefix     |
//! | `atomic_save` | `N_ED_ATOMIC_SAVE` | true    | save via temp file + rename              |
//!
//! Accepted values are `1`, `true`, `yes`, `on` and `0`, `false`, `no`,
//! `off` (case-insensitive). Anything else is ignored with a warning and
//! the default stays.

use tracing::warn;

/// Environment variable for [`Options::bare_quit`].
pub const BARE_QUIT_VAR: &str = "N_ED_BARE_QUIT";

/// Environment variable for [`Options::atomic_save`].
pub const ATOMIC_SAVE_VAR: &str = "N_ED_ATOMIC_SAVE";

/// Runtime switches for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Bind `C-q` as a single-key quit in addition to `C-x C-c`.
    pub bare_quit: bool,

    /// Write through a temporary sibling and rename it over the target.
    /// When false, the target is truncated and written in place.
    pub atomic_save: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bare_quit: false,
            atomic_save: true,
        }
    }
}

impl Options {
    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(v) = flag(&lookup, BARE_QUIT_VAR) {
            opts.bare_quit = v;
        }
        if let Some(v) = flag(&lookup, ATOMIC_SAVE_VAR) {
            opts.atomic_save = v;
        }
        opts
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    let raw = lookup(name)?;
    let parsed = parse_bool(&raw);
    if parsed.is_none() {
        warn!(variable = name, value = %raw, "ignoring unrecognized boolean");
    }
    parsed
}

/// Parse a boolean environment value.
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let o = Options::default();
        assert!(!o.bare_quit);
        assert!(o.atomic_save);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Options::from_lookup(lookup(&[])), Options::default());
    }

    #[test]
    fn overrides_both() {
        let o = Options::from_lookup(lookup(&[
            (BARE_QUIT_VAR, "yes"),
            (ATOMIC_SAVE_VAR, "off"),
        ]));
        assert!(o.bare_quit);
        assert!(!o.atomic_save);
    }

    #[test]
    fn garbage_keeps_default() {
        let o = Options::from_lookup(lookup(&[(BARE_QUIT_VAR, "maybe")]));
        assert!(!o.bare_quit);
    }

    #[test]
    fn parse_bool_forms() {
        for s in ["1", "true", "YES", " On "] {
            assert_eq!(parse_bool(s), Some(true), "{s:?}");
        }
        for s in ["0", "False", "no", "OFF"] {
            assert_eq!(parse_bool(s), Some(false), "{s:?}");
        }
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("2"), None);
    }
}
