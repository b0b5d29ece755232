// SPDX-License-Identifier: MIT
//
// Terminal colors and text styles.
//
// The editor paints exactly one styled region (the status line) and one
// conditionally-colored region (error messages), so this module keeps
// only what those need: a compact color that maps directly onto SGR
// codes, and a style bundle of foreground, background and attributes.

use bitflags::bitflags;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A color as the terminal understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index. 0-7 standard, 8-15 bright.
    Ansi256(u8),

    /// Terminal default color (inherits the user's terminal theme).
    #[default]
    Default,
}

impl CellColor {
    pub const RED: Self = Self::Ansi256(1);

    /// True for [`CellColor::Default`].
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags! {
    /// SGR text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD    = 0b0000_0001;
        const DIM     = 0b0000_0010;
        const ITALIC  = 0b0000_0100;
        const INVERSE = 0b0000_1000;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Foreground, background and attributes applied to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attr: Attr,
}

impl Style {
    /// The terminal's own defaults: no SGR codes needed.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attr: Attr::empty(),
    };

    /// Style with only a foreground color.
    #[must_use]
    pub const fn fg(color: CellColor) -> Self {
        Self {
            fg: color,
            bg: CellColor::Default,
            attr: Attr::empty(),
        }
    }

    /// Same style with extra attributes.
    #[must_use]
    pub const fn with(self, attr: Attr) -> Self {
        Self {
            attr: self.attr.union(attr),
            ..self
        }
    }

    /// True if writing this style would emit nothing.
    #[must_use]
    pub const fn is_plain(self) -> bool {
        self.fg.is_default() && self.bg.is_default() && self.attr.is_empty()
    }
}
