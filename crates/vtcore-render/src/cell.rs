#![forbid(unsafe_code)]

//! Cell: the fixed per-position record of the terminal grid.
//!
//! A [`Cell`] is a plain value type: a grapheme cluster plus foreground,
//! background, and style-flag state. No dynamic dispatch, no shared
//! ownership — cells are cheap to clone and compare.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Style-flag bitmask for a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u16 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const RAPID_BLINK   = 1 << 5;
        const INVERSE       = 1 << 6;
        const HIDDEN        = 1 << 7;
        const STRIKETHROUGH = 1 << 8;
        const DOUBLE_UNDERLINE = 1 << 9;
        const OVERLINE      = 1 << 10;
    }
}

/// Packed 32-bit ARGB color.
///
/// `a == 0` denotes "use terminal default" (transparent to palette), per
/// the data model's convention. `a != 0` (by convention `0xFF`) carries an
/// opaque 24-bit RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedColor(pub u32);

impl PackedColor {
    /// The "use terminal default" color (alpha 0).
    pub const DEFAULT: Self = Self(0);

    /// Build an opaque color from RGB components (alpha forced to `0xFF`).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((0xFFu32 << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// `true` when this color means "use terminal default".
    #[inline]
    pub const fn is_default(self) -> bool {
        self.a() == 0
    }
}

impl Default for PackedColor {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Inline storage for one grapheme cluster.
///
/// Most graphemes (ASCII, accented Latin, short combining sequences) are at
/// most a handful of UTF-8 bytes and live inline with no allocation; longer
/// clusters spill onto the heap transparently via [`SmallVec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grapheme(SmallVec<[u8; 8]>);

impl Grapheme {
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(SmallVec::from_slice(s.as_bytes()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl Default for Grapheme {
    #[inline]
    fn default() -> Self {
        Self::new(" ")
    }
}

impl From<char> for Grapheme {
    #[inline]
    fn from(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self::new(c.encode_utf8(&mut buf))
    }
}

impl From<&str> for Grapheme {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One display position: a grapheme cluster plus fg/bg color and style bits.
///
/// Value-equal by all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: Grapheme,
    pub fg: PackedColor,
    pub bg: PackedColor,
    pub attrs: StyleFlags,
}

impl Cell {
    /// A blank cell: a single space, default colors, no style.
    #[inline]
    pub fn blank() -> Self {
        Self {
            ch: Grapheme::new(" "),
            fg: PackedColor::DEFAULT,
            bg: PackedColor::DEFAULT,
            attrs: StyleFlags::empty(),
        }
    }

    /// A cell holding a single character, default colors, no style.
    #[inline]
    pub fn from_char(c: char) -> Self {
        Self {
            ch: Grapheme::from(c),
            ..Self::blank()
        }
    }

    /// Set only the character, preserving colors and attributes.
    #[inline]
    pub fn set_char(&mut self, ch: &str) {
        self.ch = Grapheme::new(ch);
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::blank()
    }
}
