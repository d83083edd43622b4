//! The parser's view of terminal color and style state.
//!
//! [`Color`] mirrors exactly what an SGR sequence can express on the wire:
//! the terminal default, a basic 16-color index, a 256-color palette index,
//! or a 24-bit RGB triplet. It is deliberately flatter than
//! [`crate::color::RichColor`], which adds profile-aware downgrading.

use vtcore_render::cell::StyleFlags;

/// A color as carried directly by an SGR parameter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// No color was ever set, or it was reset (`39`/`49`).
    #[default]
    Default,
    /// Basic 16-color index (0-15, bright colors folded into 8-15).
    Basic(u8),
    /// 256-color palette index.
    C256(u8),
    /// 24-bit RGB, packed `0xRRGGBB`.
    Rgb(u32),
}

impl Color {
    /// Build an RGB color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

/// The terminal attribute state an SGR parser tracks: foreground, background,
/// and the style bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attribute {
    pub fg: Color,
    pub bg: Color,
    pub styles: StyleFlags,
}

impl Attribute {
    /// The state after a full reset (`CSI 0 m` or equivalent).
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attribute_is_reset() {
        let attr = Attribute::default();
        assert_eq!(attr.fg, Color::Default);
        assert_eq!(attr.bg, Color::Default);
        assert_eq!(attr.styles, StyleFlags::empty());
    }

    #[test]
    fn color_rgb_packs_into_0xrrggbb() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56), Color::Rgb(0x123456));
    }
}
