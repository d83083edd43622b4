//! Color types, profiles, and downgrade utilities.
//!
//! [`RichColor`] is the full-fidelity color representation used for
//! terminal-profile downgrading (truecolor -> 256 -> 16 -> mono). The
//! simpler [`crate::attribute::Color`] is what the SGR parser builds
//! directly off wire bytes; [`crate::attr_to_sgr`] bridges the two when a
//! caller asks for color-depth reduction.

use std::collections::HashMap;

use vtcore_render::cell::PackedColor;

/// Terminal color profile used for downgrade decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProfile {
    /// No color output.
    Mono,
    /// Standard 16 ANSI colors.
    Ansi16,
    /// Extended 256-color palette.
    Ansi256,
    /// Full 24-bit RGB color.
    TrueColor,
}

impl ColorProfile {
    /// Choose the best available profile from detection flags.
    ///
    /// `no_color` should reflect explicit user intent (e.g. NO_COLOR).
    #[must_use]
    pub const fn from_flags(true_color: bool, colors_256: bool, no_color: bool) -> Self {
        if no_color {
            Self::Mono
        } else if true_color {
            Self::TrueColor
        } else if colors_256 {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Check if this profile supports 24-bit true color.
    #[must_use]
    pub const fn supports_true_color(self) -> bool {
        matches!(self, Self::TrueColor)
    }
}

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into a `u32` key for use in hash maps.
    #[must_use]
    pub const fn as_key(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Compute perceived luminance (BT.709) as a `u8` (0 = black, 255 = white).
    #[must_use]
    pub fn luminance_u8(self) -> u8 {
        // ITU-R BT.709 luma: 0.2126 R + 0.7152 G + 0.0722 B
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        let luma = 2126 * r + 7152 * g + 722 * b;
        ((luma + 5000) / 10_000) as u8
    }
}

impl From<PackedColor> for Rgb {
    fn from(color: PackedColor) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

/// ANSI 16-color indices (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ansi16 {
    /// Black (index 0).
    Black = 0,
    /// Red (index 1).
    Red = 1,
    /// Green (index 2).
    Green = 2,
    /// Yellow (index 3).
    Yellow = 3,
    /// Blue (index 4).
    Blue = 4,
    /// Magenta (index 5).
    Magenta = 5,
    /// Cyan (index 6).
    Cyan = 6,
    /// White (index 7).
    White = 7,
    /// Bright black (index 8).
    BrightBlack = 8,
    /// Bright red (index 9).
    BrightRed = 9,
    /// Bright green (index 10).
    BrightGreen = 10,
    /// Bright yellow (index 11).
    BrightYellow = 11,
    /// Bright blue (index 12).
    BrightBlue = 12,
    /// Bright magenta (index 13).
    BrightMagenta = 13,
    /// Bright cyan (index 14).
    BrightCyan = 14,
    /// Bright white (index 15).
    BrightWhite = 15,
}

impl Ansi16 {
    /// Return the raw ANSI index (0–15).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert a `u8` index to an `Ansi16` variant, returning `None` if out of range.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Black),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Yellow),
            4 => Some(Self::Blue),
            5 => Some(Self::Magenta),
            6 => Some(Self::Cyan),
            7 => Some(Self::White),
            8 => Some(Self::BrightBlack),
            9 => Some(Self::BrightRed),
            10 => Some(Self::BrightGreen),
            11 => Some(Self::BrightYellow),
            12 => Some(Self::BrightBlue),
            13 => Some(Self::BrightMagenta),
            14 => Some(Self::BrightCyan),
            15 => Some(Self::BrightWhite),
            _ => None,
        }
    }
}

/// Monochrome output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonoColor {
    /// Black (dark).
    Black,
    /// White (light).
    White,
}

/// A color value at varying fidelity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RichColor {
    /// True-color RGB value.
    Rgb(Rgb),
    /// 256-color palette index.
    Ansi256(u8),
    /// Standard 16-color ANSI value.
    Ansi16(Ansi16),
    /// Monochrome (black or white).
    Mono(MonoColor),
}

impl RichColor {
    /// Create a true-color RGB value.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Convert this color to an RGB triplet regardless of its fidelity level.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Ansi256(idx) => ansi256_to_rgb(idx),
            Self::Ansi16(color) => ansi16_to_rgb(color),
            Self::Mono(MonoColor::Black) => Rgb::new(0, 0, 0),
            Self::Mono(MonoColor::White) => Rgb::new(255, 255, 255),
        }
    }

    /// Downgrade this color to fit the given color profile.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Self {
        match profile {
            ColorProfile::TrueColor => self,
            ColorProfile::Ansi256 => match self {
                Self::Rgb(rgb) => Self::Ansi256(rgb_to_256(rgb.r, rgb.g, rgb.b)),
                _ => self,
            },
            ColorProfile::Ansi16 => match self {
                Self::Rgb(rgb) => Self::Ansi16(rgb_to_ansi16(rgb.r, rgb.g, rgb.b)),
                Self::Ansi256(idx) => Self::Ansi16(rgb_to_ansi16_from_ansi256(idx)),
                _ => self,
            },
            ColorProfile::Mono => match self {
                Self::Rgb(rgb) => Self::Mono(rgb_to_mono(rgb.r, rgb.g, rgb.b)),
                Self::Ansi256(idx) => {
                    let rgb = ansi256_to_rgb(idx);
                    Self::Mono(rgb_to_mono(rgb.r, rgb.g, rgb.b))
                }
                Self::Ansi16(color) => {
                    let rgb = ansi16_to_rgb(color);
                    Self::Mono(rgb_to_mono(rgb.r, rgb.g, rgb.b))
                }
                Self::Mono(_) => self,
            },
        }
    }
}

impl From<PackedColor> for RichColor {
    fn from(color: PackedColor) -> Self {
        Self::Rgb(Rgb::from(color))
    }
}

/// Statistics for a [`ColorCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries before eviction.
    pub capacity: usize,
}

/// Simple hash cache for downgrade results (bounded; clears on overflow).
#[derive(Debug)]
pub struct ColorCache {
    profile: ColorProfile,
    max_entries: usize,
    map: HashMap<u32, RichColor>,
    hits: u64,
    misses: u64,
}

impl ColorCache {
    /// Create a new cache with default capacity (4096 entries).
    #[must_use]
    pub fn new(profile: ColorProfile) -> Self {
        Self::with_capacity(profile, 4096)
    }

    /// Create a new cache with the given maximum entry count.
    #[must_use]
    pub fn with_capacity(profile: ColorProfile, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            profile,
            max_entries,
            map: HashMap::with_capacity(max_entries.min(2048)),
            hits: 0,
            misses: 0,
        }
    }

    /// Downgrade an RGB color through the cache, returning the cached result.
    #[must_use]
    pub fn downgrade_rgb(&mut self, rgb: Rgb) -> RichColor {
        let key = rgb.as_key();
        if let Some(cached) = self.map.get(&key) {
            self.hits += 1;
            return *cached;
        }
        self.misses += 1;
        let downgraded = RichColor::Rgb(rgb).downgrade(self.profile);
        if self.map.len() >= self.max_entries {
            self.map.clear();
        }
        self.map.insert(key, downgraded);
        downgraded
    }

    /// Downgrade a [`PackedColor`] color through the cache.
    #[must_use]
    pub fn downgrade_packed(&mut self, color: PackedColor) -> RichColor {
        self.downgrade_rgb(Rgb::from(color))
    }

    /// Return current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.map.len(),
            capacity: self.max_entries,
        }
    }
}

const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// Convert an ANSI 16-color value to its canonical RGB representation.
#[must_use]
pub fn ansi16_to_rgb(color: Ansi16) -> Rgb {
    ANSI16_PALETTE[color.as_u8() as usize]
}

/// Convert an RGB color to the nearest ANSI 256-color index.
#[must_use]
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        let idx = ((r - 8) / 10).min(23);
        return 232 + idx;
    }

    16 + 36 * cube_index(r) + 6 * cube_index(g) + cube_index(b)
}

/// Map an 8-bit channel value to the nearest ANSI 256-color 6×6×6 cube index.
///
/// The cube levels are `[0, 95, 135, 175, 215, 255]`, which are **not**
/// uniformly spaced.  This function uses the midpoints between adjacent
/// levels (48, 115, 155, 195, 235) so each channel maps to the closest
/// cube entry rather than an equal-width bin.
fn cube_index(v: u8) -> u8 {
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

/// Convert an ANSI 256-color index to its RGB representation.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> Rgb {
    if index < 16 {
        return ANSI16_PALETTE[index as usize];
    }
    if index >= 232 {
        let gray = 8 + 10 * (index - 232);
        return Rgb::new(gray, gray, gray);
    }
    let idx = index - 16;
    let r = idx / 36;
    let g = (idx / 6) % 6;
    let b = idx % 6;
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    Rgb::new(LEVELS[r as usize], LEVELS[g as usize], LEVELS[b as usize])
}

/// Convert an RGB color to the nearest ANSI 16-color value.
#[must_use]
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> Ansi16 {
    let target = Rgb::new(r, g, b);
    let mut best = Ansi16::Black;
    let mut best_dist = u64::MAX;

    for (idx, candidate) in ANSI16_PALETTE.iter().enumerate() {
        let dist = weighted_distance(target, *candidate);
        if dist < best_dist {
            best = Ansi16::from_u8(idx as u8).unwrap_or(Ansi16::Black);
            best_dist = dist;
        }
    }

    best
}

/// Convert an ANSI 256-color index to the nearest ANSI 16-color value.
#[must_use]
pub fn rgb_to_ansi16_from_ansi256(index: u8) -> Ansi16 {
    let rgb = ansi256_to_rgb(index);
    rgb_to_ansi16(rgb.r, rgb.g, rgb.b)
}

/// Convert an RGB color to monochrome (black or white) based on luminance.
#[must_use]
pub fn rgb_to_mono(r: u8, g: u8, b: u8) -> MonoColor {
    let luma = Rgb::new(r, g, b).luminance_u8();
    if luma >= 128 {
        MonoColor::White
    } else {
        MonoColor::Black
    }
}

fn weighted_distance(a: Rgb, b: Rgb) -> u64 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    let dr2 = (dr * dr) as u64;
    let dg2 = (dg * dg) as u64;
    let db2 = (db * db) as u64;
    2126 * dr2 + 7152 * dg2 + 722 * db2
}


#[cfg(test)]
mod downgrade_edge_cases {
    //! Tests for color downgrade edge cases and boundary conditions.
    //!
    //! These tests verify correct behavior at palette boundaries,
    //! grayscale thresholds, and the sequential downgrade pipeline.

    use super::*;

    // =========================================================================
    // Sequential downgrade verification
    // =========================================================================

    #[test]
    fn sequential_downgrade_truecolor_to_mono() {
        // Verify the full downgrade pipeline: RGB -> 256 -> 16 -> Mono
        let white = RichColor::rgb(255, 255, 255);
        let black = RichColor::rgb(0, 0, 0);

        // White through all stages
        let w256 = white.downgrade(ColorProfile::Ansi256);
        assert!(matches!(w256, RichColor::Ansi256(231))); // Pure white in cube
        let w16 = w256.downgrade(ColorProfile::Ansi16);
        assert!(matches!(w16, RichColor::Ansi16(Ansi16::BrightWhite)));
        let wmono = w16.downgrade(ColorProfile::Mono);
        assert_eq!(wmono, RichColor::Mono(MonoColor::White));

        // Black through all stages
        let b256 = black.downgrade(ColorProfile::Ansi256);
        assert!(matches!(b256, RichColor::Ansi256(16))); // Pure black
        let b16 = b256.downgrade(ColorProfile::Ansi16);
        assert!(matches!(b16, RichColor::Ansi16(Ansi16::Black)));
        let bmono = b16.downgrade(ColorProfile::Mono);
        assert_eq!(bmono, RichColor::Mono(MonoColor::Black));
    }

    #[test]
    fn sequential_downgrade_preserves_intent() {
        // Red should stay "reddish" through the pipeline
        let red = RichColor::rgb(255, 0, 0);

        let r256 = red.downgrade(ColorProfile::Ansi256);
        let RichColor::Ansi256(idx) = r256 else {
            panic!("Expected Ansi256");
        };
        assert_eq!(idx, 196); // Pure red in 256-color

        let r16 = r256.downgrade(ColorProfile::Ansi16);
        let RichColor::Ansi16(ansi) = r16 else {
            panic!("Expected Ansi16");
        };
        // Should map to BrightRed (not some other color)
        assert_eq!(ansi, Ansi16::BrightRed);
    }

    // =========================================================================
    // rgb_to_256 edge cases
    // =========================================================================

    #[test]
    fn rgb_to_256_grayscale_boundaries() {
        // Test exact boundary values for grayscale detection
        // r < 8 -> 16 (black)
        assert_eq!(rgb_to_256(0, 0, 0), 16);
        assert_eq!(rgb_to_256(7, 7, 7), 16);

        // r >= 8 -> grayscale ramp starts
        assert_eq!(rgb_to_256(8, 8, 8), 232);

        // r > 248 -> 231 (white in cube)
        assert_eq!(rgb_to_256(249, 249, 249), 231);
        assert_eq!(rgb_to_256(255, 255, 255), 231);

        // r = 248 is still in grayscale ramp
        assert_eq!(rgb_to_256(248, 248, 248), 255);
    }

    #[test]
    fn rgb_to_256_grayscale_ramp_coverage() {
        // Grayscale ramp 232-255 covers values 8-238
        // Each step is 10 units: 8, 18, 28, ..., 238
        for i in 0..24 {
            let gray_val = 8 + i * 10;
            let idx = rgb_to_256(gray_val, gray_val, gray_val);
            assert!(
                (232..=255).contains(&idx),
                "Gray {} mapped to {} (expected 232-255)",
                gray_val,
                idx
            );
        }
    }

    #[test]
    fn rgb_to_256_cube_corners() {
        // Test all 8 corners of the 6x6x6 RGB cube
        assert_eq!(rgb_to_256(0, 0, 0), 16); // Handled as grayscale
        assert_eq!(rgb_to_256(255, 0, 0), 196); // Red corner
        assert_eq!(rgb_to_256(0, 255, 0), 46); // Green corner
        assert_eq!(rgb_to_256(0, 0, 255), 21); // Blue corner
        assert_eq!(rgb_to_256(255, 255, 0), 226); // Yellow corner
        assert_eq!(rgb_to_256(255, 0, 255), 201); // Magenta corner
        assert_eq!(rgb_to_256(0, 255, 255), 51); // Cyan corner
        // White handled as grayscale, maps to 231
        assert_eq!(rgb_to_256(255, 255, 255), 231);
    }

    #[test]
    fn rgb_to_256_non_gray_avoids_grayscale() {
        // When channels differ, should use cube even if values are gray-ish
        // r=100, g=100, b=99 is NOT grayscale (not all equal)
        let idx = rgb_to_256(100, 100, 99);
        // Should be in cube range (16-231), not grayscale (232-255)
        assert!((16..=231).contains(&idx), "Non-gray {} should use cube", idx);
    }

    // =========================================================================
    // cube_index edge cases
    // =========================================================================

    #[test]
    fn cube_index_boundaries() {
        // cube_index uses thresholds: 0-47->0, 48-114->1, 115+->computed
        // Test the boundary values
        assert_eq!(cube_index(0), 0);
        assert_eq!(cube_index(47), 0);
        assert_eq!(cube_index(48), 1);
        assert_eq!(cube_index(114), 1);
        assert_eq!(cube_index(115), 2);
        assert_eq!(cube_index(155), 3);
        assert_eq!(cube_index(195), 4);
        assert_eq!(cube_index(235), 5);
        assert_eq!(cube_index(255), 5);
    }

    // =========================================================================
    // ansi256_to_rgb edge cases
    // =========================================================================

    #[test]
    fn ansi256_to_rgb_full_range() {
        // Every index should produce valid RGB (this is a sanity check)
        for i in 0..=255 {
            let rgb = ansi256_to_rgb(i);
            // Verify the values are reasonable (non-panic)
            let _ = (rgb.r, rgb.g, rgb.b);
        }
    }

    #[test]
    fn ansi256_to_rgb_grayscale_range() {
        // Indices 232-255 should produce grayscale (r=g=b)
        for i in 232..=255 {
            let rgb = ansi256_to_rgb(i);
            assert_eq!(rgb.r, rgb.g);
            assert_eq!(rgb.g, rgb.b);
        }
    }

    #[test]
    fn ansi256_to_rgb_first_16_are_palette() {
        // Indices 0-15 should use the 16-color palette
        for i in 0..16 {
            let rgb = ansi256_to_rgb(i);
            assert_eq!(rgb, ANSI16_PALETTE[i as usize]);
        }
    }

    // =========================================================================
    // rgb_to_ansi16 edge cases
    // =========================================================================

    #[test]
    fn rgb_to_ansi16_pure_primaries() {
        // Pure primaries should map to their bright variants
        assert_eq!(rgb_to_ansi16(255, 0, 0), Ansi16::BrightRed);
        assert_eq!(rgb_to_ansi16(0, 255, 0), Ansi16::BrightGreen);
        // Blue maps to regular Blue because the bright blue in palette is different
        assert_eq!(rgb_to_ansi16(0, 0, 255), Ansi16::Blue);
    }

    #[test]
    fn rgb_to_ansi16_grays() {
        // Dark gray should map to BrightBlack (127,127,127)
        assert_eq!(rgb_to_ansi16(127, 127, 127), Ansi16::BrightBlack);
        // Mid gray closer to White (229,229,229)
        assert_eq!(rgb_to_ansi16(200, 200, 200), Ansi16::White);
    }

    #[test]
    fn rgb_to_ansi16_extremes() {
        // Pure black and white
        assert_eq!(rgb_to_ansi16(0, 0, 0), Ansi16::Black);
        assert_eq!(rgb_to_ansi16(255, 255, 255), Ansi16::BrightWhite);
    }

    // =========================================================================
    // rgb_to_mono edge cases
    // =========================================================================

    #[test]
    fn rgb_to_mono_luminance_boundary() {
        // Luminance threshold is 128
        // Test values near the boundary
        assert_eq!(rgb_to_mono(128, 128, 128), MonoColor::White);
        assert_eq!(rgb_to_mono(127, 127, 127), MonoColor::Black);

        // Test with weighted luminance (green has highest weight)
        // Green at ~180 should give luminance ~128 (0.7152 * 180 = 128.7)
        assert_eq!(rgb_to_mono(0, 180, 0), MonoColor::White);
        assert_eq!(rgb_to_mono(0, 178, 0), MonoColor::Black);
    }

    #[test]
    fn rgb_to_mono_color_saturation_irrelevant() {
        // Mono cares only about luminance, not saturation
        // Pure red (luma = 0.2126 * 255 = 54) -> black
        assert_eq!(rgb_to_mono(255, 0, 0), MonoColor::Black);
        // Pure green (luma = 0.7152 * 255 = 182) -> white
        assert_eq!(rgb_to_mono(0, 255, 0), MonoColor::White);
        // Pure blue (luma = 0.0722 * 255 = 18) -> black
        assert_eq!(rgb_to_mono(0, 0, 255), MonoColor::Black);
    }

    // =========================================================================
    // RichColor downgrade stability tests
    // =========================================================================

    #[test]
    fn downgrade_at_same_level_is_identity() {
        // Downgrading to the same level should not change the color
        let ansi16 = RichColor::Ansi16(Ansi16::Red);
        assert_eq!(ansi16.downgrade(ColorProfile::Ansi16), ansi16);

        let ansi256 = RichColor::Ansi256(100);
        assert_eq!(ansi256.downgrade(ColorProfile::Ansi256), ansi256);

        let mono = RichColor::Mono(MonoColor::Black);
        assert_eq!(mono.downgrade(ColorProfile::Mono), mono);

        let rgb = RichColor::rgb(1, 2, 3);
        assert_eq!(rgb.downgrade(ColorProfile::TrueColor), rgb);
    }

    #[test]
    fn downgrade_ansi16_passes_through_ansi256() {
        // Ansi16 should not change when downgraded to Ansi256
        // (it's already "lower fidelity")
        let color = RichColor::Ansi16(Ansi16::Cyan);
        assert_eq!(color.downgrade(ColorProfile::Ansi256), color);
    }

    #[test]
    fn downgrade_mono_passes_through_all() {
        // Mono should never change
        let black = RichColor::Mono(MonoColor::Black);
        let white = RichColor::Mono(MonoColor::White);

        assert_eq!(black.downgrade(ColorProfile::TrueColor), black);
        assert_eq!(black.downgrade(ColorProfile::Ansi256), black);
        assert_eq!(black.downgrade(ColorProfile::Ansi16), black);
        assert_eq!(black.downgrade(ColorProfile::Mono), black);

        assert_eq!(white.downgrade(ColorProfile::TrueColor), white);
        assert_eq!(white.downgrade(ColorProfile::Ansi256), white);
        assert_eq!(white.downgrade(ColorProfile::Ansi16), white);
        assert_eq!(white.downgrade(ColorProfile::Mono), white);
    }

    // =========================================================================
    // Luminance edge cases
    // =========================================================================

    #[test]
    fn luminance_formula_correctness() {
        // BT.709: 0.2126 R + 0.7152 G + 0.0722 B
        // Pure channels
        let r_luma = Rgb::new(255, 0, 0).luminance_u8();
        let g_luma = Rgb::new(0, 255, 0).luminance_u8();
        let b_luma = Rgb::new(0, 0, 255).luminance_u8();

        // Red: 0.2126 * 255 = 54.2
        assert!((50..=58).contains(&r_luma), "Red luma {} not near 54", r_luma);
        // Green: 0.7152 * 255 = 182.4
        assert!(
            (178..=186).contains(&g_luma),
            "Green luma {} not near 182",
            g_luma
        );
        // Blue: 0.0722 * 255 = 18.4
        assert!((15..=22).contains(&b_luma), "Blue luma {} not near 18", b_luma);

        // Combined should match
        let all = Rgb::new(255, 255, 255).luminance_u8();
        assert_eq!(all, 255);
    }

    #[test]
    fn luminance_mid_values() {
        // Test some mid-range values
        let mid_gray = Rgb::new(128, 128, 128).luminance_u8();
        // Should be approximately 128
        assert!(
            (126..=130).contains(&mid_gray),
            "Mid gray luma {} not near 128",
            mid_gray
        );
    }
}
