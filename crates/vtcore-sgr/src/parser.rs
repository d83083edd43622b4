//! Single-pass SGR parser and the matching output encoder
//! ([`attr_to_sgr`]) and [`strip_ansi`] helpers.

use vte::{Parser, Perform};

use crate::attribute::{Attribute, Color};
use crate::color::{self, Ansi16};
use vtcore_render::cell::StyleFlags;

/// Fold every `ESC [ params m` sequence found in `input` into `attr`, in
/// place, in wire order. Non-SGR CSI sequences (any other final byte) are
/// skipped without effect; plain text is ignored.
pub fn parse_sgr(attr: &mut Attribute, input: &str) {
    let mut parser = Parser::new();
    let mut perform = SgrPerform { attr };
    for &byte in input.as_bytes() {
        parser.advance(&mut perform, byte);
    }
}

struct SgrPerform<'a> {
    attr: &'a mut Attribute,
}

impl Perform for SgrPerform<'_> {
    fn print(&mut self, _c: char) {}

    fn execute(&mut self, _byte: u8) {}

    fn csi_dispatch(&mut self, params: &vte::Params, _intermediates: &[u8], _ignore: bool, c: char) {
        if c != 'm' {
            return;
        }
        let values: Vec<i64> = params
            .iter()
            .map(|sub| sub.first().copied().map(i64::from).unwrap_or(0))
            .collect();
        apply_sgr_params(self.attr, &values);
    }
}

fn apply_sgr_params(attr: &mut Attribute, params: &[i64]) {
    let params: &[i64] = if params.is_empty() { &[0] } else { params };
    let mut i = 0;
    while i < params.len() {
        let p = params[i];
        i += 1;
        match p {
            0 => *attr = Attribute::reset(),
            1 => attr.styles.insert(StyleFlags::BOLD),
            2 => attr.styles.insert(StyleFlags::DIM),
            3 => attr.styles.insert(StyleFlags::ITALIC),
            4 => attr.styles.insert(StyleFlags::UNDERLINE),
            5 => attr.styles.insert(StyleFlags::BLINK),
            6 => attr.styles.insert(StyleFlags::RAPID_BLINK),
            7 => attr.styles.insert(StyleFlags::INVERSE),
            8 => attr.styles.insert(StyleFlags::HIDDEN),
            9 => attr.styles.insert(StyleFlags::STRIKETHROUGH),
            21 => attr.styles.insert(StyleFlags::DOUBLE_UNDERLINE),
            53 => attr.styles.insert(StyleFlags::OVERLINE),
            22 => attr.styles.remove(StyleFlags::BOLD | StyleFlags::DIM),
            23 => attr.styles.remove(StyleFlags::ITALIC),
            24 => attr
                .styles
                .remove(StyleFlags::UNDERLINE | StyleFlags::DOUBLE_UNDERLINE),
            25 => attr.styles.remove(StyleFlags::BLINK | StyleFlags::RAPID_BLINK),
            27 => attr.styles.remove(StyleFlags::INVERSE),
            28 => attr.styles.remove(StyleFlags::HIDDEN),
            29 => attr.styles.remove(StyleFlags::STRIKETHROUGH),
            55 => attr.styles.remove(StyleFlags::OVERLINE),
            30..=37 => attr.fg = Color::Basic((p - 30) as u8),
            90..=97 => attr.fg = Color::Basic((p - 90 + 8) as u8),
            39 => attr.fg = Color::Default,
            40..=47 => attr.bg = Color::Basic((p - 40) as u8),
            100..=107 => attr.bg = Color::Basic((p - 100 + 8) as u8),
            49 => attr.bg = Color::Default,
            38 => i = parse_extended_color(attr, params, i, true),
            48 => i = parse_extended_color(attr, params, i, false),
            _ => {}
        }
    }
}

/// Parse the variable-length `5;n` / `2;r;g;b` tail following a `38`/`48`
/// parameter. Returns the new cursor position. Out-of-range components are
/// dropped without setting the color, but the already-consumed parameters
/// are not un-consumed.
fn parse_extended_color(attr: &mut Attribute, params: &[i64], mut i: usize, is_fg: bool) -> usize {
    if i >= params.len() {
        return i;
    }
    let mode = params[i];
    i += 1;
    match mode {
        5 => {
            if i < params.len() {
                let idx = params[i];
                i += 1;
                if (0..=255).contains(&idx) {
                    let color = Color::C256(idx as u8);
                    if is_fg {
                        attr.fg = color;
                    } else {
                        attr.bg = color;
                    }
                }
            }
        }
        2 => {
            if i + 2 < params.len() {
                let (r, g, b) = (params[i], params[i + 1], params[i + 2]);
                i += 3;
                if (0..=255).contains(&r) && (0..=255).contains(&g) && (0..=255).contains(&b) {
                    let color = Color::rgb(r as u8, g as u8, b as u8);
                    if is_fg {
                        attr.fg = color;
                    } else {
                        attr.bg = color;
                    }
                }
            }
        }
        _ => {}
    }
    i
}

/// Color fidelity to reduce to when re-encoding an [`Attribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    C256,
    Basic16,
    /// Drop color entirely; only style bits are emitted.
    None,
}

/// Options for [`attr_to_sgr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DowngradeOptions {
    pub depth: ColorDepth,
    /// Prefix the sequence with `0;` before the reconstructed codes.
    pub leading_reset: bool,
}

impl Default for DowngradeOptions {
    fn default() -> Self {
        Self {
            depth: ColorDepth::Truecolor,
            leading_reset: false,
        }
    }
}

const STYLE_CODES: &[(StyleFlags, u8)] = &[
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::RAPID_BLINK, 6),
    (StyleFlags::INVERSE, 7),
    (StyleFlags::HIDDEN, 8),
    (StyleFlags::STRIKETHROUGH, 9),
    (StyleFlags::DOUBLE_UNDERLINE, 21),
    (StyleFlags::OVERLINE, 53),
];

/// Produce an SGR sequence (`CSI ... m`) reconstructing `attr`, with
/// optional color-depth reduction and an optional leading reset.
///
/// Returns an empty string if there is nothing to encode (no styles, no
/// non-default colors, and `leading_reset` is false).
pub fn attr_to_sgr(attr: &Attribute, options: DowngradeOptions) -> String {
    let mut codes: Vec<String> = Vec::new();
    if options.leading_reset {
        codes.push("0".to_string());
    }
    for (flag, code) in STYLE_CODES {
        if attr.styles.contains(*flag) {
            codes.push(code.to_string());
        }
    }
    if options.depth != ColorDepth::None {
        if let Some(code) = color_code(attr.fg, options.depth, true) {
            codes.push(code);
        }
        if let Some(code) = color_code(attr.bg, options.depth, false) {
            codes.push(code);
        }
    }
    if codes.is_empty() {
        return String::new();
    }
    format!("\x1b[{}m", codes.join(";"))
}

fn basic_code(idx: u8, is_fg: bool) -> String {
    let (lo, hi) = if is_fg { (30u32, 90u32) } else { (40u32, 100u32) };
    if idx < 8 {
        (lo + idx as u32).to_string()
    } else {
        (hi + (idx - 8) as u32).to_string()
    }
}

fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn color_code(c: Color, depth: ColorDepth, is_fg: bool) -> Option<String> {
    let extended_prefix = if is_fg { 38 } else { 48 };
    match (c, depth) {
        (Color::Default, _) | (_, ColorDepth::None) => None,
        (Color::Basic(idx), _) => Some(basic_code(idx, is_fg)),
        (Color::C256(idx), ColorDepth::Truecolor | ColorDepth::C256) => {
            Some(format!("{extended_prefix};5;{idx}"))
        }
        (Color::C256(idx), ColorDepth::Basic16) => {
            let ansi16: Ansi16 = color::rgb_to_ansi16_from_ansi256(idx);
            Some(basic_code(ansi16.as_u8(), is_fg))
        }
        (Color::Rgb(v), ColorDepth::Truecolor) => {
            let (r, g, b) = unpack_rgb(v);
            Some(format!("{extended_prefix};2;{r};{g};{b}"))
        }
        (Color::Rgb(v), ColorDepth::C256) => {
            let (r, g, b) = unpack_rgb(v);
            let idx = color::rgb_to_256(r, g, b);
            Some(format!("{extended_prefix};5;{idx}"))
        }
        (Color::Rgb(v), ColorDepth::Basic16) => {
            let (r, g, b) = unpack_rgb(v);
            let ansi16 = color::rgb_to_ansi16(r, g, b);
            Some(basic_code(ansi16.as_u8(), is_fg))
        }
    }
}

/// Remove every `ESC [ ... <final-byte>` CSI sequence from `s`, leaving
/// plain text untouched.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for nc in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&nc) {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
