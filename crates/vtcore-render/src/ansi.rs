#![forbid(unsafe_code)]

//! Pure byte-generation helpers for ANSI/VT control sequences.
//!
//! These are stateless: they only know how to spell a given sequence, not
//! when to emit it. State tracking (what the terminal currently has) lives
//! in [`crate::encoder::OutputState`]; mode bookkeeping lives in
//! [`crate::terminal::TerminalController`].
//!
//! # Sequence reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n m` | SGR (Select Graphic Rendition) |
//! | CSI | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | CSI | `ESC [ col G` | CHA (Cursor Horizontal Absolute) |
//! | CSI | `ESC [ n C` | CUF (Cursor Forward) |
//! | CSI | `ESC [ 2 J` | ED (Erase Display, all) |
//! | DEC | `ESC 7` / `ESC 8` | Cursor save/restore (DECSC/DECRC) |

use std::io::{self, Write};

use crate::cell::{PackedColor, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Enable/disable SGR codes for each style flag, in the order bits are
/// declared on [`StyleFlags`].
const SGR_ON_CODES: &[(StyleFlags, u8)] = &[
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

/// Write one combined SGR sequence enabling every set flag: `CSI a;b;...m`.
/// No-op (writes nothing) if `flags` is empty. Does not emit a reset first.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in SGR_ON_CODES {
        if flags.contains(*flag) {
            if !first {
                w.write_all(b";")?;
            }
            write!(w, "{code}")?;
            first = false;
        }
    }
    w.write_all(b"m")
}

/// `CSI 38;2;r;g;b m`
pub fn sgr_fg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

/// `CSI 48;2;r;g;b m`
pub fn sgr_bg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

/// `CSI 39 m` (reset to terminal default foreground)
pub fn sgr_fg_default<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[39m")
}

/// `CSI 49 m` (reset to terminal default background)
pub fn sgr_bg_default<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[49m")
}

/// Write the foreground sequence for a [`PackedColor`]: `39` if alpha is 0,
/// else 24-bit truecolor.
pub fn sgr_fg_packed<W: Write>(w: &mut W, color: PackedColor) -> io::Result<()> {
    if color.is_default() {
        sgr_fg_default(w)
    } else {
        sgr_fg_rgb(w, color.r(), color.g(), color.b())
    }
}

/// Write the background sequence for a [`PackedColor`]: `49` if alpha is 0,
/// else 24-bit truecolor.
pub fn sgr_bg_packed<W: Write>(w: &mut W, color: PackedColor) -> io::Result<()> {
    if color.is_default() {
        sgr_bg_default(w)
    } else {
        sgr_bg_rgb(w, color.r(), color.g(), color.b())
    }
}

/// CUP (Cursor Position): `CSI row ; col H`, 0-indexed input.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", row + 1, col + 1)
}

/// CHA (Cursor Horizontal Absolute): `CSI col G`, 0-indexed input.
pub fn cha<W: Write>(w: &mut W, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{}G", col + 1)
}

/// CUF (Cursor Forward): `CSI n C`, or `CSI C` for `n == 1`.
pub fn cuf<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    if n == 1 {
        w.write_all(b"\x1b[C")
    } else {
        write!(w, "\x1b[{n}C")
    }
}

/// DEC cursor save: `ESC 7`
pub const CURSOR_SAVE: &[u8] = b"\x1b7";
/// DEC cursor restore: `ESC 8`
pub const CURSOR_RESTORE: &[u8] = b"\x1b8";

#[inline]
pub fn cursor_save<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_SAVE)
}

#[inline]
pub fn cursor_restore<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_RESTORE)
}

/// ED (Erase Display, all): `CSI 2 J`
pub const ERASE_DISPLAY_ALL: &[u8] = b"\x1b[2J";

#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY_ALL)
}

/// BEL: `0x07`
pub const BEL: &[u8] = b"\x07";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_flags_empty_is_noop() {
        let mut out = Vec::new();
        sgr_flags(&mut out, StyleFlags::empty()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn sgr_flags_combines_multiple() {
        let mut out = Vec::new();
        sgr_flags(&mut out, StyleFlags::BOLD | StyleFlags::UNDERLINE).unwrap();
        assert_eq!(out, b"\x1b[1;4m");
    }

    #[test]
    fn cuf_one_has_no_parameter() {
        let mut out = Vec::new();
        cuf(&mut out, 1).unwrap();
        assert_eq!(out, b"\x1b[C");
    }

    #[test]
    fn cup_is_one_indexed_on_wire() {
        let mut out = Vec::new();
        cup(&mut out, 0, 0).unwrap();
        assert_eq!(out, b"\x1b[1;1H");
    }

    #[test]
    fn sgr_fg_packed_default_emits_39() {
        let mut out = Vec::new();
        sgr_fg_packed(&mut out, PackedColor::DEFAULT).unwrap();
        assert_eq!(out, b"\x1b[39m");
    }

    #[test]
    fn sgr_fg_packed_opaque_emits_truecolor() {
        let mut out = Vec::new();
        sgr_fg_packed(&mut out, PackedColor::rgb(255, 255, 255)).unwrap();
        assert_eq!(out, b"\x1b[38;2;255;255;255m");
    }
}
