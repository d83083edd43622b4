#![forbid(unsafe_code)]

//! Terminal controller: side-band operations (cursor, screen modes, window
//! title, mouse tracking, ...) that sit outside the cell grid.
//!
//! Every function here writes directly to a sink and updates
//! [`OutputState`] where the byte sequence changes something the encoder
//! needs to track.

use std::io::{self, Write};

use crate::ansi;
use crate::encoder::{MouseMode, OutputState};

/// `CSI ?25 l`
pub fn hide_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// `CSI ?25 h`
pub fn show_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// `CSI ?1049 h`
pub fn enter_alternate_screen<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")?;
    state.alternate_screen = true;
    Ok(())
}

/// `CSI ?1049 l`
pub fn leave_alternate_screen<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")?;
    state.alternate_screen = false;
    Ok(())
}

/// `CSI 2 J`
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    ansi::clear_screen(w)
}

/// `CSI H`
pub fn cursor_home<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[H")?;
    state.set_last_position(0, 0);
    Ok(())
}

/// `CSI 0 m`, invalidating the encoder's cached fg/bg/attrs.
pub fn reset_attributes<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    ansi::sgr_reset(w)?;
    state.invalidate_after_reset();
    Ok(())
}

/// `BEL` (0x07)
pub fn bell<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ansi::BEL)
}

/// `CSI (y+1);(x+1) H`, updating `last_x`/`last_y`.
pub fn move_to<W: Write>(w: &mut W, state: &mut OutputState, x: u16, y: u16) -> io::Result<()> {
    ansi::cup(w, y, x)?;
    state.set_last_position(x, y);
    Ok(())
}

/// `OSC 2 ; s BEL`
pub fn set_window_title<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    write!(w, "\x1b]2;{title}\x07")
}

/// Cursor shape, per DECSCUSR (`CSI n SPACE q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Block,
    Underline,
    Bar,
}

/// `CSI {2,4,6} SPACE q`
pub fn set_cursor_shape<W: Write>(w: &mut W, shape: CursorShape) -> io::Result<()> {
    let n = match shape {
        CursorShape::Block => 2,
        CursorShape::Underline => 4,
        CursorShape::Bar => 6,
    };
    write!(w, "\x1b[{n} q")
}

/// `CSI ?2026 h`
pub fn begin_sync_output<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")?;
    state.sync_output = true;
    Ok(())
}

/// `CSI ?2026 l`
pub fn end_sync_output<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")?;
    state.sync_output = false;
    Ok(())
}

/// `ESC 7`
pub fn save_cursor_position<W: Write>(w: &mut W) -> io::Result<()> {
    ansi::cursor_save(w)
}

/// `ESC 8`
pub fn restore_cursor_position<W: Write>(w: &mut W) -> io::Result<()> {
    ansi::cursor_restore(w)
}

/// `CSI ?2004 h`
pub fn enable_bracketed_paste<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")?;
    state.bracketed_paste = true;
    Ok(())
}

/// `CSI ?2004 l`
pub fn disable_bracketed_paste<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")?;
    state.bracketed_paste = false;
    Ok(())
}

/// `CSI ?1004 h`
pub fn enable_focus_reporting<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?1004h")?;
    state.focus_reporting = true;
    Ok(())
}

/// `CSI ?1004 l`
pub fn disable_focus_reporting<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?1004l")?;
    state.focus_reporting = false;
    Ok(())
}

/// `CSI ?1006 h` plus the mode-specific tracking sequence
/// (`?1000`/`?1002`/`?1003` for normal/button/any).
pub fn enable_mouse_tracking<W: Write>(
    w: &mut W,
    state: &mut OutputState,
    mode: MouseMode,
) -> io::Result<()> {
    w.write_all(b"\x1b[?1006h")?;
    let mode_code = match mode {
        MouseMode::Normal => b"\x1b[?1000h".as_slice(),
        MouseMode::Button => b"\x1b[?1002h".as_slice(),
        MouseMode::Any => b"\x1b[?1003h".as_slice(),
    };
    w.write_all(mode_code)?;
    state.mouse_tracking = true;
    state.mouse_mode = Some(mode);
    Ok(())
}

/// `CSI ?{1000,1002,1003,1006} l`, all four unconditionally.
pub fn disable_mouse_tracking<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    w.write_all(b"\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1006l")?;
    state.mouse_tracking = false;
    state.mouse_mode = None;
    Ok(())
}

/// Disable every mode flag currently set, then reset attributes, show the
/// cursor, and go home. Leaves `state` with every flag cleared.
pub fn cleanup<W: Write>(w: &mut W, state: &mut OutputState) -> io::Result<()> {
    if state.bracketed_paste {
        disable_bracketed_paste(w, state)?;
    }
    if state.focus_reporting {
        disable_focus_reporting(w, state)?;
    }
    if state.mouse_tracking {
        disable_mouse_tracking(w, state)?;
    }
    if state.sync_output {
        end_sync_output(w, state)?;
    }
    if state.alternate_screen {
        leave_alternate_screen(w, state)?;
    }
    reset_attributes(w, state)?;
    show_cursor(w)?;
    cursor_home(w, state)?;
    Ok(())
}
