#![forbid(unsafe_code)]

//! ANSI output encoder: turns a batch of [`CellChange`]s into a near-minimal
//! byte stream, tracking what the terminal currently displays so that only
//! the deltas are ever emitted.

use std::collections::HashMap;

use crate::ansi;
use crate::cell::{Cell, PackedColor, StyleFlags};
use crate::double_buffer::CellChange;

/// Mouse tracking mode, as selected by [`crate::terminal::enable_mouse_tracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    /// `CSI ?1000 h` — report button press/release only.
    Normal,
    /// `CSI ?1002 h` — also report motion while a button is held.
    Button,
    /// `CSI ?1003 h` — report all motion.
    Any,
}

/// Persistent encoder state: what the terminal currently has, carried across
/// frames so only actual deltas are re-emitted.
///
/// `last_x`, `last_y`, `last_fg`, `last_bg`, `last_attrs` use `-1` to mean
/// "unknown", forcing the next reference to re-emit rather than trust stale
/// state.
#[derive(Debug, Clone)]
pub struct OutputState {
    last_x: i32,
    last_y: i32,
    last_fg: i64,
    last_bg: i64,
    last_attrs: i32,

    pub alternate_screen: bool,
    pub mouse_tracking: bool,
    pub mouse_mode: Option<MouseMode>,
    pub sync_output: bool,
    pub bracketed_paste: bool,
    pub focus_reporting: bool,

    color_cache: HashMap<u64, String>,
}

impl OutputState {
    /// A fresh state: every `last_*` field unknown, every mode flag off.
    pub fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: -1,
            last_bg: -1,
            last_attrs: -1,
            alternate_screen: false,
            mouse_tracking: false,
            mouse_mode: None,
            sync_output: false,
            bracketed_paste: false,
            focus_reporting: false,
            color_cache: HashMap::new(),
        }
    }

    /// Force every subsequent reference to re-emit cursor position, fg, bg,
    /// and attrs. Does not touch mode flags.
    pub fn reset_tracking(&mut self) {
        self.last_x = -1;
        self.last_y = -1;
        self.last_fg = -1;
        self.last_bg = -1;
        self.last_attrs = -1;
    }

    fn invalidate_style(&mut self) {
        self.last_fg = -1;
        self.last_bg = -1;
        self.last_attrs = -1;
    }

    /// Record that the terminal's cursor is now known to be at `(x, y)`,
    /// as after an absolute cursor-move sequence.
    pub fn set_last_position(&mut self, x: u16, y: u16) {
        self.last_x = x as i32;
        self.last_y = y as i32;
    }

    /// The last cursor position the encoder believes the terminal is at.
    /// `(0, 0)` if unknown (callers that care should check `reset_tracking`
    /// was not just called).
    pub fn last_position(&self) -> (u16, u16) {
        (self.last_x.max(0) as u16, self.last_y.max(0) as u16)
    }

    /// Invalidate fg/bg/attrs tracking after an externally-emitted `CSI 0 m`
    /// (e.g. [`crate::terminal::reset_attributes`]).
    pub fn invalidate_after_reset(&mut self) {
        self.invalidate_style();
    }

    /// Clear the memoized color-sequence cache. Safe at any time; purely a
    /// memory/throughput tradeoff, never a correctness concern.
    pub fn clear_color_cache(&mut self) {
        self.color_cache.clear();
    }

    fn color_seq(&mut self, color: PackedColor, is_fg: bool) -> &str {
        let key = (color.0 as u64) | if is_fg { 1u64 << 32 } else { 0 };
        self.color_cache.entry(key).or_insert_with(|| {
            let mut buf = Vec::new();
            if is_fg {
                ansi::sgr_fg_packed(&mut buf, color).expect("write to Vec never fails");
            } else {
                ansi::sgr_bg_packed(&mut buf, color).expect("write to Vec never fails");
            }
            String::from_utf8(buf).expect("ansi helpers only emit ASCII")
        })
    }
}

impl Default for OutputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `changes` into a single byte stream against `state`, mutating
/// `state` to reflect what was emitted.
///
/// If `skip_sort` is `false`, `changes` is stable-sorted by `(y, x)` first.
/// Pass `true` when the caller already guarantees row-major order (e.g. a
/// full redraw walked in that order already).
pub fn encode(state: &mut OutputState, changes: &[CellChange], skip_sort: bool) -> String {
    if changes.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&CellChange>;
    let ordered: &[&CellChange] = if skip_sort {
        sorted = changes.iter().collect();
        &sorted
    } else {
        sorted = changes.iter().collect();
        sorted.sort_by_key(|c| (c.y, c.x));
        &sorted
    };

    let mut out = String::new();
    let mut i = 0;
    while i < ordered.len() {
        let run_start = i;
        let mut run_end = i + 1;
        while run_end < ordered.len() && is_run_continuation(ordered[run_end - 1], ordered[run_end])
        {
            run_end += 1;
        }
        emit_run(state, &mut out, &ordered[run_start..run_end]);
        i = run_end;
    }
    out
}

fn is_run_continuation(prev: &CellChange, cur: &CellChange) -> bool {
    cur.y == prev.y
        && cur.x == prev.x + 1
        && cur.cell.fg == prev.cell.fg
        && cur.cell.bg == prev.cell.bg
        && cur.cell.attrs == prev.cell.attrs
}

fn emit_run(state: &mut OutputState, out: &mut String, run: &[&CellChange]) {
    let first = run[0];
    emit_cursor_move(state, out, first.x, first.y);
    emit_sgr_prelude(state, out, &first.cell);
    for change in run {
        out.push_str(change.cell.ch.as_str());
    }
    state.last_x = first.x as i32 + run.len() as i32;
    state.last_y = first.y as i32;
}

fn emit_cursor_move(state: &mut OutputState, out: &mut String, x: u16, y: u16) {
    let (lx, ly) = (state.last_x, state.last_y);
    if lx == x as i32 && ly == y as i32 {
        return;
    }
    let mut buf = Vec::new();
    if ly == y as i32 {
        let d = x as i32 - lx;
        if d == 1 {
            // implicit advance from the previous character suffices
        } else if (1..=4).contains(&d) {
            ansi::cuf(&mut buf, d as u16).expect("write to Vec never fails");
        } else {
            ansi::cha(&mut buf, x).expect("write to Vec never fails");
        }
    } else {
        ansi::cup(&mut buf, y, x).expect("write to Vec never fails");
    }
    out.push_str(std::str::from_utf8(&buf).expect("ansi helpers only emit ASCII"));
}

fn emit_sgr_prelude(state: &mut OutputState, out: &mut String, cell: &Cell) {
    let prev_attrs = state.last_attrs;
    let new_attrs = cell.attrs.bits() as i32;

    if prev_attrs > 0 && new_attrs == 0 {
        out.push_str(std::str::from_utf8(ansi::SGR_RESET).unwrap());
        state.invalidate_style();
    } else if new_attrs != 0 && new_attrs != prev_attrs {
        if prev_attrs > 0 {
            out.push_str(std::str::from_utf8(ansi::SGR_RESET).unwrap());
            state.invalidate_style();
        }
        let mut buf = Vec::new();
        ansi::sgr_flags(&mut buf, cell.attrs).expect("write to Vec never fails");
        out.push_str(std::str::from_utf8(&buf).expect("ansi helpers only emit ASCII"));
    }
    state.last_attrs = new_attrs;

    if state.last_fg != cell.fg.0 as i64 {
        let seq = state.color_seq(cell.fg, true).to_string();
        out.push_str(&seq);
        state.last_fg = cell.fg.0 as i64;
    }
    if state.last_bg != cell.bg.0 as i64 {
        let seq = state.color_seq(cell.bg, false).to_string();
        out.push_str(&seq);
        state.last_bg = cell.bg.0 as i64;
    }
}
