#![forbid(unsafe_code)]

//! Double buffer: front/back [`ScreenBuffer`] pair, dirty-region tracking,
//! and minimal-update computation.
//!
//! # Typical frame cycle
//!
//! 1. Mutate `back` via [`DoubleBuffer::back_mut`].
//! 2. Mark the touched regions dirty ([`DoubleBuffer::mark_dirty`] etc.).
//! 3. Pull [`DoubleBuffer::get_minimal_updates`] and encode it.
//! 4. [`DoubleBuffer::swap_buffers`], then [`DoubleBuffer::clear_dirty`].
//!
//! Swap must precede clearing dirty state: the next frame's diff needs to
//! be taken against what was just displayed, not against stale dirty data.

use vtcore_core::geometry::Rect;

use crate::buffer::{InvalidDimensions, ScreenBuffer};
use crate::cell::Cell;

/// One changed cell, as produced by [`DoubleBuffer::get_minimal_updates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Front/back screen-buffer pair with coalesced dirty tracking.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    width: u16,
    height: u16,
    front: ScreenBuffer,
    back: ScreenBuffer,
    dirty: Vec<Rect>,
    full_redraw: bool,
}

impl DoubleBuffer {
    /// Create a new double buffer. The first frame always paints
    /// everything, so `full_redraw` starts `true`.
    pub fn create(width: u16, height: u16, default: Cell) -> Result<Self, InvalidDimensions> {
        let front = ScreenBuffer::create(width, height, default.clone())?;
        let back = ScreenBuffer::create(width, height, default)?;
        Ok(Self {
            width,
            height,
            front,
            back,
            dirty: Vec::new(),
            full_redraw: true,
        })
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn front(&self) -> &ScreenBuffer {
        &self.front
    }

    #[inline]
    pub fn back(&self) -> &ScreenBuffer {
        &self.back
    }

    #[inline]
    pub fn back_mut(&mut self) -> &mut ScreenBuffer {
        &mut self.back
    }

    #[inline]
    pub const fn full_redraw(&self) -> bool {
        self.full_redraw
    }

    #[inline]
    pub fn dirty_regions(&self) -> &[Rect] {
        &self.dirty
    }

    /// Swap front and back. Does not touch dirty state — call
    /// [`Self::clear_dirty`] afterward once the emitted bytes have been
    /// sent to the sink.
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Mark a rectangle dirty, clipped to buffer bounds. Dropped silently
    /// if empty after clipping.
    pub fn mark_dirty(&mut self, x: i64, y: i64, w: i64, h: i64) {
        if self.full_redraw {
            return;
        }
        if let Some((x0, y0, x1, y1)) =
            crate::buffer::clip_rect(x, y, w, h, self.width, self.height)
        {
            self.dirty.push(Rect::new(x0, y0, x1 - x0, y1 - y0));
        }
    }

    /// Mark an entire row dirty.
    pub fn mark_line_dirty(&mut self, y: u16) {
        self.mark_dirty(0, y as i64, self.width as i64, 1);
    }

    /// Force the next [`Self::get_minimal_updates`] to emit every cell.
    pub fn mark_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Clear dirty state. Does not clear `full_redraw` implicitly — that
    /// flag is consumed by `get_minimal_updates` itself, mirroring the
    /// "only `clear_dirty` clears it" contract for the `dirty` vector.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
        self.full_redraw = false;
    }

    /// Coalesce overlapping/adjacent dirty rectangles into their bounding
    /// boxes. Idempotent; the result does not depend on input order beyond
    /// the initial sort.
    pub fn coalesce_dirty(&mut self) {
        self.dirty = coalesce(std::mem::take(&mut self.dirty));
    }

    /// Reset the back buffer to `cell` and force a full redraw.
    pub fn clear_back(&mut self, cell: Cell) {
        self.back.clear(cell);
        self.full_redraw = true;
    }

    /// Overwrite `back` with the current contents of `front`.
    pub fn copy_front_to_back(&mut self) {
        self.back = self.front.clone();
    }

    /// Resize into a new double buffer (front and back both get the new
    /// dimensions; `full_redraw` starts `true` since old content is not
    /// preserved across differently-shaped buffers).
    pub fn resize(&self, new_width: u16, new_height: u16, fill: Cell) -> Result<Self, InvalidDimensions> {
        Self::create(new_width, new_height, fill)
    }

    /// Compute the minimal set of [`CellChange`]s needed to turn the
    /// terminal's currently-displayed contents (assumed equal to `front`)
    /// into `back`.
    ///
    /// - If `full_redraw`: every cell of `back`, row-major, cloned.
    /// - Else if `dirty` is empty: nothing.
    /// - Else: coalesce dirty rects, then emit only cells where
    ///   `front != back` within those rects.
    pub fn get_minimal_updates(&mut self) -> Vec<CellChange> {
        if self.full_redraw {
            let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
            for y in 0..self.height {
                for x in 0..self.width {
                    if let Some(cell) = self.back.get(x, y) {
                        out.push(CellChange {
                            x,
                            y,
                            cell: cell.clone(),
                        });
                    }
                }
            }
            return out;
        }

        if self.dirty.is_empty() {
            return Vec::new();
        }

        self.coalesce_dirty();
        let mut out = Vec::new();
        for rect in &self.dirty {
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    let old_cell = self.front.get(x, y);
                    let new_cell = self.back.get(x, y);
                    if old_cell != new_cell {
                        if let Some(cell) = new_cell {
                            out.push(CellChange {
                                x,
                                y,
                                cell: cell.clone(),
                            });
                        }
                    }
                }
            }
        }
        out
    }
}

/// Sort rects by `(y, x)` then merge any that overlap or touch (including
/// diagonally) into their bounding box, in a single forward pass against
/// the running last-output rect.
fn coalesce(mut rects: Vec<Rect>) -> Vec<Rect> {
    if rects.len() <= 1 {
        return rects;
    }
    rects.sort_by_key(|r| (r.y, r.x));

    let mut out: Vec<Rect> = Vec::with_capacity(rects.len());
    for rect in rects {
        if let Some(last) = out.last_mut() {
            if last.touches_or_overlaps(&rect) {
                *last = last.union(&rect);
                continue;
            }
        }
        out.push(rect);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn fresh_buffer_starts_full_redraw() {
        let mut db = DoubleBuffer::create(4, 4, Cell::blank()).unwrap();
        assert!(db.full_redraw());
        let updates = db.get_minimal_updates();
        assert_eq!(updates.len(), 16);
    }

    #[test]
    fn no_change_after_clear_dirty_yields_no_updates() {
        let mut db = DoubleBuffer::create(4, 4, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();
        assert!(!db.full_redraw());
        assert!(db.get_minimal_updates().is_empty());
    }

    #[test]
    fn mark_dirty_then_change_yields_only_changed_cells() {
        let mut db = DoubleBuffer::create(10, 3, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();

        db.back_mut().set(2, 1, Cell::from_char('X'));
        db.mark_dirty(2, 1, 1, 1);
        let updates = db.get_minimal_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!((updates[0].x, updates[0].y), (2, 1));
        assert_eq!(updates[0].cell.ch.as_str(), "X");
    }

    #[test]
    fn dirty_mark_with_no_actual_change_yields_no_updates() {
        let mut db = DoubleBuffer::create(10, 3, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();

        db.mark_dirty(2, 1, 3, 1);
        assert!(db.get_minimal_updates().is_empty());
    }

    #[test]
    fn out_of_bounds_marks_are_dropped_silently() {
        let mut db = DoubleBuffer::create(4, 4, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();
        db.mark_dirty(100, 100, 5, 5);
        assert!(db.dirty_regions().is_empty());
    }

    #[test]
    fn coalesce_merges_touching_rects() {
        let mut db = DoubleBuffer::create(30, 30, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();

        db.mark_dirty(0, 0, 5, 5);
        db.mark_dirty(5, 0, 5, 5);
        db.mark_dirty(20, 20, 3, 3);
        db.coalesce_dirty();

        let mut regions = db.dirty_regions().to_vec();
        regions.sort_by_key(|r| (r.y, r.x));
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], Rect::new(0, 0, 10, 5));
        assert_eq!(regions[1], Rect::new(20, 20, 3, 3));
    }

    #[test]
    fn coalesce_is_idempotent() {
        let mut db = DoubleBuffer::create(30, 30, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();
        db.mark_dirty(0, 0, 5, 5);
        db.mark_dirty(4, 4, 5, 5);
        db.mark_dirty(9, 0, 2, 2);
        db.coalesce_dirty();
        let once = db.dirty_regions().to_vec();
        db.coalesce_dirty();
        assert_eq!(once, db.dirty_regions());
    }

    #[test]
    fn diff_completeness_applying_updates_reaches_back() {
        let mut db = DoubleBuffer::create(6, 4, Cell::blank()).unwrap();
        db.get_minimal_updates();
        db.swap_buffers();
        db.clear_dirty();

        db.back_mut().set(1, 1, Cell::from_char('A'));
        db.back_mut().set(5, 3, Cell::from_char('Z'));
        db.mark_full_redraw();

        let updates = db.get_minimal_updates();
        let mut reconstructed = db.front().clone();
        for change in &updates {
            reconstructed.set(change.x, change.y, change.cell.clone());
        }
        for y in 0..db.height() {
            for x in 0..db.width() {
                assert_eq!(reconstructed.get(x, y), db.back().get(x, y));
            }
        }
    }

    #[test]
    fn resize_starts_full_redraw() {
        let db = DoubleBuffer::create(4, 4, Cell::blank()).unwrap();
        let resized = db.resize(8, 8, Cell::blank()).unwrap();
        assert!(resized.full_redraw());
        assert_eq!((resized.width(), resized.height()), (8, 8));
    }
}
