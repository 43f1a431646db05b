//! Polygon scanline rasterizer with anti-aliasing.
//!
//! Accepts polygon contours (move_to/line_to/close) in Q5 coordinates
//! relative to the render region, accumulates them into a bounded cell
//! pool, and turns the sorted cells into scanlines of coverage values.
//!
//! Coverage is raw (no gamma): 0 is outside, 255 is fully covered.

use crate::basics::{FillingRule, Rect, POLY_SUBPIXEL_SHIFT};
use crate::error::PoolExhausted;
use crate::rasterizer_cells::{CellRow, CellRows, RasterizerCells};
use crate::scanline::Scanline;

// ============================================================================
// AA scale constants
// ============================================================================

const AA_SHIFT: u32 = 8;
const AA_SCALE: u32 = 1 << AA_SHIFT;
const AA_MASK: u32 = AA_SCALE - 1;
const AA_SCALE2: u32 = AA_SCALE * 2;
const AA_MASK2: u32 = AA_SCALE2 - 1;

// ============================================================================
// Rasterizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

/// Polygon rasterizer with anti-aliased output and a fixed cell budget.
///
/// Usage:
/// 1. `reset(bounds)` to start a pass over the rows of `bounds`
/// 2. Define contours with `move_to()` / `line_to()`; each contour is
///    closed by the next `move_to()` or by `rewind_scanlines()`
/// 3. `rewind_scanlines()`, then build each of `rows()` into a scanline
pub struct Rasterizer {
    outline: RasterizerCells,
    filling_rule: FillingRule,
    start_x: i32,
    start_y: i32,
    pen_x: i32,
    pen_y: i32,
    status: Status,
}

impl Rasterizer {
    /// Create a rasterizer that holds at most `max_cells` cells per pass.
    pub fn new(max_cells: usize) -> Self {
        Self {
            outline: RasterizerCells::new(max_cells),
            filling_rule: FillingRule::NonZero,
            start_x: 0,
            start_y: 0,
            pen_x: 0,
            pen_y: 0,
            status: Status::Initial,
        }
    }

    /// Change the cell budget, discarding all polygon data.
    pub fn set_max_cells(&mut self, max_cells: usize) {
        self.outline.set_capacity(max_cells);
        self.status = Status::Initial;
    }

    #[inline]
    pub fn max_cells(&self) -> usize {
        self.outline.capacity()
    }

    /// Discard all polygon data and start a pass whose cells are limited to
    /// the rows of `bounds`.
    pub fn reset(&mut self, bounds: Rect) {
        self.outline.begin_rasterization(bounds);
        self.status = Status::Initial;
    }

    /// Set the filling rule (non-zero winding or even-odd).
    pub fn set_filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    #[inline]
    pub fn filling_rule(&self) -> FillingRule {
        self.filling_rule
    }

    /// Whether the cell pool overflowed during this pass.
    #[inline]
    pub fn was_outline_too_complex(&self) -> bool {
        self.outline.is_exhausted()
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.outline.total_cells()
    }

    #[inline]
    pub fn missing_cells(&self) -> usize {
        self.outline.missing_cells()
    }

    // ========================================================================
    // Path building
    // ========================================================================

    /// Close the current polygon contour.
    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.outline
                .add_edge(self.pen_x, self.pen_y, self.start_x, self.start_y);
            self.pen_x = self.start_x;
            self.pen_y = self.start_y;
            self.status = Status::Closed;
        }
    }

    /// Start a new contour at `(x, y)` in Q5, closing the previous one.
    pub fn move_to(&mut self, x: i32, y: i32) {
        if self.outline.sorted() {
            self.reset(self.outline.bounds());
        }
        self.close_polygon();
        self.start_x = x;
        self.start_y = y;
        self.pen_x = x;
        self.pen_y = y;
        self.status = Status::MoveTo;
    }

    /// Add an edge from the current point to `(x, y)` in Q5.
    pub fn line_to(&mut self, x: i32, y: i32) {
        self.outline.add_edge(self.pen_x, self.pen_y, x, y);
        self.pen_x = x;
        self.pen_y = y;
        self.status = Status::LineTo;
    }

    // ========================================================================
    // Scanline sweeping
    // ========================================================================

    /// Close the open contour, check the cell budget and sort the cells.
    ///
    /// Returns `Ok(false)` if there is nothing to render.
    pub fn rewind_scanlines(&mut self) -> Result<bool, PoolExhausted> {
        self.close_polygon();
        self.outline.finish()?;
        self.outline.sort_cells();
        Ok(self.outline.total_cells() != 0)
    }

    /// Sorted cells grouped by row, in increasing y.
    #[inline]
    pub fn rows(&self) -> CellRows<'_> {
        self.outline.rows()
    }

    /// Calculate alpha (coverage) from accumulated area.
    #[inline]
    pub fn calculate_alpha(&self, area: i32) -> u8 {
        let mut cover = area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT);

        if cover < 0 {
            cover = -cover;
        }
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2 as i32;
            if cover > AA_SCALE as i32 {
                cover = AA_SCALE2 as i32 - cover;
            }
        }
        if cover > AA_MASK as i32 {
            cover = AA_MASK as i32;
        }
        cover as u8
    }

    /// Turn the cells of one row into scanline spans.
    ///
    /// Walks the cells left to right keeping a running cover. A cell with
    /// area gets its own pixel; the gap up to the next cell is one span at
    /// the running cover. Returns whether the row produced any span.
    pub fn build_scanline(&self, row: &CellRow<'_>, sl: &mut Scanline) -> bool {
        sl.reset_spans();

        let mut cells = row.iter().peekable();
        let mut cover: i32 = 0;

        while let Some(cur_cell) = cells.next() {
            let x = cur_cell.x;
            let mut area = cur_cell.area;
            cover += cur_cell.cover;

            // Accumulate all cells with the same X
            while let Some(next_cell) = cells.next_if(|c| c.x == x) {
                area += next_cell.area;
                cover += next_cell.cover;
            }

            let mut x_next = x;
            if area != 0 {
                let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                if alpha != 0 {
                    sl.add_cell(x, alpha);
                }
                // The partial cell at x has been handled; next span starts at x+1
                x_next = x + 1;
            }

            if let Some(next_cell) = cells.peek() {
                if next_cell.x > x_next {
                    let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                    if alpha != 0 {
                        sl.add_span(x_next, next_cell.x - x_next, alpha);
                    }
                }
            }
        }

        sl.finalize(row.y());
        sl.num_spans() > 0
    }
}

// ============================================================================
// Tests
// ============================================================================
