//! Edge-to-cell conversion and cell ordering.
//!
//! Converts edges given in Q5 sub-pixel coordinates into cells holding
//! coverage and area values, stored in a bounded [`CellPool`]. Once every
//! edge is in, the cells are ordered by their packed `(y, x)` key and
//! handed out row by row.

use crate::basics::{Rect, POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};
use crate::cell_pool::{Cell, CellPool};
use crate::error::PoolExhausted;

/// Limit for dx magnitude before recursive subdivision in `line()`.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

// ============================================================================
// CurrCell: the cell being accumulated
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct CurrCell {
    x: i32,
    y: i32,
    cover: i32,
    area: i32,
}

impl CurrCell {
    const fn initial() -> Self {
        Self {
            x: i32::MAX,
            y: i32::MAX,
            cover: 0,
            area: 0,
        }
    }
}

// ============================================================================
// RasterizerCells
// ============================================================================

/// Converts line segments into anti-aliased pixel cells.
///
/// Usage protocol:
/// 1. `begin_rasterization(bounds)`: reset the pool and index the rows of
///    `bounds`
/// 2. `add_edge()` for every edge, including the closing edge of each
///    polygon
/// 3. `finish()`: flush pending data and learn whether the pool held
/// 4. `sort_cells()`, then `rows()` to walk the cells row by row
pub struct RasterizerCells {
    pool: CellPool,
    sorted_cells: Vec<u32>,
    curr_cell: CurrCell,
    bounds: Rect,
    exhausted: Option<PoolExhausted>,
    sorted: bool,
}

impl RasterizerCells {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: CellPool::with_capacity(capacity),
            sorted_cells: Vec::with_capacity(capacity),
            curr_cell: CurrCell::initial(),
            bounds: Rect::default(),
            exhausted: None,
            sorted: false,
        }
    }

    /// Change the pool capacity. Discards all cells.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.pool.set_capacity(capacity);
        self.sorted_cells = Vec::with_capacity(capacity);
        self.begin_rasterization(self.bounds);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Start a new pass. Only rows inside `bounds` keep cells; columns
    /// outside it are folded onto its edges.
    pub fn begin_rasterization(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.pool.reset(bounds.y, bounds.height.max(0) as usize);
        self.sorted_cells.clear();
        self.curr_cell = CurrCell::initial();
        self.exhausted = None;
        self.sorted = false;
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the pool overflowed during this pass.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.is_some()
    }

    /// Total number of accumulated cells.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.pool.len()
    }

    /// Cells that could not be stored during this pass.
    #[inline]
    pub fn missing_cells(&self) -> usize {
        self.pool.missing()
    }

    /// Whether cells have been sorted.
    #[inline]
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Get a reference to the cell at the given index.
    #[inline]
    pub fn cell(&self, idx: u32) -> &Cell {
        self.pool.cell(idx)
    }

    /// Add one edge in Q5 coordinates. Ignored once the pool is exhausted.
    pub fn add_edge(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if self.exhausted.is_some() || (x1 == x2 && y1 == y2) {
            return;
        }
        self.line(x1, y1, x2, y2);
    }

    /// Flush the pending cell and report whether every cell fit.
    pub fn finish(&mut self) -> Result<(), PoolExhausted> {
        self.add_curr_cell();
        self.curr_cell = CurrCell::initial();
        match self.exhausted {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    /// Flush the current cell into the pool if it has non-zero data.
    #[inline]
    fn add_curr_cell(&mut self) {
        let c = self.curr_cell;
        if c.area | c.cover != 0 {
            if let Err(err) = self.pool.accumulate(c.x, c.y, c.cover, c.area) {
                if self.exhausted.is_none() {
                    log::trace!("{err} at row {}", c.y);
                }
                self.exhausted = Some(err);
            }
        }
    }

    /// Move to a new cell position, flushing the previous cell if needed.
    ///
    /// Columns left of the bounds fold into the column just left of them,
    /// columns right of the bounds into the column just right. Only their
    /// cover reaches visible pixels, and that sum is unchanged.
    #[inline]
    fn set_curr_cell(&mut self, x: i32, y: i32) {
        let x = x.clamp(self.bounds.x - 1, self.bounds.right().max(self.bounds.x));
        if self.curr_cell.x != x || self.curr_cell.y != y {
            self.add_curr_cell();
            self.curr_cell = CurrCell {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    /// Render a horizontal line segment within a single scanline row `ey`.
    ///
    /// `x1`, `x2` are Q5; `y1`, `y2` are fractional y within the row
    /// (0..=POLY_SUBPIXEL_SCALE).
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK as i32;
        let fx2 = x2 & POLY_SUBPIXEL_MASK as i32;

        // Horizontal line: just move to the target cell
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        // Everything in a single cell
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += (fx1 + fx2) * delta;
            return;
        }

        // Run of adjacent cells on the same hline
        let mut p = (POLY_SUBPIXEL_SCALE as i64 - fx1 as i64) * (y2 - y1) as i64;
        let mut first = POLY_SUBPIXEL_SCALE as i32;
        let mut incr = 1_i32;

        let mut dx = x2 as i64 - x1 as i64;

        if dx < 0 {
            p = fx1 as i64 * (y2 - y1) as i64;
            first = 0;
            incr = -1;
            dx = -dx;
        }

        let mut delta = (p / dx) as i32;
        let mut modulo = p % dx;

        if modulo < 0 {
            delta -= 1;
            modulo += dx;
        }

        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx1 + first) * delta;

        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE as i64 * (y2 - y1 + delta) as i64;
            let mut lift = (p / dx) as i32;
            let mut rem = p % dx;

            if rem < 0 {
                lift -= 1;
                rem += dx;
            }

            modulo -= dx;

            while ex1 != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }

                self.curr_cell.cover += delta;
                self.curr_cell.area += POLY_SUBPIXEL_SCALE as i32 * delta;
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        delta = y2 - y1;
        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx2 + POLY_SUBPIXEL_SCALE as i32 - first) * delta;
    }

    /// Walk a line segment in Q5 coordinates, row by row.
    ///
    /// Very wide segments are split in half recursively so the per-row
    /// arithmetic stays within range.
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;

        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK as i32;
        let fy2 = y2 & POLY_SUBPIXEL_MASK as i32;

        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;

        self.set_curr_cell(ex1, ey1);

        // Everything on a single hline
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Vertical line: one cell per row, no hline walk needed
        let mut incr = 1_i32;
        if dx == 0 {
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;

            let mut first = POLY_SUBPIXEL_SCALE as i32;
            if dy < 0 {
                first = 0;
                incr = -1;
            }

            let mut delta = first - fy1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;

            ey1 += incr;
            self.set_curr_cell(ex1, ey1);

            delta = first + first - POLY_SUBPIXEL_SCALE as i32;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr_cell.cover = delta;
                self.curr_cell.area = area;
                ey1 += incr;
                self.set_curr_cell(ex1, ey1);
            }
            delta = fy2 - POLY_SUBPIXEL_SCALE as i32 + first;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;
            return;
        }

        // General case: multiple hlines
        let mut p = (POLY_SUBPIXEL_SCALE as i64 - fy1 as i64) * dx;
        let mut first = POLY_SUBPIXEL_SCALE as i32;

        let mut dy_abs = dy;
        if dy < 0 {
            p = fy1 as i64 * dx;
            first = 0;
            incr = -1;
            dy_abs = -dy;
        }

        let mut delta = (p / dy_abs) as i32;
        let mut modulo = p % dy_abs;

        if modulo < 0 {
            delta -= 1;
            modulo += dy_abs;
        }

        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);

        ey1 += incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = POLY_SUBPIXEL_SCALE as i64 * dx;
            let mut lift = (p / dy_abs) as i32;
            let mut rem = p % dy_abs;

            if rem < 0 {
                lift -= 1;
                rem += dy_abs;
            }
            modulo -= dy_abs;

            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }

                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE as i32 - first, x_to, first);
                x_from = x_to;

                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE as i32 - first, x2, fy2);
    }

    /// Order all cells by their packed `(y, x)` key.
    ///
    /// Flushes the pending cell first, so `finish()` is optional before
    /// sorting.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.add_curr_cell();
        self.curr_cell = CurrCell::initial();

        let cells = self.pool.cells();
        self.sorted_cells.clear();
        self.sorted_cells.extend(0..cells.len() as u32);
        self.sorted_cells.sort_unstable_by_key(|&idx| cells[idx as usize].packed_coord());
        self.sorted = true;
    }

    /// Iterate sorted cells grouped by row, in increasing y.
    ///
    /// Only meaningful after `sort_cells()`.
    pub fn rows(&self) -> CellRows<'_> {
        CellRows {
            cells: self.pool.cells(),
            sorted: &self.sorted_cells,
        }
    }
}

// ============================================================================
// CellRows / CellRow: sorted row access
// ============================================================================

/// Iterator over the rows of sorted cells.
pub struct CellRows<'a> {
    cells: &'a [Cell],
    sorted: &'a [u32],
}

impl<'a> Iterator for CellRows<'a> {
    type Item = CellRow<'a>;

    fn next(&mut self) -> Option<CellRow<'a>> {
        let first = *self.sorted.first()?;
        let y = self.cells[first as usize].y;
        let cells = self.cells;
        let len = self
            .sorted
            .iter()
            .position(|&idx| cells[idx as usize].y != y)
            .unwrap_or(self.sorted.len());
        let (row, rest) = self.sorted.split_at(len);
        self.sorted = rest;
        Some(CellRow {
            y,
            cells,
            indices: row,
        })
    }
}

/// Cells of one row in increasing x order.
pub struct CellRow<'a> {
    y: i32,
    cells: &'a [Cell],
    indices: &'a [u32],
}

impl<'a> CellRow<'a> {
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        let cells = self.cells;
        self.indices.iter().map(move |&idx| &cells[idx as usize])
    }
}

// ============================================================================
// Tests
// ============================================================================
