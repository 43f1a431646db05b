//! Bounded cell storage for one rasterization pass.
//!
//! Cells live in a flat arena that never grows past its capacity. Each row
//! of the render region has a chain head; cells of that row are linked
//! through their `next` index, so looking up an existing `(x, y)` walks
//! only the cells of one row. `CHAIN_END` terminates a chain and marks an
//! empty row.

use crate::error::PoolExhausted;

/// Sentinel `next` index / row head meaning "no further cell".
pub const CHAIN_END: i32 = -1;

// ============================================================================
// Cell
// ============================================================================

/// A pixel cell storing accumulated coverage and area from edges.
///
/// - `cover`: net winding contribution (sum of dy across this cell)
/// - `area`: twice the signed area of edge fragments within this cell,
///   used to compute the partial-pixel coverage at cell boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
    /// Index of the next cell in the same row, or `CHAIN_END`.
    pub next: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, cover: i32, area: i32) -> Self {
        Self {
            x,
            y,
            cover,
            area,
            next: CHAIN_END,
        }
    }

    /// Merge another contribution into this cell.
    #[inline]
    pub fn add_cover(&mut self, cover: i32, area: i32) {
        self.cover += cover;
        self.area += area;
    }

    /// Row-major sort key, `(y << 32) + x`, ordered by `(y, x)` for any
    /// `i32` coordinates.
    #[inline]
    pub fn packed_coord(&self) -> i64 {
        ((self.y as i64) << 32) + self.x as i64
    }
}

// ============================================================================
// CellPool
// ============================================================================

/// Fixed-capacity arena of cells indexed by row.
pub struct CellPool {
    cells: Vec<Cell>,
    capacity: usize,
    row_heads: Vec<i32>,
    first_row: i32,
    missing: usize,
}

impl CellPool {
    /// Create a pool holding at most `capacity` cells. Storage is reserved
    /// up front and reused by every pass.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            capacity,
            row_heads: Vec::new(),
            first_row: 0,
            missing: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, discarding all cells.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.cells = Vec::with_capacity(capacity);
        self.capacity = capacity;
        self.reset(self.first_row, self.row_heads.len());
    }

    /// Discard all cells and index `rows` rows starting at `first_row`.
    pub fn reset(&mut self, first_row: i32, rows: usize) {
        self.cells.clear();
        self.row_heads.clear();
        self.row_heads.resize(rows, CHAIN_END);
        self.first_row = first_row;
        self.missing = 0;
    }

    /// Number of cells in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells that could not be stored since the last reset.
    #[inline]
    pub fn missing(&self) -> usize {
        self.missing
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, idx: u32) -> &Cell {
        &self.cells[idx as usize]
    }

    /// Add `cover`/`area` to the cell at `(x, y)`, allocating it on first
    /// use. Rows outside the indexed range are silently dropped since they
    /// can never reach the render region.
    pub fn accumulate(
        &mut self,
        x: i32,
        y: i32,
        cover: i32,
        area: i32,
    ) -> Result<(), PoolExhausted> {
        let row = y - self.first_row;
        if row < 0 || row as usize >= self.row_heads.len() {
            return Ok(());
        }
        let head = &mut self.row_heads[row as usize];
        let mut idx = *head;
        while idx != CHAIN_END {
            let cell = &mut self.cells[idx as usize];
            if cell.x == x {
                cell.add_cover(cover, area);
                return Ok(());
            }
            idx = cell.next;
        }
        if self.cells.len() >= self.capacity {
            self.missing += 1;
            return Err(PoolExhausted {
                capacity: self.capacity,
            });
        }
        let mut cell = Cell::new(x, y, cover, area);
        cell.next = *head;
        *head = self.cells.len() as i32;
        self.cells.push(cell);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
