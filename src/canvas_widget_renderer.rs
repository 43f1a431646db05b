//! Scratch memory shared by every canvas draw.
//!
//! A single [`CanvasWidgetRenderer`] owns the cell pool and the scanline
//! buffers. Both come out of one fixed memory budget: widening the
//! scanline leaves fewer bytes for cells. Draws borrow the renderer
//! mutably, so two draws can never use the scratch memory at once.

use core::mem::size_of;

use crate::basics::{FillingRule, MAX_COORD};
use crate::cell_pool::Cell;
use crate::error::{RenderError, Result};
use crate::rasterizer::Rasterizer;
use crate::scanline::Scanline;

/// Scratch bytes needed per pixel of scanline width: one coverage byte
/// plus room for the span table.
pub const SCANLINE_BYTES_PER_PIXEL: usize = 1 + 2 + 2;

/// Scratch memory used when none is configured.
pub const DEFAULT_MEMORY_SIZE: usize = 4096;

// ============================================================================
// RendererConfig
// ============================================================================

/// Settings for a [`CanvasWidgetRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Bytes of scratch memory shared by scanline and cells.
    pub memory_size: usize,
    /// Widest scanline a draw may request.
    pub max_scanline_width: i32,
    /// Filling rule of every canvas created from this renderer.
    pub filling_rule: FillingRule,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_scanline_width: MAX_COORD,
            filling_rule: FillingRule::NonZero,
        }
    }
}

impl RendererConfig {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_max_scanline_width(mut self, width: i32) -> Self {
        self.max_scanline_width = width;
        self
    }

    pub fn with_filling_rule(mut self, rule: FillingRule) -> Self {
        self.filling_rule = rule;
        self
    }

    /// Check that the memory can hold at least a one pixel scanline and
    /// one cell, and that the width cap is within the coordinate range.
    pub fn validate(&self) -> Result<()> {
        let minimum = SCANLINE_BYTES_PER_PIXEL + size_of::<Cell>();
        if self.memory_size < minimum {
            return Err(RenderError::InvalidConfig(format!(
                "memory_size {} is below the minimum of {minimum} bytes",
                self.memory_size
            )));
        }
        if self.max_scanline_width < 1 || self.max_scanline_width > MAX_COORD {
            return Err(RenderError::InvalidConfig(format!(
                "max_scanline_width {} is outside 1..={MAX_COORD}",
                self.max_scanline_width
            )));
        }
        Ok(())
    }

    /// Cells left over once a scanline of `width` pixels is carved out.
    pub fn cells_for_width(&self, width: i32) -> usize {
        let scanline = width.max(0) as usize * SCANLINE_BYTES_PER_PIXEL;
        self.memory_size.saturating_sub(scanline) / size_of::<Cell>()
    }

    /// Widest scanline that still leaves room for one cell.
    pub fn max_width(&self) -> i32 {
        let spare = self.memory_size.saturating_sub(size_of::<Cell>()) / SCANLINE_BYTES_PER_PIXEL;
        (spare.min(self.max_scanline_width.max(0) as usize)) as i32
    }
}

// ============================================================================
// MemoryReport
// ============================================================================

/// High-water marks of cell usage across passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryReport {
    /// Most cells used by a single pass.
    pub max_cells_used: usize,
    /// Most cells a single pass needed but could not get.
    pub max_cells_missing: usize,
}

impl MemoryReport {
    /// Fold in the usage of one pass.
    pub fn record(&mut self, used: usize, missing: usize) {
        self.max_cells_used = self.max_cells_used.max(used);
        self.max_cells_missing = self.max_cells_missing.max(missing);
    }

    pub fn reset(&mut self) {
        *self = MemoryReport::default();
    }
}

// ============================================================================
// CanvasWidgetRenderer
// ============================================================================

/// Owner of the rasterizer scratch memory.
pub struct CanvasWidgetRenderer {
    config: RendererConfig,
    pub(crate) rasterizer: Rasterizer,
    pub(crate) scanline: Scanline,
    scanline_width: i32,
    report: MemoryReport,
}

impl CanvasWidgetRenderer {
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: RendererConfig) -> Self {
        let mut rasterizer = Rasterizer::new(config.cells_for_width(0));
        rasterizer.set_filling_rule(config.filling_rule);
        Self {
            config,
            rasterizer,
            scanline: Scanline::new(),
            scanline_width: 0,
            report: MemoryReport::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Split the memory for scanlines of `width` pixels; the rest becomes
    /// the cell pool.
    pub fn set_scanline_width(&mut self, width: i32) -> Result<()> {
        let width = width.max(0);
        let max = self.config.max_width();
        if width > max {
            return Err(RenderError::ScanlineTooWide { width, max });
        }
        if width != self.scanline_width || self.scanline.width() != width {
            self.scanline_width = width;
            self.scanline.reset(width);
            self.rasterizer
                .set_max_cells(self.config.cells_for_width(width));
        }
        Ok(())
    }

    #[inline]
    pub fn scanline_width(&self) -> i32 {
        self.scanline_width
    }

    /// Cells available to a pass at the current scanline width.
    #[inline]
    pub fn max_cells(&self) -> usize {
        self.rasterizer.max_cells()
    }

    #[inline]
    pub fn memory_report(&self) -> MemoryReport {
        self.report
    }

    pub fn reset_memory_report(&mut self) {
        self.report.reset();
    }

    /// Record the cell usage of the pass that just ran.
    pub(crate) fn record_pass(&mut self) {
        let used = self.rasterizer.total_cells();
        let missing = self.rasterizer.missing_cells();
        self.report.record(used, missing);
        log::trace!("pass used {used} cells, {missing} missing");
    }
}

impl Default for CanvasWidgetRenderer {
    fn default() -> Self {
        Self::from_valid(RendererConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
