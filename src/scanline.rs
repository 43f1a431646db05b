//! Unpacked scanline container.
//!
//! Stores one coverage byte per pixel of the render region width, with
//! spans referencing into it. Cells and spans that fall outside
//! `[0, width)` are clipped here, so the rasterizer never has to clamp
//! columns.

// ============================================================================
// ScanlineSpan: a horizontal run within a scanline
// ============================================================================

/// A horizontal span within a scanline, referencing coverage data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanlineSpan {
    pub x: i32,
    pub len: i32,
    pub cover_offset: usize,
}

// ============================================================================
// Scanline
// ============================================================================

/// Unpacked scanline with per-pixel u8 coverage values.
///
/// Usage protocol:
/// 1. `reset(width)`: size the covers array for the render region
/// 2. `reset_spans()` before each row
/// 3. `add_cell()` / `add_span()` with monotonically increasing x
/// 4. `finalize(y)`: set the row
/// 5. iterate `spans()` and read coverage with `covers_of()`
pub struct Scanline {
    width: i32,
    last_x: i32,
    y: i32,
    covers: Vec<u8>,
    spans: Vec<ScanlineSpan>,
}

const NO_LAST_X: i32 = 0x7FFF_FFF0;

impl Scanline {
    pub fn new() -> Self {
        Self {
            width: 0,
            last_x: NO_LAST_X,
            y: 0,
            covers: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Prepare for rows of `width` pixels.
    pub fn reset(&mut self, width: i32) {
        let width = width.max(0);
        self.width = width;
        self.covers.clear();
        self.covers.resize(width as usize, 0);
        self.spans.clear();
        self.spans.reserve(width as usize / 2 + 1);
        self.last_x = NO_LAST_X;
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn reset_spans(&mut self) {
        self.last_x = NO_LAST_X;
        self.spans.clear();
    }

    fn push(&mut self, x: i32, len: i32) {
        let n = self.spans.len();
        if n > 0 && x == self.last_x + 1 {
            self.spans[n - 1].len += len;
        } else {
            self.spans.push(ScanlineSpan {
                x,
                len,
                cover_offset: x as usize,
            });
        }
        self.last_x = x + len - 1;
    }

    /// Add a single pixel of coverage.
    pub fn add_cell(&mut self, x: i32, cover: u8) {
        if x < 0 || x >= self.width {
            return;
        }
        self.covers[x as usize] = cover;
        self.push(x, 1);
    }

    /// Add `len` pixels of uniform coverage starting at `x`.
    pub fn add_span(&mut self, x: i32, len: i32, cover: u8) {
        let start = x.max(0);
        let end = x.saturating_add(len).min(self.width);
        if end <= start {
            return;
        }
        self.covers[start as usize..end as usize].fill(cover);
        self.push(start, end - start);
    }

    pub fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    #[inline]
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Spans in increasing x order.
    #[inline]
    pub fn spans(&self) -> &[ScanlineSpan] {
        &self.spans
    }

    /// Coverage bytes of one span.
    #[inline]
    pub fn covers_of(&self, span: &ScanlineSpan) -> &[u8] {
        &self.covers[span.cover_offset..span.cover_offset + span.len as usize]
    }
}

impl Default for Scanline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scanline(width: i32) -> Scanline {
        let mut sl = Scanline::new();
        sl.reset(width);
        sl
    }

    #[test]
    fn test_new() {
        let sl = Scanline::new();
        assert_eq!(sl.num_spans(), 0);
        assert_eq!(sl.y(), 0);
        assert_eq!(sl.width(), 0);
    }

    #[test]
    fn test_add_cell() {
        let mut sl = scanline(100);
        sl.add_cell(10, 128);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!((span.x, span.len), (10, 1));
        assert_eq!(sl.covers_of(&span), &[128]);
    }

    #[test]
    fn test_adjacent_cells_merge() {
        let mut sl = scanline(100);
        sl.add_cell(10, 100);
        sl.add_cell(11, 200);
        sl.add_cell(12, 150);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!((span.x, span.len), (10, 3));
        assert_eq!(sl.covers_of(&span), &[100, 200, 150]);
    }

    #[test]
    fn test_non_adjacent_cells_separate_spans() {
        let mut sl = scanline(100);
        sl.add_cell(10, 100);
        sl.add_cell(20, 200);
        assert_eq!(sl.num_spans(), 2);
        assert_eq!(sl.spans()[0].x, 10);
        assert_eq!(sl.spans()[1].x, 20);
    }

    #[test]
    fn test_span_then_adjacent_cell() {
        let mut sl = scanline(100);
        sl.add_span(5, 3, 200);
        sl.add_cell(8, 100);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!(span.len, 4);
        assert_eq!(sl.covers_of(&span), &[200, 200, 200, 100]);
    }

    #[test]
    fn test_cells_outside_width_dropped() {
        let mut sl = scanline(8);
        sl.add_cell(-1, 50);
        sl.add_cell(8, 50);
        assert_eq!(sl.num_spans(), 0);
    }

    #[test]
    fn test_span_clipped_to_width() {
        let mut sl = scanline(8);
        sl.add_span(-3, 5, 255);
        sl.add_span(6, 10, 90);
        assert_eq!(sl.num_spans(), 2);
        assert_eq!(sl.spans()[0], ScanlineSpan { x: 0, len: 2, cover_offset: 0 });
        assert_eq!(sl.spans()[1], ScanlineSpan { x: 6, len: 2, cover_offset: 6 });
        sl.add_span(-10, 3, 1);
        assert_eq!(sl.num_spans(), 2);
    }

    #[test]
    fn test_finalize_sets_row() {
        let mut sl = scanline(100);
        sl.add_cell(10, 128);
        sl.finalize(42);
        assert_eq!(sl.y(), 42);
        assert_eq!(sl.num_spans(), 1);
    }

    #[test]
    fn test_reset_spans() {
        let mut sl = scanline(100);
        sl.add_cell(10, 128);
        sl.reset_spans();
        assert_eq!(sl.num_spans(), 0);
        sl.add_cell(11, 1);
        assert_eq!(sl.spans()[0].x, 11);
    }
}
