//! Scanline rendering functions.
//!
//! Drive the rasterizer → scanline → painter pipeline. Nothing here knows
//! about pixel formats: spans are clipped to the rendering buffer and
//! handed to the painter with their coverage bytes.

use crate::error::PoolExhausted;
use crate::painter::Painter;
use crate::rasterizer::Rasterizer;
use crate::rendering_buffer::RenderingBuffer;
use crate::scanline::Scanline;

// ============================================================================
// render_scanlines: the main rendering driver
// ============================================================================

/// Render every row of the rasterizer through `painter`.
///
/// Fails without touching a pixel if the cell pool overflowed while the
/// outline was built.
pub fn render_scanlines(
    ras: &mut Rasterizer,
    sl: &mut Scanline,
    rbuf: &mut RenderingBuffer<'_>,
    painter: &mut dyn Painter,
) -> Result<(), PoolExhausted> {
    if !ras.rewind_scanlines()? {
        return Ok(());
    }
    for row in ras.rows() {
        if ras.build_scanline(&row, sl) {
            render_scanline(sl, rbuf, painter);
        }
    }
    Ok(())
}

/// Render a single scanline.
///
/// Rows outside the buffer are skipped. Span parts left of column 0 or
/// right of the buffer width are dropped.
pub fn render_scanline(sl: &Scanline, rbuf: &mut RenderingBuffer<'_>, painter: &mut dyn Painter) {
    let y = sl.y();
    if y < 0 || y >= rbuf.height() as i32 {
        return;
    }
    let width = rbuf.width() as i32;
    let x_adjust = rbuf.x_adjust();
    let row = rbuf.row_mut(y as u32);

    for span in sl.spans() {
        let mut x = span.x;
        let mut covers = sl.covers_of(span);
        if x < 0 {
            let skip = x.unsigned_abs() as usize;
            if skip >= covers.len() {
                continue;
            }
            covers = &covers[skip..];
            x = 0;
        }
        let room = (width - x).max(0) as usize;
        if covers.len() > room {
            covers = &covers[..room];
        }
        if !covers.is_empty() {
            painter.render(row, x, x_adjust, y, covers);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
