//! Canvas widgets and the degrade-and-retry draw loop.
//!
//! A [`CanvasWidget`] pairs a [`CanvasShape`] with the painter that colors
//! it. Drawing splits the invalidated area into horizontal bands. Each band
//! is rasterized in one pass; if the pass runs out of cell memory, the band
//! is halved and tried again. The band height that finally worked on the
//! first draw is remembered, so later draws start at a size known to fit.

use crate::basics::Rect;
use crate::canvas::Canvas;
use crate::canvas_widget_renderer::CanvasWidgetRenderer;
use crate::error::{RenderError, Result};
use crate::painter::Painter;
use crate::rendering_buffer::Framebuffer;

/// Something that can be drawn on a [`Canvas`].
pub trait CanvasShape {
    /// Smallest rectangle, in widget coordinates, that holds every pixel
    /// the shape may touch.
    fn minimal_rect(&self) -> Rect;

    /// Feed the outline of the shape to `canvas`.
    fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>);
}

// ============================================================================
// RenderCache
// ============================================================================

/// Band height remembered between draws of one widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCache {
    max_lines: Option<u32>,
    settled: bool,
}

impl RenderCache {
    /// Tallest band to attempt, or `None` if no pass has failed yet.
    #[inline]
    pub fn max_lines(&self) -> Option<u32> {
        self.max_lines
    }

    /// Whether the widget has completed its first draw.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Forget the ceiling, e.g. after the shape grew more complex.
    pub fn reset(&mut self) {
        *self = RenderCache::default();
    }

    fn wanted(&self, remaining: u32) -> u32 {
        match self.max_lines {
            Some(max) => max.min(remaining),
            None => remaining,
        }
    }

    fn lower_ceiling(&mut self, lines: u32) {
        if self.settled {
            return;
        }
        if self.max_lines.map_or(true, |max| lines < max) {
            log::debug!("canvas band height limited to {lines} lines");
            self.max_lines = Some(lines);
        }
    }
}

/// What a draw took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Rasterization passes run, including failed ones.
    pub passes: u32,
    /// Passes that ran out of cell memory.
    pub retries: u32,
    /// Rows of the invalidated area processed.
    pub rows: u32,
}

// ============================================================================
// CanvasWidget
// ============================================================================

/// A shape, its painter and its place on screen.
pub struct CanvasWidget<'p, S> {
    shape: S,
    painter: Box<dyn Painter + 'p>,
    rect: Rect,
    alpha: u8,
    cache: RenderCache,
}

impl<'p, S: CanvasShape> CanvasWidget<'p, S> {
    /// A fully opaque widget covering `rect` in framebuffer coordinates.
    pub fn new(shape: S, painter: impl Painter + 'p, rect: Rect) -> Self {
        Self {
            shape,
            painter: Box::new(painter),
            rect,
            alpha: 255,
            cache: RenderCache::default(),
        }
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut S {
        &mut self.shape
    }

    pub fn set_painter(&mut self, painter: impl Painter + 'p) {
        self.painter = Box::new(painter);
    }

    pub fn painter(&self) -> &dyn Painter {
        &*self.painter
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RenderCache {
        &mut self.cache
    }

    /// The part of the widget the shape can touch, in widget coordinates.
    pub fn invalidated_rect(&self) -> Rect {
        self.shape
            .minimal_rect()
            .intersect(&Rect::new(0, 0, self.rect.width, self.rect.height))
    }

    /// Draw the part of the widget inside `invalidated` (widget
    /// coordinates) into `fb`.
    ///
    /// Fails without touching `fb` if the painter does not match its pixel
    /// format. Fails with [`RenderError::OutlineTooComplex`] if a single row
    /// does not fit in the renderer's cell memory; rows above it have been
    /// drawn by then.
    pub fn draw(
        &mut self,
        renderer: &mut CanvasWidgetRenderer,
        fb: &mut Framebuffer<'_>,
        invalidated: Rect,
    ) -> Result<DrawReport> {
        if self.painter.pixel_format() != fb.format() {
            return Err(RenderError::IncompatiblePainter {
                painter: self.painter.pixel_format(),
                framebuffer: fb.format(),
            });
        }

        let mut report = DrawReport::default();
        let minimal_rect = self.shape.minimal_rect();
        let mut area = invalidated;
        let mut lines = area.height.max(0) as u32;

        while lines > 0 {
            let mut wanted = self.cache.wanted(lines);
            let mut failed = false;

            while wanted > 0 {
                let band = Rect::new(area.x, area.y, area.width, wanted as i32)
                    .intersect(&minimal_rect);
                if band.is_empty() {
                    break;
                }
                report.passes += 1;
                if self.draw_band(renderer, fb, band)? {
                    break;
                }
                report.retries += 1;
                failed = true;
                wanted >>= 1;
                if wanted > 0 {
                    log::debug!(
                        "cell memory exhausted at row {}, retrying with {wanted} lines",
                        area.y
                    );
                }
            }

            if wanted == 0 {
                log::warn!(
                    "row {} needs more than {} cells",
                    area.y,
                    renderer.max_cells()
                );
                return Err(RenderError::OutlineTooComplex { y: area.y });
            }
            if failed {
                self.cache.lower_ceiling(wanted);
            }

            area.y += wanted as i32;
            lines -= wanted;
            report.rows += wanted;
        }

        self.cache.settled = true;
        Ok(report)
    }

    /// Run one pass over `band`. Returns `Ok(false)` if it ran out of cells.
    fn draw_band(
        &mut self,
        renderer: &mut CanvasWidgetRenderer,
        fb: &mut Framebuffer<'_>,
        band: Rect,
    ) -> Result<bool> {
        let mut canvas = Canvas::new(renderer, fb, self.rect, band)?;
        self.shape.draw_canvas_widget(&mut canvas);
        match canvas.render(&mut *self.painter, self.alpha) {
            Ok(()) => {
                log::trace!("rendered band {band:?}");
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas_widget_renderer::RendererConfig;
    use crate::color::{Gray8, Rgb8};
    use crate::fixed_point::Q5;
    use crate::painter::{PainterGray4, PainterRgb888};
    use crate::pixfmt::PixelFormat;
    use test_log::test;

    /// Axis-aligned rectangle in whole pixels.
    struct Block(Rect);

    impl CanvasShape for Block {
        fn minimal_rect(&self) -> Rect {
            self.0
        }

        fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>) {
            let r = self.0;
            canvas.move_to(Q5::from_int(r.x), Q5::from_int(r.y));
            canvas.line_to(Q5::from_int(r.right()), Q5::from_int(r.y));
            canvas.line_to(Q5::from_int(r.right()), Q5::from_int(r.bottom()));
            canvas.line_to(Q5::from_int(r.x), Q5::from_int(r.bottom()));
        }
    }

    /// A zig-zag whose every row needs many cells.
    struct Comb {
        teeth: i32,
        height: i32,
    }

    impl CanvasShape for Comb {
        fn minimal_rect(&self) -> Rect {
            Rect::new(0, 0, self.teeth * 2 + 1, self.height)
        }

        fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>) {
            canvas.move_to(Q5::ZERO, Q5::ZERO);
            for i in 0..self.teeth {
                canvas.line_to(Q5::from_int(i * 2) + Q5(16), Q5::from_int(self.height));
                canvas.line_to(Q5::from_int(i * 2 + 1) + Q5(16), Q5::ZERO);
            }
        }
    }

    fn rgb_fb(data: &mut [u8], w: i32, h: i32) -> Framebuffer<'_> {
        Framebuffer::packed(data, w, h, PixelFormat::Rgb888).unwrap()
    }

    #[test]
    fn test_draw_fills_block() {
        let mut cwr = CanvasWidgetRenderer::default();
        let mut data = vec![0u8; 8 * 8 * 3];
        let mut fb = rgb_fb(&mut data, 8, 8);
        let mut widget = CanvasWidget::new(
            Block(Rect::new(1, 1, 3, 2)),
            PainterRgb888::solid(Rgb8::new(0, 0, 200), 255),
            Rect::new(2, 2, 6, 6),
        );
        let report = widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 6, 6)).unwrap();
        assert_eq!(report.retries, 0);
        assert_eq!(report.passes, 1);
        assert_eq!(report.rows, 6);
        assert!(widget.cache().is_settled());
        assert_eq!(widget.cache().max_lines(), None);

        // Block at widget (1, 1) lands at framebuffer (3, 3)
        let blue = |x: usize, y: usize| data[(y * 8 + x) * 3];
        assert_eq!(blue(3, 3), 200);
        assert_eq!(blue(5, 4), 200);
        assert_eq!(blue(6, 4), 0);
        assert_eq!(blue(3, 5), 0);
    }

    #[test]
    fn test_incompatible_painter_rejected() {
        let mut cwr = CanvasWidgetRenderer::default();
        let mut data = vec![0u8; 4 * 4 * 3];
        let mut fb = rgb_fb(&mut data, 4, 4);
        let mut widget = CanvasWidget::new(
            Block(Rect::new(0, 0, 4, 4)),
            PainterGray4::solid(Gray8::WHITE, 255),
            Rect::new(0, 0, 4, 4),
        );
        let err = widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 4, 4)).unwrap_err();
        assert_eq!(
            err,
            RenderError::IncompatiblePainter {
                painter: PixelFormat::Gray4,
                framebuffer: PixelFormat::Rgb888
            }
        );
        assert!(data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_retry_sets_ceiling() {
        // Room for a 16 px scanline and a handful of cells
        let config = RendererConfig::default().with_memory_size(16 * 5 + 20 * 40);
        let mut cwr = CanvasWidgetRenderer::new(config).unwrap();
        let mut data = vec![0u8; 16 * 16 * 3];
        let mut fb = rgb_fb(&mut data, 16, 16);
        let mut widget = CanvasWidget::new(
            Comb { teeth: 6, height: 16 },
            PainterRgb888::solid(Rgb8::WHITE, 255),
            Rect::new(0, 0, 16, 16),
        );

        let report = widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 16, 16)).unwrap();
        assert!(report.retries > 0);
        assert_eq!(report.rows, 16);
        let ceiling = widget.cache().max_lines().unwrap();
        assert!(ceiling < 16);
        assert!(cwr.memory_report().max_cells_missing > 0);

        // Second draw starts at the ceiling and keeps it
        let report = widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 16, 16)).unwrap();
        assert_eq!(widget.cache().max_lines(), Some(ceiling));
        assert!(report.passes >= 16 / ceiling);
    }

    #[test]
    fn test_single_row_too_complex() {
        let config = RendererConfig::default().with_memory_size(16 * 5 + 20 * 4);
        let mut cwr = CanvasWidgetRenderer::new(config).unwrap();
        let mut data = vec![0u8; 16 * 4 * 3];
        let mut fb = rgb_fb(&mut data, 16, 4);
        let mut widget = CanvasWidget::new(
            Comb { teeth: 6, height: 4 },
            PainterRgb888::solid(Rgb8::WHITE, 255),
            Rect::new(0, 0, 16, 4),
        );
        let err = widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 16, 4)).unwrap_err();
        assert_eq!(err, RenderError::OutlineTooComplex { y: 0 });
    }

    #[test]
    fn test_area_outside_shape_skipped() {
        let mut cwr = CanvasWidgetRenderer::default();
        let mut data = vec![0u8; 8 * 8 * 3];
        let mut fb = rgb_fb(&mut data, 8, 8);
        let mut widget = CanvasWidget::new(
            Block(Rect::new(0, 0, 2, 2)),
            PainterRgb888::solid(Rgb8::WHITE, 255),
            Rect::new(0, 0, 8, 8),
        );
        let report = widget.draw(&mut cwr, &mut fb, Rect::new(4, 4, 4, 4)).unwrap();
        assert_eq!(report.passes, 0);
        assert_eq!(report.rows, 4);
        assert!(data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalidated_rect_clipped_to_widget() {
        let widget = CanvasWidget::new(
            Block(Rect::new(-2, 3, 10, 10)),
            PainterRgb888::solid(Rgb8::WHITE, 255),
            Rect::new(5, 5, 6, 6),
        );
        assert_eq!(widget.invalidated_rect(), Rect::new(0, 3, 6, 3));
    }

    #[test]
    fn test_cache_reset() {
        let mut cache = RenderCache::default();
        cache.lower_ceiling(8);
        cache.lower_ceiling(12);
        assert_eq!(cache.max_lines(), Some(8));
        cache.settled = true;
        cache.lower_ceiling(2);
        assert_eq!(cache.max_lines(), Some(8));
        cache.reset();
        assert_eq!(cache, RenderCache::default());
    }
}
