//! One rasterization pass over a region of a canvas widget.
//!
//! A [`Canvas`] is created per pass by the widget draw loop. Shapes feed it
//! vertices in widget coordinates (`Q5`); the canvas moves them into the
//! coordinate space of the region being drawn and hands them to the
//! rasterizer.
//!
//! Vertices outside the region are classified by which side(s) they lie
//! on. Runs of edges that stay on one outside side are collapsed, since
//! they cannot change the coverage of any pixel in the region. This keeps
//! large shapes drawn into small regions from filling the cell pool with
//! cells that are never shown.

use crate::basics::Rect;
use crate::canvas_widget_renderer::CanvasWidgetRenderer;
use crate::error::{PoolExhausted, Result};
use crate::fixed_point::Q5;
use crate::painter::Painter;
use crate::renderer_scanline::render_scanlines;
use crate::rendering_buffer::{Framebuffer, RenderingBuffer};

const POINT_IS_ABOVE: u8 = 1 << 0;
const POINT_IS_BELOW: u8 = 1 << 1;
const POINT_IS_LEFT: u8 = 1 << 2;
const POINT_IS_RIGHT: u8 = 1 << 3;

/// Rasterization context for one region of one widget.
pub struct Canvas<'a> {
    renderer: &'a mut CanvasWidgetRenderer,
    rbuf: RenderingBuffer<'a>,

    // Region in widget coordinates
    offset_x: i32,
    offset_y: i32,
    area_x: i32,
    area_y: i32,
    area_width: i32,
    area_height: i32,

    pen_up: bool,
    pen_has_been_down: bool,
    previous_outside: u8,
    pen_down_outside: u8,
    initial_x: i32,
    initial_y: i32,
    previous_x: i32,
    previous_y: i32,
}

impl<'a> Canvas<'a> {
    /// Prepare a pass over `invalidated` (widget coordinates) of the widget
    /// placed at `widget` in the framebuffer.
    ///
    /// The region is clipped to the widget and the framebuffer. Fails if
    /// the renderer cannot hold a scanline as wide as the clipped region.
    pub fn new(
        renderer: &'a mut CanvasWidgetRenderer,
        fb: &'a mut Framebuffer<'_>,
        widget: Rect,
        invalidated: Rect,
    ) -> Result<Self> {
        let dirty = Rect::new(0, 0, widget.width, widget.height).intersect(&invalidated);
        let absolute = dirty.translated(widget.x, widget.y).intersect(&fb.rect());
        let dirty = absolute.translated(-widget.x, -widget.y);

        renderer.set_scanline_width(dirty.width)?;
        let filling_rule = renderer.config().filling_rule;
        renderer.rasterizer.set_filling_rule(filling_rule);
        renderer
            .rasterizer
            .reset(Rect::new(0, 0, dirty.width, dirty.height));

        Ok(Self {
            renderer,
            rbuf: fb.sub_buffer(absolute),
            offset_x: dirty.x,
            offset_y: dirty.y,
            area_x: Q5::from_int(dirty.x).raw(),
            area_y: Q5::from_int(dirty.y).raw(),
            area_width: Q5::from_int(dirty.width).raw(),
            area_height: Q5::from_int(dirty.height).raw(),
            pen_up: true,
            pen_has_been_down: false,
            previous_outside: 0,
            pen_down_outside: 0,
            initial_x: 0,
            initial_y: 0,
            previous_x: 0,
            previous_y: 0,
        })
    }

    /// The region being drawn, in widget coordinates.
    pub fn area(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            Q5(self.area_width).to_int(),
            Q5(self.area_height).to_int(),
        )
    }

    fn outside_code(&self, x: i32, y: i32) -> u8 {
        let mut outside = 0;
        if y < 0 {
            outside = POINT_IS_ABOVE;
        } else if y >= self.area_height {
            outside = POINT_IS_BELOW;
        }
        if x < 0 {
            outside |= POINT_IS_LEFT;
        } else if x >= self.area_width {
            outside |= POINT_IS_RIGHT;
        }
        outside
    }

    /// Start a new contour at `(x, y)`, closing the previous one.
    pub fn move_to(&mut self, x: Q5, y: Q5) {
        if !self.pen_up {
            self.close();
        }

        let x = x.raw() - self.area_x;
        let y = y.raw() - self.area_y;
        let outside = self.outside_code(x, y);

        if outside != 0 {
            self.pen_up = true;
        } else {
            self.pen_down_outside = outside;
            self.renderer.rasterizer.move_to(x, y);
            self.pen_up = false;
            self.pen_has_been_down = true;
        }

        self.initial_x = x;
        self.initial_y = y;
        self.previous_x = x;
        self.previous_y = y;
        self.previous_outside = outside;
    }

    /// Continue the contour to `(x, y)`.
    pub fn line_to(&mut self, x: Q5, y: Q5) {
        let x = x.raw() - self.area_x;
        let y = y.raw() - self.area_y;
        let mut outside = self.outside_code(x, y);

        let ras = &mut self.renderer.rasterizer;
        if self.previous_outside == 0 {
            ras.line_to(x, y);
        } else if outside == 0 || self.previous_outside & outside == 0 {
            // Inside again, or crossed over to another side
            if self.pen_up {
                self.pen_down_outside = self.previous_outside;
                ras.move_to(self.previous_x, self.previous_y);
                self.pen_up = false;
                self.pen_has_been_down = true;
            } else {
                ras.line_to(self.previous_x, self.previous_y);
            }
            ras.line_to(x, y);
        } else {
            // Still outside on a shared side; only that side matters now
            outside &= self.previous_outside;
        }

        self.previous_x = x;
        self.previous_y = y;
        self.previous_outside = outside;
    }

    /// Close the current contour back to its first point.
    pub fn close(&mut self) {
        if !self.pen_up && self.previous_outside & self.pen_down_outside == 0 {
            let ras = &mut self.renderer.rasterizer;
            if self.previous_outside != 0 {
                ras.line_to(self.previous_x, self.previous_y);
            }
            ras.line_to(self.initial_x, self.initial_y);
        }
        self.pen_up = false;
    }

    /// Rasterize everything added so far and paint it with `painter` at
    /// `alpha`.
    ///
    /// Succeeds without painting when no vertex ever reached the region or
    /// `alpha` is 0. Fails if the cell pool overflowed, in which case no
    /// pixel has been written.
    pub fn render(
        &mut self,
        painter: &mut dyn Painter,
        alpha: u8,
    ) -> core::result::Result<(), PoolExhausted> {
        let outcome = self.rasterize(painter, alpha);
        self.renderer.record_pass();
        outcome
    }

    fn rasterize(
        &mut self,
        painter: &mut dyn Painter,
        alpha: u8,
    ) -> core::result::Result<(), PoolExhausted> {
        if self.renderer.rasterizer.was_outline_too_complex() {
            return Err(PoolExhausted {
                capacity: self.renderer.max_cells(),
            });
        }
        if !self.pen_has_been_down || alpha == 0 {
            return Ok(());
        }

        self.close();

        painter.set_offset(self.offset_x, self.offset_y);
        painter.set_widget_alpha(alpha);
        let CanvasWidgetRenderer {
            rasterizer,
            scanline,
            ..
        } = &mut *self.renderer;
        render_scanlines(rasterizer, scanline, &mut self.rbuf, painter)
    }
}

// ============================================================================
// Tests
// ============================================================================
