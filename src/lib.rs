//! # canvas-raster
//!
//! Anti-aliased polygon rasterization into packed framebuffers with a fixed
//! memory budget, for displays driven from small scratch memory.
//!
//! Shapes are closed polygons with vertices in 1/32 pixel fixed point. They
//! are rasterized into a bounded pool of coverage cells. When a region needs
//! more cells than the pool holds, the draw is split into narrower bands and
//! retried, so memory use stays constant however large the shape is.
//!
//! - Exact area coverage with non-zero or even-odd filling
//! - Bounded cell pool shared by every draw
//! - Degrade-and-retry band splitting with a remembered band height
//! - Painters for 1, 2 and 4 bit gray, RGB565, RGB888, ARGB8888 and the
//!   four 2222 layouts, with solid colors or bitmaps
//! - Circles, arcs, rings, wide lines and transformed polygons
//!
//! ## Pipeline
//!
//! 1. **Shape**: feeds vertices to a [`canvas::Canvas`]
//! 2. **Rasterizer**: walks the edges and accumulates cells
//! 3. **Scanline builder**: sorts the cells and turns them into spans
//! 4. **Scanline renderer**: clips spans and hands them to a painter
//! 5. **Painter**: blends the color into the framebuffer
//!
//! ```
//! use canvas_raster::basics::Rect;
//! use canvas_raster::canvas_widget::CanvasWidget;
//! use canvas_raster::canvas_widget_renderer::CanvasWidgetRenderer;
//! use canvas_raster::circle::Circle;
//! use canvas_raster::color::Rgb8;
//! use canvas_raster::fixed_point::Q5;
//! use canvas_raster::painter::PainterRgb888;
//! use canvas_raster::pixfmt::PixelFormat;
//! use canvas_raster::rendering_buffer::Framebuffer;
//!
//! let mut pixels = vec![0u8; 40 * 40 * 3];
//! let mut fb = Framebuffer::packed(&mut pixels, 40, 40, PixelFormat::Rgb888)?;
//! let mut renderer = CanvasWidgetRenderer::default();
//!
//! let circle = Circle::new(Q5::from_int(20), Q5::from_int(20), Q5::from_int(15));
//! let painter = PainterRgb888::solid(Rgb8::new(255, 0, 0), 255);
//! let mut widget = CanvasWidget::new(circle, painter, Rect::new(0, 0, 40, 40));
//! widget.draw(&mut renderer, &mut fb, Rect::new(0, 0, 40, 40))?;
//! # Ok::<(), canvas_raster::error::RenderError>(())
//! ```

// Foundation types & math
pub mod basics;
pub mod error;
pub mod fixed_point;

// Rasterizer
pub mod cell_pool;
pub mod rasterizer;
pub mod rasterizer_cells;
pub mod scanline;

// Pixel formats & painters
pub mod bitmap;
pub mod color;
pub mod painter;
pub mod pixfmt;
pub mod pixfmt_gray;
pub mod pixfmt_rgb;
pub mod pixfmt_rgba;
pub mod renderer_scanline;
pub mod rendering_buffer;
pub mod span_bitmap;
pub mod span_solid;

// Canvas widgets
pub mod canvas;
pub mod canvas_widget;
pub mod canvas_widget_renderer;

// Shapes
pub mod circle;
pub mod line;
pub mod shape;
