//! End-to-end rasterization through widgets, canvases and painters.

use canvas_raster::basics::{FillingRule, Rect};
use canvas_raster::bitmap::Bitmap;
use canvas_raster::canvas::Canvas;
use canvas_raster::canvas_widget::{CanvasShape, CanvasWidget};
use canvas_raster::canvas_widget_renderer::{CanvasWidgetRenderer, RendererConfig};
use canvas_raster::color::{Gray8, Rgb8};
use canvas_raster::fixed_point::Q5;
use canvas_raster::painter::{PainterGray4, PainterRgb888, PainterRgb888Bitmap};
use canvas_raster::pixfmt::PixelFormat;
use canvas_raster::rendering_buffer::Framebuffer;
use canvas_raster::shape::{AbstractShape, Point};
use test_log::test;

const RED: Rgb8 = Rgb8::new(255, 0, 0);

fn pt(x: f32, y: f32) -> Point {
    Point::new(Q5::from_f32(x), Q5::from_f32(y))
}

fn rect_shape(x1: i32, y1: i32, x2: i32, y2: i32) -> AbstractShape {
    AbstractShape::new([
        Point::from_int(x1, y1),
        Point::from_int(x2, y1),
        Point::from_int(x2, y2),
        Point::from_int(x1, y2),
    ])
}

/// Rgb888 framebuffer contents, addressed by pixel.
struct Rgb888Image {
    data: Vec<u8>,
    width: usize,
}

impl Rgb888Image {
    fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height * 3],
            width,
        }
    }

    fn framebuffer(&mut self) -> Framebuffer<'_> {
        let height = (self.data.len() / 3 / self.width) as i32;
        Framebuffer::packed(&mut self.data, self.width as i32, height, PixelFormat::Rgb888).unwrap()
    }

    fn rgb(&self, x: usize, y: usize) -> Rgb8 {
        let i = (y * self.width + x) * 3;
        Rgb8::new(self.data[i + 2], self.data[i + 1], self.data[i])
    }

    fn untouched(&self, x: usize, y: usize) -> bool {
        self.rgb(x, y) == Rgb8::BLACK
    }
}

fn draw<S: CanvasShape>(
    image: &mut Rgb888Image,
    renderer: &mut CanvasWidgetRenderer,
    widget: &mut CanvasWidget<'_, S>,
    invalidated: Rect,
) {
    let mut fb = image.framebuffer();
    widget.draw(renderer, &mut fb, invalidated).unwrap();
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_rectangle_interior_and_exterior() {
    let mut image = Rgb888Image::new(16, 16);
    let mut cwr = CanvasWidgetRenderer::default();
    let color = Rgb8::new(12, 34, 56);
    let mut widget = CanvasWidget::new(
        rect_shape(3, 4, 11, 9),
        PainterRgb888::solid(color, 255),
        Rect::new(0, 0, 16, 16),
    );
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 16, 16));

    for y in 0..16 {
        for x in 0..16 {
            if (3..11).contains(&x) && (4..9).contains(&y) {
                assert_eq!(image.rgb(x, y), color, "inside ({x}, {y})");
            } else {
                assert!(image.untouched(x, y), "outside ({x}, {y})");
            }
        }
    }
}

#[test]
fn test_zero_opacity_leaves_buffer() {
    let mut image = Rgb888Image::new(12, 12);
    image.data.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
    let before = image.data.clone();

    let mut cwr = CanvasWidgetRenderer::default();
    let mut widget = CanvasWidget::new(
        rect_shape(0, 0, 12, 12),
        PainterRgb888::solid(RED, 255),
        Rect::new(0, 0, 12, 12),
    );
    widget.set_alpha(0);
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 12, 12));
    assert_eq!(image.data, before);
}

#[test]
fn test_triangle_scenario() {
    let mut image = Rgb888Image::new(16, 16);
    let mut cwr = CanvasWidgetRenderer::default();
    let triangle = AbstractShape::new([pt(0.0, 0.5), pt(11.0, 0.5), pt(5.5, 10.5)]);
    let mut widget =
        CanvasWidget::new(triangle, PainterRgb888::solid(RED, 255), Rect::new(0, 0, 16, 16));
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 16, 16));

    // Base row: every column of the base is touched, half covered inside
    for x in 0..11 {
        assert!(!image.untouched(x, 0), "base column {x}");
    }
    let half = image.rgb(5, 0).r;
    assert!((127..=129).contains(&half), "base coverage {half}");

    // Apex row: a single partially covered pixel
    let apex: Vec<usize> = (0..16).filter(|&x| !image.untouched(x, 10)).collect();
    assert_eq!(apex, vec![5]);
    assert!(image.rgb(5, 10).r < 255);

    // Nothing below the apex
    for y in 11..16 {
        for x in 0..16 {
            assert!(image.untouched(x, y), "({x}, {y})");
        }
    }
}

#[test]
fn test_triangle_apex_on_pixel_boundary() {
    let mut image = Rgb888Image::new(16, 16);
    let mut cwr = CanvasWidgetRenderer::default();
    let triangle = AbstractShape::new([pt(0.0, 0.5), pt(10.0, 0.5), pt(5.0, 10.5)]);
    let mut widget =
        CanvasWidget::new(triangle, PainterRgb888::solid(RED, 255), Rect::new(0, 0, 16, 16));
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 16, 16));

    // Full-width base, nothing past it
    for x in 0..10 {
        assert!(!image.untouched(x, 0), "base column {x}");
    }
    assert!(image.untouched(10, 0));

    // The apex straddles columns 4 and 5, each partially covered
    let apex: Vec<usize> = (0..16).filter(|&x| !image.untouched(x, 10)).collect();
    assert_eq!(apex, vec![4, 5]);
    assert!(image.rgb(4, 10).r < 255);
    assert!(image.rgb(5, 10).r < 255);

    for y in 11..16 {
        for x in 0..16 {
            assert!(image.untouched(x, y), "({x}, {y})");
        }
    }
}

#[test]
fn test_far_left_vertex_matches_near_left_vertex() {
    let render_with_left_edge = |left: i32| {
        let mut image = Rgb888Image::new(8, 8);
        let mut cwr = CanvasWidgetRenderer::default();
        let mut widget = CanvasWidget::new(
            rect_shape(left, 2, 5, 6),
            PainterRgb888::solid(RED, 255),
            Rect::new(0, 0, 8, 8),
        );
        draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 8, 8));
        image
    };

    let near = render_with_left_edge(-100);
    let far = render_with_left_edge(-70_000);
    assert_eq!(near.rgb(2, 2), RED);
    assert_eq!(far.rgb(2, 2), RED);
    assert_eq!(near.data, far.data);
}

fn pentagram() -> AbstractShape {
    let corners: Vec<Point> = (0..5)
        .map(|k| {
            let a = (-90.0 + 144.0 * k as f32).to_radians();
            pt(16.0 + 10.0 * a.cos(), 16.0 + 10.0 * a.sin())
        })
        .collect();
    AbstractShape::new(corners)
}

#[test]
fn test_self_overlap_nonzero_fills_center() {
    let mut image = Rgb888Image::new(32, 32);
    let mut cwr = CanvasWidgetRenderer::default();
    let mut widget =
        CanvasWidget::new(pentagram(), PainterRgb888::solid(RED, 255), Rect::new(0, 0, 32, 32));
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 32, 32));
    assert_eq!(image.rgb(16, 16), RED);
}

#[test]
fn test_self_overlap_even_odd_leaves_hole() {
    let mut image = Rgb888Image::new(32, 32);
    let config = RendererConfig::default().with_filling_rule(FillingRule::EvenOdd);
    let mut cwr = CanvasWidgetRenderer::new(config).unwrap();
    let mut widget =
        CanvasWidget::new(pentagram(), PainterRgb888::solid(RED, 255), Rect::new(0, 0, 32, 32));
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 32, 32));
    assert!(image.untouched(16, 16));
    // A point of the star is still filled
    assert_eq!(image.rgb(16, 10), RED);
}

// ============================================================================
// Painters
// ============================================================================

#[test]
fn test_bitmap_painter_samples_widget_relative() {
    // 2x2 ARGB8888, bytes B, G, R, A
    let texels = [
        0, 0, 255, 255, 0, 255, 0, 255, //
        255, 0, 0, 255, 255, 255, 255, 0,
    ];
    let bitmap = Bitmap::new(&texels, 2, 2, PixelFormat::Argb8888).unwrap();

    let mut image = Rgb888Image::new(6, 6);
    let mut cwr = CanvasWidgetRenderer::default();
    let mut widget = CanvasWidget::new(
        rect_shape(0, 0, 3, 3),
        PainterRgb888Bitmap::bitmap(bitmap, 255),
        Rect::new(2, 2, 3, 3),
    );
    draw(&mut image, &mut cwr, &mut widget, Rect::new(0, 0, 3, 3));

    assert_eq!(image.rgb(2, 2), Rgb8::new(255, 0, 0));
    assert_eq!(image.rgb(3, 2), Rgb8::new(0, 255, 0));
    assert_eq!(image.rgb(2, 3), Rgb8::new(0, 0, 255));
    // Transparent texel and pixels past the bitmap are left alone
    assert!(image.untouched(3, 3));
    assert!(image.untouched(4, 2));
    assert!(image.untouched(2, 4));
}

#[test]
fn test_gray4_widget_at_odd_column() {
    let mut data = vec![0u8; 4 * 2];
    {
        let mut fb = Framebuffer::packed(&mut data, 8, 2, PixelFormat::Gray4).unwrap();
        let mut cwr = CanvasWidgetRenderer::default();
        let mut widget = CanvasWidget::new(
            rect_shape(0, 0, 2, 1),
            PainterGray4::solid(Gray8::WHITE, 255),
            Rect::new(1, 0, 2, 2),
        );
        widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 2, 2)).unwrap();
    }
    assert_eq!(data, vec![0x0F, 0xF0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_incompatible_painter_touches_nothing() {
    let mut image = Rgb888Image::new(4, 4);
    let mut cwr = CanvasWidgetRenderer::default();
    let mut widget = CanvasWidget::new(
        rect_shape(0, 0, 4, 4),
        PainterGray4::solid(Gray8::WHITE, 255),
        Rect::new(0, 0, 4, 4),
    );
    let mut fb = image.framebuffer();
    assert!(widget.draw(&mut cwr, &mut fb, Rect::new(0, 0, 4, 4)).is_err());
    assert!(image.data.iter().all(|&b| b == 0));
}

// ============================================================================
// Canvas
// ============================================================================

#[test]
fn test_canvas_driven_directly() {
    let mut image = Rgb888Image::new(8, 8);
    let mut cwr = CanvasWidgetRenderer::default();
    let mut painter = PainterRgb888::solid(RED, 255);
    {
        let mut fb = image.framebuffer();
        let mut canvas =
            Canvas::new(&mut cwr, &mut fb, Rect::new(0, 0, 8, 8), Rect::new(0, 0, 8, 8)).unwrap();
        canvas.move_to(Q5::from_int(2), Q5::from_int(2));
        canvas.line_to(Q5::from_int(6), Q5::from_int(2));
        canvas.line_to(Q5::from_int(6), Q5::from_int(6));
        canvas.line_to(Q5::from_int(2), Q5::from_int(6));
        canvas.render(&mut painter, 255).unwrap();
    }
    assert_eq!(image.rgb(2, 2), RED);
    assert_eq!(image.rgb(5, 5), RED);
    assert!(image.untouched(6, 6));
    assert!(cwr.memory_report().max_cells_used > 0);
}
