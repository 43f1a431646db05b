//! Painters: turn scanline coverage into framebuffer pixels.
//!
//! A painter pairs a [`PixelPacker`] (how pixels are stored) with a
//! [`ColorSource`] (what color each pixel should get). The scanline renderer
//! only sees the object-safe [`Painter`] trait, so one widget can hold any
//! combination behind a `Box<dyn Painter>`.
//!
//! Every painted pixel goes through the same arithmetic:
//!
//! ```text
//! combined = div255(cover * div255(source_alpha * widget_alpha))
//! ```
//!
//! A combined alpha of 255 overwrites the pixel, 0 leaves it alone, and
//! anything in between is handed to the packer's blend.

use core::marker::PhantomData;

use crate::basics::div255;
use crate::bitmap::Bitmap;
use crate::color::{Gray8, Rgb8, Rgba8};
use crate::pixfmt::{PixelFormat, PixelPacker};
use crate::pixfmt_gray::{Bw, Gray2, Gray4};
use crate::pixfmt_rgb::{Rgb565, Rgb888};
use crate::pixfmt_rgba::{Abgr2222, Argb2222, Argb8888, Bgra2222, Rgba2222};
use crate::span_bitmap::BitmapSource;
use crate::span_solid::SolidColor;

// ============================================================================
// Painter trait
// ============================================================================

/// Receives the coverage of one span and writes it to a framebuffer row.
pub trait Painter {
    /// Layout of the framebuffers this painter can write.
    fn pixel_format(&self) -> PixelFormat;

    /// Position of the render region's top-left pixel in widget
    /// coordinates. Color sources sample at `(x + offset_x, y + offset_y)`.
    fn set_offset(&mut self, x: i32, y: i32);

    /// Alpha of the widget, applied on top of each source's own alpha.
    fn set_widget_alpha(&mut self, alpha: u8);

    /// Paint `covers.len()` pixels of `row`, starting at region column `x`.
    ///
    /// `row` starts at the byte holding region column 0, which is pixel
    /// `x_adjust` of that byte. `y` is the region row.
    fn render(&mut self, row: &mut [u8], x: i32, x_adjust: i32, y: i32, covers: &[u8]);
}

// ============================================================================
// ColorSource trait
// ============================================================================

/// Supplies the color of each painted pixel, in widget coordinates.
pub trait ColorSource {
    type Color;

    /// Called once per span starting at `(x, y)`. Returning `false` skips
    /// the whole span.
    #[inline]
    fn render_init(&mut self, _x: i32, _y: i32) -> bool {
        true
    }

    /// Color and alpha of pixel `(x, y)`, or `None` to leave it untouched.
    fn render_next(&mut self, x: i32, y: i32) -> Option<(Self::Color, u8)>;
}

// ============================================================================
// FormatPainter
// ============================================================================

/// A painter for the layout `P` fed by the color source `S`.
pub struct FormatPainter<P, S> {
    source: S,
    offset_x: i32,
    offset_y: i32,
    widget_alpha: u8,
    _packer: PhantomData<fn() -> P>,
}

impl<P: PixelPacker, S: ColorSource<Color = P::Color>> FormatPainter<P, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset_x: 0,
            offset_y: 0,
            widget_alpha: 255,
            _packer: PhantomData,
        }
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[inline]
    pub fn widget_alpha(&self) -> u8 {
        self.widget_alpha
    }
}

impl<P: PixelPacker> FormatPainter<P, SolidColor<P::Color>> {
    /// Paint a single color with the given painter alpha.
    pub fn solid(color: P::Color, alpha: u8) -> Self {
        Self::new(SolidColor::new(color, alpha))
    }
}

impl<'a, P: PixelPacker> FormatPainter<P, BitmapSource<'a, P::Color>>
where
    P::Color: From<Rgba8>,
{
    /// Paint `bitmap`, placed at the widget origin, with the given painter
    /// alpha.
    pub fn bitmap(bitmap: Bitmap<'a>, alpha: u8) -> Self {
        Self::new(BitmapSource::new(bitmap, alpha))
    }
}

impl<P: PixelPacker, S: ColorSource<Color = P::Color>> Painter for FormatPainter<P, S> {
    #[inline]
    fn pixel_format(&self) -> PixelFormat {
        P::FORMAT
    }

    #[inline]
    fn set_offset(&mut self, x: i32, y: i32) {
        self.offset_x = x;
        self.offset_y = y;
    }

    #[inline]
    fn set_widget_alpha(&mut self, alpha: u8) {
        self.widget_alpha = alpha;
    }

    fn render(&mut self, row: &mut [u8], x: i32, x_adjust: i32, y: i32, covers: &[u8]) {
        let wx = x + self.offset_x;
        let wy = y + self.offset_y;
        if !self.source.render_init(wx, wy) {
            return;
        }
        let first = (x + x_adjust) as usize;
        for (i, &cover) in covers.iter().enumerate() {
            let Some((color, alpha)) = self.source.render_next(wx + i as i32, wy) else {
                continue;
            };
            let alpha = div255(alpha as u32 * self.widget_alpha as u32);
            match div255(cover as u32 * alpha as u32) {
                0 => {}
                255 => P::copy_pixel(row, first + i, color),
                combined => P::blend_pixel(row, first + i, color, combined),
            }
        }
    }
}

// ============================================================================
// Concrete painters
// ============================================================================

pub type PainterBw = FormatPainter<Bw, SolidColor<Gray8>>;
pub type PainterGray2 = FormatPainter<Gray2, SolidColor<Gray8>>;
pub type PainterGray4 = FormatPainter<Gray4, SolidColor<Gray8>>;
pub type PainterRgb565 = FormatPainter<Rgb565, SolidColor<Rgb8>>;
pub type PainterRgb888 = FormatPainter<Rgb888, SolidColor<Rgb8>>;
pub type PainterArgb8888 = FormatPainter<Argb8888, SolidColor<Rgb8>>;
pub type PainterAbgr2222 = FormatPainter<Abgr2222, SolidColor<Rgb8>>;
pub type PainterArgb2222 = FormatPainter<Argb2222, SolidColor<Rgb8>>;
pub type PainterBgra2222 = FormatPainter<Bgra2222, SolidColor<Rgb8>>;
pub type PainterRgba2222 = FormatPainter<Rgba2222, SolidColor<Rgb8>>;

pub type PainterBwBitmap<'a> = FormatPainter<Bw, BitmapSource<'a, Gray8>>;
pub type PainterGray2Bitmap<'a> = FormatPainter<Gray2, BitmapSource<'a, Gray8>>;
pub type PainterGray4Bitmap<'a> = FormatPainter<Gray4, BitmapSource<'a, Gray8>>;
pub type PainterRgb565Bitmap<'a> = FormatPainter<Rgb565, BitmapSource<'a, Rgb8>>;
pub type PainterRgb888Bitmap<'a> = FormatPainter<Rgb888, BitmapSource<'a, Rgb8>>;
pub type PainterArgb8888Bitmap<'a> = FormatPainter<Argb8888, BitmapSource<'a, Rgb8>>;
pub type PainterAbgr2222Bitmap<'a> = FormatPainter<Abgr2222, BitmapSource<'a, Rgb8>>;
pub type PainterArgb2222Bitmap<'a> = FormatPainter<Argb2222, BitmapSource<'a, Rgb8>>;
pub type PainterBgra2222Bitmap<'a> = FormatPainter<Bgra2222, BitmapSource<'a, Rgb8>>;
pub type PainterRgba2222Bitmap<'a> = FormatPainter<Rgba2222, BitmapSource<'a, Rgb8>>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Alternates between a color and a skipped pixel.
    struct Checker {
        inits: usize,
    }

    impl ColorSource for Checker {
        type Color = Rgb8;

        fn render_init(&mut self, _x: i32, _y: i32) -> bool {
            self.inits += 1;
            true
        }

        fn render_next(&mut self, x: i32, _y: i32) -> Option<(Rgb8, u8)> {
            (x % 2 == 0).then_some((Rgb8::WHITE, 255))
        }
    }

    #[test]
    fn test_full_cover_copies_color() {
        let mut painter = PainterRgb888::solid(Rgb8::new(10, 20, 30), 255);
        let mut row = [0u8; 9];
        painter.render(&mut row, 1, 0, 0, &[255, 255]);
        assert_eq!(row, [0, 0, 0, 30, 20, 10, 30, 20, 10]);
    }

    #[test]
    fn test_zero_cover_leaves_pixel() {
        let mut painter = PainterRgb888::solid(Rgb8::WHITE, 255);
        let mut row = [7u8; 3];
        painter.render(&mut row, 0, 0, 0, &[0]);
        assert_eq!(row, [7, 7, 7]);
    }

    #[test]
    fn test_partial_cover_blends() {
        let mut painter = PainterRgb888::solid(Rgb8::WHITE, 255);
        let mut row = [0u8; 3];
        painter.render(&mut row, 0, 0, 0, &[128]);
        assert_eq!(row, [128, 128, 128]);
    }

    #[test]
    fn test_widget_alpha_scales_coverage() {
        let mut painter = PainterRgb888::solid(Rgb8::WHITE, 255);
        painter.set_widget_alpha(0);
        let mut row = [0u8; 3];
        painter.render(&mut row, 0, 0, 0, &[255]);
        assert_eq!(row, [0, 0, 0]);

        painter.set_widget_alpha(51);
        painter.render(&mut row, 0, 0, 0, &[255]);
        assert_eq!(row, [51, 51, 51]);
    }

    #[test]
    fn test_painter_alpha_combines_with_widget_alpha() {
        let mut painter = PainterGray4::solid(Gray8::WHITE, 128);
        painter.set_widget_alpha(128);
        let mut row = [0u8; 1];
        painter.render(&mut row, 0, 0, 0, &[255]);
        // 255 * (128/255) * (128/255) ~= 64, quantized to 4 bits
        assert_eq!(row[0] >> 4, 64 >> 4);
    }

    #[test]
    fn test_x_adjust_shifts_into_byte() {
        let mut painter = PainterBw::solid(Gray8::WHITE, 255);
        let mut row = [0u8; 2];
        painter.render(&mut row, 1, 5, 0, &[255, 255, 255]);
        assert_eq!(row, [0b0000_0011, 0b1000_0000]);
    }

    #[test]
    fn test_skipped_pixels_untouched() {
        let mut painter: FormatPainter<Rgb888, Checker> = FormatPainter::new(Checker { inits: 0 });
        painter.set_offset(10, 0);
        let mut row = [0u8; 12];
        painter.render(&mut row, 0, 0, 0, &[255; 4]);
        assert_eq!(painter.source().inits, 1);
        assert_eq!(&row[0..3], &[255, 255, 255]);
        assert_eq!(&row[3..6], &[0, 0, 0]);
        assert_eq!(&row[6..9], &[255, 255, 255]);
    }

    #[test]
    fn test_pixel_formats_reported() {
        assert_eq!(PainterBw::solid(Gray8::BLACK, 255).pixel_format(), PixelFormat::Bw);
        assert_eq!(PainterRgb565::solid(Rgb8::BLACK, 255).pixel_format(), PixelFormat::Rgb565);
        assert_eq!(
            PainterBgra2222::solid(Rgb8::BLACK, 255).pixel_format(),
            PixelFormat::Bgra2222
        );
    }

    #[test]
    fn test_painter_is_object_safe() {
        let mut painters: Vec<Box<dyn Painter>> = vec![
            Box::new(PainterGray2::solid(Gray8::WHITE, 255)),
            Box::new(PainterArgb8888::solid(Rgb8::WHITE, 255)),
        ];
        let mut row = [0u8; 4];
        painters[1].render(&mut row, 0, 0, 0, &[255]);
        assert_eq!(row, [255, 255, 255, 255]);
        painters[0].set_offset(1, 1);
    }
}
