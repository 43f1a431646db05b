//! Bitmap color source.
//!
//! Samples a [`Bitmap`] placed at the widget origin. Spans that start
//! outside the bitmap are skipped, pixels past its right edge and fully
//! transparent texels are left untouched.

use core::marker::PhantomData;

use crate::basics::div255;
use crate::bitmap::Bitmap;
use crate::color::Rgba8;
use crate::painter::ColorSource;

/// Paints the texels of a bitmap, converted to the destination color `C`.
pub struct BitmapSource<'a, C> {
    bitmap: Bitmap<'a>,
    alpha: u8,
    _color: PhantomData<fn() -> C>,
}

impl<'a, C: From<Rgba8>> BitmapSource<'a, C> {
    pub fn new(bitmap: Bitmap<'a>, alpha: u8) -> Self {
        Self {
            bitmap,
            alpha,
            _color: PhantomData,
        }
    }

    pub fn set_bitmap(&mut self, bitmap: Bitmap<'a>) {
        self.bitmap = bitmap;
    }

    pub fn bitmap(&self) -> &Bitmap<'a> {
        &self.bitmap
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

impl<'a, C: From<Rgba8>> ColorSource for BitmapSource<'a, C> {
    type Color = C;

    fn render_init(&mut self, x: i32, y: i32) -> bool {
        self.alpha != 0 && y >= 0 && y < self.bitmap.height() && x < self.bitmap.width()
    }

    #[inline]
    fn render_next(&mut self, x: i32, y: i32) -> Option<(C, u8)> {
        if !self.bitmap.contains(x, y) {
            return None;
        }
        let texel = self.bitmap.texel(x, y);
        if texel.is_transparent() {
            return None;
        }
        let alpha = div255(texel.a as u32 * self.alpha as u32);
        Some((C::from(texel), alpha))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Gray8, Rgb8};
    use crate::pixfmt::PixelFormat;

    fn two_by_two() -> [u8; 16] {
        // B, G, R, A
        [
            0, 0, 255, 255, 0, 255, 0, 128, //
            255, 0, 0, 0, 255, 255, 255, 255,
        ]
    }

    #[test]
    fn test_samples_texels() {
        let data = two_by_two();
        let bmp = Bitmap::new(&data, 2, 2, PixelFormat::Argb8888).unwrap();
        let mut src: BitmapSource<'_, Rgb8> = BitmapSource::new(bmp, 255);
        assert!(src.render_init(0, 0));
        assert_eq!(src.render_next(0, 0), Some((Rgb8::new(255, 0, 0), 255)));
        assert_eq!(src.render_next(1, 0), Some((Rgb8::new(0, 255, 0), 128)));
    }

    #[test]
    fn test_transparent_texel_skipped() {
        let data = two_by_two();
        let bmp = Bitmap::new(&data, 2, 2, PixelFormat::Argb8888).unwrap();
        let mut src: BitmapSource<'_, Rgb8> = BitmapSource::new(bmp, 255);
        assert_eq!(src.render_next(0, 1), None);
    }

    #[test]
    fn test_painter_alpha_scales_texel_alpha() {
        let data = two_by_two();
        let bmp = Bitmap::new(&data, 2, 2, PixelFormat::Argb8888).unwrap();
        let mut src: BitmapSource<'_, Rgb8> = BitmapSource::new(bmp, 128);
        assert_eq!(src.render_next(1, 1), Some((Rgb8::WHITE, 128)));
        assert_eq!(src.render_next(1, 0).map(|(_, a)| a), Some(64));
    }

    #[test]
    fn test_outside_bitmap() {
        let data = two_by_two();
        let bmp = Bitmap::new(&data, 2, 2, PixelFormat::Argb8888).unwrap();
        let mut src: BitmapSource<'_, Rgb8> = BitmapSource::new(bmp, 255);
        assert!(!src.render_init(2, 0));
        assert!(!src.render_init(0, 2));
        assert!(!src.render_init(0, -1));
        assert!(src.render_init(-3, 1));
        assert_eq!(src.render_next(-1, 1), None);
        assert_eq!(src.render_next(2, 1), None);
    }

    #[test]
    fn test_converts_to_gray() {
        let data = [0xFF];
        let bmp = Bitmap::new(&data, 1, 1, PixelFormat::Rgba2222).unwrap();
        let mut src: BitmapSource<'_, Gray8> = BitmapSource::new(bmp, 255);
        assert_eq!(src.render_next(0, 0), Some((Gray8::WHITE, 255)));
    }

    #[test]
    fn test_zero_alpha_skips_span() {
        let data = two_by_two();
        let bmp = Bitmap::new(&data, 2, 2, PixelFormat::Argb8888).unwrap();
        let mut src: BitmapSource<'_, Rgb8> = BitmapSource::new(bmp, 0);
        assert!(!src.render_init(0, 0));
    }
}
