//! Monochrome and low-depth grayscale packers.
//!
//! All three layouts store several pixels per byte with the leftmost pixel
//! in the most significant bits. Colors are handled as 8-bit luminance and
//! quantized on write by keeping the top bits, so a level expanded with
//! [`Gray8::from_level`] packs back to itself.

use crate::color::Gray8;
use crate::pixfmt::{PixelFormat, PixelPacker};

// ============================================================================
// Bw: 1 bit per pixel
// ============================================================================

/// 1 bpp monochrome. Partial coverage is thresholded instead of blended.
pub struct Bw;

impl Bw {
    #[inline]
    fn bit(x: usize) -> u8 {
        0x80 >> (x & 7)
    }
}

impl PixelPacker for Bw {
    type Color = Gray8;
    const FORMAT: PixelFormat = PixelFormat::Bw;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Gray8 {
        if row[x >> 3] & Self::bit(x) != 0 {
            Gray8::WHITE
        } else {
            Gray8::BLACK
        }
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Gray8) {
        if c.level(1) != 0 {
            row[x >> 3] |= Self::bit(x);
        } else {
            row[x >> 3] &= !Self::bit(x);
        }
    }

    #[inline]
    fn blend_pixel(row: &mut [u8], x: usize, c: Gray8, alpha: u8) {
        if alpha >= 0x80 {
            Self::copy_pixel(row, x, c);
        }
    }
}

// ============================================================================
// Gray2: 2 bits per pixel
// ============================================================================

/// 2 bpp grayscale, four pixels per byte.
pub struct Gray2;

impl Gray2 {
    #[inline]
    fn shift(x: usize) -> u32 {
        ((3 - (x & 3)) << 1) as u32
    }
}

impl PixelPacker for Gray2 {
    type Color = Gray8;
    const FORMAT: PixelFormat = PixelFormat::Gray2;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Gray8 {
        Gray8::from_level((row[x >> 2] >> Self::shift(x)) & 0x3, 2)
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Gray8) {
        let shift = Self::shift(x);
        let p = &mut row[x >> 2];
        *p = (*p & !(0x3 << shift)) | (c.level(2) << shift);
    }
}

// ============================================================================
// Gray4: 4 bits per pixel
// ============================================================================

/// 4 bpp grayscale, two pixels per byte.
pub struct Gray4;

impl Gray4 {
    #[inline]
    fn shift(x: usize) -> u32 {
        if x & 1 == 0 {
            4
        } else {
            0
        }
    }
}

impl PixelPacker for Gray4 {
    type Color = Gray8;
    const FORMAT: PixelFormat = PixelFormat::Gray4;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Gray8 {
        Gray8::from_level((row[x >> 1] >> Self::shift(x)) & 0xF, 4)
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Gray8) {
        let shift = Self::shift(x);
        let p = &mut row[x >> 1];
        *p = (*p & !(0xF << shift)) | (c.level(4) << shift);
    }
}

// ============================================================================
// Tests
// ============================================================================
