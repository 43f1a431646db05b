//! Destination pixel layouts.
//!
//! [`PixelFormat`] names a framebuffer layout and knows its addressing.
//! [`PixelPacker`] is implemented by one zero-sized type per layout and
//! converts between packed bytes and an 8-bit-per-channel color.
//!
//! Packers address pixels inside a single row slice. For formats with
//! several pixels per byte, the row slice starts at the byte holding the
//! first pixel of the render region and `x` already includes the sub-byte
//! adjustment (see [`PixelFormat::byte_offset`]).

use crate::color::Blend;

// ============================================================================
// PixelFormat
// ============================================================================

/// Framebuffer pixel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 1 bit per pixel, most significant bit leftmost.
    Bw,
    /// 2-bit gray, four pixels per byte, leftmost in the high bits.
    Gray2,
    /// 4-bit gray, two pixels per byte, leftmost in the high nibble.
    Gray4,
    /// 16-bit `RRRRRGGGGGGBBBBB`, little-endian.
    Rgb565,
    /// 24-bit, bytes stored blue, green, red.
    Rgb888,
    /// 32-bit, bytes stored blue, green, red, alpha.
    Argb8888,
    /// 8-bit `AABBGGRR`.
    Abgr2222,
    /// 8-bit `AARRGGBB`.
    Argb2222,
    /// 8-bit `BBGGRRAA`.
    Bgra2222,
    /// 8-bit `RRGGBBAA`.
    Rgba2222,
}

impl PixelFormat {
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Bw => 1,
            PixelFormat::Gray2 => 2,
            PixelFormat::Gray4 => 4,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb888 => 24,
            PixelFormat::Argb8888 => 32,
            PixelFormat::Abgr2222
            | PixelFormat::Argb2222
            | PixelFormat::Bgra2222
            | PixelFormat::Rgba2222 => 8,
        }
    }

    /// Pixels sharing one byte (1 for byte-aligned formats).
    #[inline]
    pub const fn pixels_per_byte(self) -> u32 {
        let bpp = self.bits_per_pixel();
        if bpp < 8 {
            8 / bpp
        } else {
            1
        }
    }

    /// Byte offset of pixel column `x` within a row, and the index of that
    /// pixel inside the addressed byte.
    #[inline]
    pub const fn byte_offset(self, x: usize) -> (usize, usize) {
        let bpp = self.bits_per_pixel() as usize;
        if bpp < 8 {
            let ppb = 8 / bpp;
            (x / ppb, x % ppb)
        } else {
            (x * (bpp / 8), 0)
        }
    }

    /// Minimum bytes needed to hold `width` pixels.
    #[inline]
    pub const fn row_bytes(self, width: usize) -> usize {
        (width * self.bits_per_pixel() as usize + 7) / 8
    }
}

// ============================================================================
// PixelPacker
// ============================================================================

/// Read, write and blend single pixels of one layout.
pub trait PixelPacker {
    /// Working color of this layout.
    type Color: Blend;

    /// Layout produced by this packer.
    const FORMAT: PixelFormat;

    /// Unpack pixel `x` of `row`.
    fn pixel(row: &[u8], x: usize) -> Self::Color;

    /// Overwrite pixel `x` of `row`.
    fn copy_pixel(row: &mut [u8], x: usize, c: Self::Color);

    /// Mix `c` over pixel `x` with `alpha` in `1..=254`.
    #[inline]
    fn blend_pixel(row: &mut [u8], x: usize, c: Self::Color, alpha: u8) {
        let dst = Self::pixel(row, x);
        Self::copy_pixel(row, x, c.blend(dst, alpha));
    }
}

// ============================================================================
// Tests
// ============================================================================
