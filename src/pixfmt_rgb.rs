//! Opaque RGB packers: 16-bit 565 and 24-bit 888.

use crate::color::Rgb8;
use crate::pixfmt::{PixelFormat, PixelPacker};

// ============================================================================
// Rgb565
// ============================================================================

/// 16-bit RGB, `RRRRRGGGGGGBBBBB`, stored little-endian.
pub struct Rgb565;

impl Rgb565 {
    pub const RMASK: u16 = 0xF800;
    pub const GMASK: u16 = 0x07E0;
    pub const BMASK: u16 = 0x001F;

    /// Pack by keeping the top 5/6/5 bits of each channel.
    #[inline]
    pub fn pack(c: Rgb8) -> u16 {
        (((c.r as u16) << 8) & Self::RMASK)
            | (((c.g as u16) << 3) & Self::GMASK)
            | ((c.b as u16) >> 3)
    }

    /// Unpack into the top bits of each channel, leaving the low bits clear.
    #[inline]
    pub fn unpack(p: u16) -> Rgb8 {
        Rgb8::new(
            ((p & Self::RMASK) >> 8) as u8,
            ((p & Self::GMASK) >> 3) as u8,
            ((p & Self::BMASK) << 3) as u8,
        )
    }

    /// Unpack and replicate the high bits into the low bits, so full
    /// intensity maps to 255.
    #[inline]
    pub fn unpack_expanded(p: u16) -> Rgb8 {
        let c = Self::unpack(p);
        Rgb8::new(c.r | (c.r >> 5), c.g | (c.g >> 6), c.b | (c.b >> 5))
    }
}

impl PixelPacker for Rgb565 {
    type Color = Rgb8;
    const FORMAT: PixelFormat = PixelFormat::Rgb565;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Rgb8 {
        let i = x * 2;
        Self::unpack(u16::from_le_bytes([row[i], row[i + 1]]))
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Rgb8) {
        let i = x * 2;
        row[i..i + 2].copy_from_slice(&Self::pack(c).to_le_bytes());
    }
}

// ============================================================================
// Rgb888
// ============================================================================

/// 24-bit RGB stored as blue, green, red bytes.
pub struct Rgb888;

impl PixelPacker for Rgb888 {
    type Color = Rgb8;
    const FORMAT: PixelFormat = PixelFormat::Rgb888;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Rgb8 {
        let i = x * 3;
        Rgb8::new(row[i + 2], row[i + 1], row[i])
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Rgb8) {
        let i = x * 3;
        row[i] = c.b;
        row[i + 1] = c.g;
        row[i + 2] = c.r;
    }
}

// ============================================================================
// Tests
// ============================================================================
