//! Packers for layouts that carry an alpha channel: 32-bit ARGB and the
//! 8-bit 2222 family.
//!
//! Painted pixels are opaque colors; blending grows the stored alpha
//! toward opaque the way compositing over a transparent layer would.

use core::marker::PhantomData;

use crate::color::{Blend, Rgb8, Rgba8};
use crate::pixfmt::{PixelFormat, PixelPacker};

// ============================================================================
// Argb8888
// ============================================================================

/// 32-bit color stored as blue, green, red, alpha bytes.
pub struct Argb8888;

impl Argb8888 {
    /// Read the pixel including its stored alpha.
    #[inline]
    pub fn pixel_rgba(row: &[u8], x: usize) -> Rgba8 {
        let i = x * 4;
        Rgba8::new(row[i + 2], row[i + 1], row[i], row[i + 3])
    }

    #[inline]
    pub fn copy_pixel_rgba(row: &mut [u8], x: usize, c: Rgba8) {
        let i = x * 4;
        row[i..i + 4].copy_from_slice(&[c.b, c.g, c.r, c.a]);
    }
}

impl PixelPacker for Argb8888 {
    type Color = Rgb8;
    const FORMAT: PixelFormat = PixelFormat::Argb8888;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Rgb8 {
        Rgb8::from(Self::pixel_rgba(row, x))
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Rgb8) {
        Self::copy_pixel_rgba(row, x, Rgba8::opaque(c));
    }

    #[inline]
    fn blend_pixel(row: &mut [u8], x: usize, c: Rgb8, alpha: u8) {
        let dst = Self::pixel_rgba(row, x);
        Self::copy_pixel_rgba(row, x, Rgba8::opaque(c).blend(dst, alpha));
    }
}

// ============================================================================
// 2222 component orders
// ============================================================================

/// Bit positions of the 2-bit channels in an 8-bit pixel.
pub trait Order2222 {
    const R: u32;
    const G: u32;
    const B: u32;
    const A: u32;
    const FORMAT: PixelFormat;
}

/// `AABBGGRR`
pub struct OrderAbgr;
impl Order2222 for OrderAbgr {
    const R: u32 = 0;
    const G: u32 = 2;
    const B: u32 = 4;
    const A: u32 = 6;
    const FORMAT: PixelFormat = PixelFormat::Abgr2222;
}

/// `AARRGGBB`
pub struct OrderArgb;
impl Order2222 for OrderArgb {
    const R: u32 = 4;
    const G: u32 = 2;
    const B: u32 = 0;
    const A: u32 = 6;
    const FORMAT: PixelFormat = PixelFormat::Argb2222;
}

/// `BBGGRRAA`
pub struct OrderBgra;
impl Order2222 for OrderBgra {
    const R: u32 = 2;
    const G: u32 = 4;
    const B: u32 = 6;
    const A: u32 = 0;
    const FORMAT: PixelFormat = PixelFormat::Bgra2222;
}

/// `RRGGBBAA`
pub struct OrderRgba;
impl Order2222 for OrderRgba {
    const R: u32 = 6;
    const G: u32 = 4;
    const B: u32 = 2;
    const A: u32 = 0;
    const FORMAT: PixelFormat = PixelFormat::Rgba2222;
}

// ============================================================================
// Pixfmt2222
// ============================================================================

/// 8-bit pixel with 2 bits per channel in the order given by `O`.
pub struct Pixfmt2222<O: Order2222>(PhantomData<O>);

pub type Abgr2222 = Pixfmt2222<OrderAbgr>;
pub type Argb2222 = Pixfmt2222<OrderArgb>;
pub type Bgra2222 = Pixfmt2222<OrderBgra>;
pub type Rgba2222 = Pixfmt2222<OrderRgba>;

impl<O: Order2222> Pixfmt2222<O> {
    #[inline]
    fn channel(p: u8, shift: u32) -> u8 {
        ((p >> shift) & 0x3) * 0x55
    }

    /// Decode a packed byte, alpha included.
    #[inline]
    pub fn unpack(p: u8) -> Rgba8 {
        Rgba8::new(
            Self::channel(p, O::R),
            Self::channel(p, O::G),
            Self::channel(p, O::B),
            Self::channel(p, O::A),
        )
    }

    /// Encode by keeping the top two bits of each channel.
    #[inline]
    pub fn pack(c: Rgba8) -> u8 {
        ((c.r >> 6) << O::R) | ((c.g >> 6) << O::G) | ((c.b >> 6) << O::B) | ((c.a >> 6) << O::A)
    }
}

impl<O: Order2222> PixelPacker for Pixfmt2222<O> {
    type Color = Rgb8;
    const FORMAT: PixelFormat = O::FORMAT;

    #[inline]
    fn pixel(row: &[u8], x: usize) -> Rgb8 {
        Rgb8::from(Self::unpack(row[x]))
    }

    #[inline]
    fn copy_pixel(row: &mut [u8], x: usize, c: Rgb8) {
        row[x] = Self::pack(Rgba8::opaque(c));
    }
}

// ============================================================================
// Tests
// ============================================================================
