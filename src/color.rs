//! Color types and blend arithmetic.
//!
//! Painters work in 8 bits per channel regardless of the framebuffer depth:
//! - `Rgb8`: opaque RGB, used by every RGB destination format
//! - `Rgba8`: RGB plus alpha, the common texel type for bitmaps
//! - `Gray8`: 8-bit luminance, used by the gray and monochrome formats
//!
//! Pixel packers quantize to and expand from the native depth.

use crate::basics::div255;

// ============================================================================
// Blend
// ============================================================================

/// Linear interpolation from `dst` toward `src` by `alpha / 255`.
#[inline]
pub fn lerp(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    div255(src as u32 * a + dst as u32 * (255 - a))
}

/// A color that can be mixed over another color of the same type.
pub trait Blend: Copy {
    /// Mix `self` over `dst` with `alpha` in `0..=255`.
    fn blend(self, dst: Self, alpha: u8) -> Self;
}

// ============================================================================
// Rgb8
// ============================================================================

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Perceptual luminance with weights 77/150/29 (sum 256).
    #[inline]
    pub fn luminance(&self) -> u8 {
        ((self.r as u32 * 77 + self.g as u32 * 150 + self.b as u32 * 29) >> 8) as u8
    }
}

impl Blend for Rgb8 {
    #[inline]
    fn blend(self, dst: Self, alpha: u8) -> Self {
        Rgb8::new(
            lerp(self.r, dst.r, alpha),
            lerp(self.g, dst.g, alpha),
            lerp(self.b, dst.b, alpha),
        )
    }
}

impl From<Rgba8> for Rgb8 {
    #[inline]
    fn from(c: Rgba8) -> Self {
        Rgb8::new(c.r, c.g, c.b)
    }
}

// ============================================================================
// Rgba8
// ============================================================================

/// 8-bit RGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(c: Rgb8) -> Self {
        Self::new(c.r, c.g, c.b, 255)
    }

    pub const fn gray(v: u8, a: u8) -> Self {
        Self::new(v, v, v, a)
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Blend for Rgba8 {
    /// Source-over: color channels mix by `alpha`, destination alpha grows
    /// toward opaque as `a + alpha - a * alpha`.
    #[inline]
    fn blend(self, dst: Self, alpha: u8) -> Self {
        Rgba8::new(
            lerp(self.r, dst.r, alpha),
            lerp(self.g, dst.g, alpha),
            lerp(self.b, dst.b, alpha),
            (dst.a as u32 + alpha as u32 - div255(dst.a as u32 * alpha as u32) as u32) as u8,
        )
    }
}

// ============================================================================
// Gray8
// ============================================================================

/// 8-bit luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gray8 {
    pub v: u8,
}

impl Gray8 {
    pub const BLACK: Gray8 = Gray8::new(0);
    pub const WHITE: Gray8 = Gray8::new(255);

    pub const fn new(v: u8) -> Self {
        Self { v }
    }

    /// Expand a native gray level of `bits` depth to 8 bits.
    pub const fn from_level(level: u8, bits: u32) -> Self {
        let max = (1u32 << bits) - 1;
        Self::new(((level as u32 & max) * 255 / max) as u8)
    }

    /// Quantize to a native gray level of `bits` depth.
    #[inline]
    pub const fn level(&self, bits: u32) -> u8 {
        self.v >> (8 - bits)
    }
}

impl Blend for Gray8 {
    #[inline]
    fn blend(self, dst: Self, alpha: u8) -> Self {
        Gray8::new(lerp(self.v, dst.v, alpha))
    }
}

impl From<Rgba8> for Gray8 {
    #[inline]
    fn from(c: Rgba8) -> Self {
        Gray8::new(Rgb8::from(c).luminance())
    }
}

impl From<Rgb8> for Gray8 {
    #[inline]
    fn from(c: Rgb8) -> Self {
        Gray8::new(c.luminance())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(200, 10, 255), 200);
        assert_eq!(lerp(200, 10, 0), 10);
        let mid = lerp(255, 0, 128);
        assert!((127..=129).contains(&mid), "got {mid}");
    }

    #[test]
    fn test_rgb8_blend_full_alpha_is_source() {
        let src = Rgb8::new(12, 200, 99);
        let dst = Rgb8::new(250, 1, 7);
        assert_eq!(src.blend(dst, 255), src);
        assert_eq!(src.blend(dst, 0), dst);
    }

    #[test]
    fn test_rgba8_blend_alpha_accumulates() {
        let src = Rgba8::new(255, 0, 0, 255);
        let dst = Rgba8::new(0, 0, 255, 0);
        let out = src.blend(dst, 128);
        assert_eq!(out.a, 128);
        let out = src.blend(Rgba8::new(0, 0, 0, 255), 128);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        for v in [0u8, 1, 85, 128, 170, 254, 255] {
            assert_eq!(Rgb8::new(v, v, v).luminance(), v);
            assert_eq!(Gray8::from(Rgba8::gray(v, 255)).v, v);
        }
    }

    #[test]
    fn test_gray_levels() {
        assert_eq!(Gray8::from_level(3, 2), Gray8::new(255));
        assert_eq!(Gray8::from_level(1, 2), Gray8::new(85));
        assert_eq!(Gray8::from_level(7, 4), Gray8::new(119));
        assert_eq!(Gray8::new(170).level(2), 2);
        assert_eq!(Gray8::new(0xEE).level(4), 14);
        assert_eq!(Gray8::new(255).level(1), 1);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb8::from_hex(0x12_34_56), Rgb8::new(0x12, 0x34, 0x56));
    }
}
