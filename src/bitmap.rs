//! Borrowed bitmaps that painters can sample.
//!
//! A [`Bitmap`] wraps caller-owned pixel data in one of the framebuffer
//! layouts, or as 8-bit indices into a palette. Rows are packed back to
//! back. Every texel decodes to [`Rgba8`]; formats without alpha decode as
//! opaque.

use crate::color::{Gray8, Rgba8};
use crate::error::{RenderError, Result};
use crate::pixfmt::{PixelFormat, PixelPacker};
use crate::pixfmt_gray::{Bw, Gray2, Gray4};
use crate::pixfmt_rgb::Rgb565;
use crate::pixfmt_rgba::{Abgr2222, Argb2222, Argb8888, Bgra2222, Rgba2222};

// ============================================================================
// BitmapFormat
// ============================================================================

/// Storage layout of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapFormat {
    /// A framebuffer layout.
    Direct(PixelFormat),
    /// 8-bit indices into a palette of blue, green, red byte triples.
    L8Rgb888,
    /// 8-bit indices into a palette of blue, green, red, alpha byte quads.
    L8Argb8888,
}

impl BitmapFormat {
    /// Bytes needed for one row of `width` texels.
    pub const fn row_bytes(self, width: usize) -> usize {
        match self {
            BitmapFormat::Direct(format) => format.row_bytes(width),
            BitmapFormat::L8Rgb888 | BitmapFormat::L8Argb8888 => width,
        }
    }

    /// Bytes per palette entry, or 0 for direct layouts.
    pub const fn palette_entry_bytes(self) -> usize {
        match self {
            BitmapFormat::Direct(_) => 0,
            BitmapFormat::L8Rgb888 => 3,
            BitmapFormat::L8Argb8888 => 4,
        }
    }
}

impl From<PixelFormat> for BitmapFormat {
    fn from(format: PixelFormat) -> Self {
        BitmapFormat::Direct(format)
    }
}

// ============================================================================
// Bitmap
// ============================================================================

/// Caller-owned image data.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: i32,
    height: i32,
    format: BitmapFormat,
    alpha: Option<&'a [u8]>,
    palette: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap `data` holding `height` packed rows of `width` texels.
    pub fn new(
        data: &'a [u8],
        width: i32,
        height: i32,
        format: impl Into<BitmapFormat>,
    ) -> Result<Self> {
        let format = format.into();
        let width = width.max(0);
        let height = height.max(0);
        let expected = format.row_bytes(width as usize) * height as usize;
        if data.len() < expected {
            return Err(RenderError::BitmapTooSmall {
                expected,
                actual: data.len(),
            });
        }
        if format.palette_entry_bytes() != 0 {
            return Err(RenderError::InvalidConfig(
                "palette bitmaps are created with Bitmap::with_palette".into(),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            alpha: None,
            palette: &[],
        })
    }

    /// Wrap 8-bit palette indices. Indices past the end of `palette`
    /// decode as transparent.
    pub fn with_palette(
        data: &'a [u8],
        width: i32,
        height: i32,
        format: BitmapFormat,
        palette: &'a [u8],
    ) -> Result<Self> {
        if format.palette_entry_bytes() == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "{format:?} does not use a palette"
            )));
        }
        let width = width.max(0);
        let height = height.max(0);
        let expected = width as usize * height as usize;
        if data.len() < expected {
            return Err(RenderError::BitmapTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            alpha: None,
            palette,
        })
    }

    /// Attach a per-texel alpha plane, one byte per texel. Only RGB565
    /// bitmaps carry one.
    pub fn with_alpha(mut self, alpha: &'a [u8]) -> Result<Self> {
        if self.format != BitmapFormat::Direct(PixelFormat::Rgb565) {
            return Err(RenderError::InvalidConfig(format!(
                "{:?} bitmaps cannot have an alpha plane",
                self.format
            )));
        }
        let expected = self.width as usize * self.height as usize;
        if alpha.len() < expected {
            return Err(RenderError::BitmapTooSmall {
                expected,
                actual: alpha.len(),
            });
        }
        self.alpha = Some(alpha);
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> BitmapFormat {
        self.format
    }

    #[inline]
    pub fn has_alpha_plane(&self) -> bool {
        self.alpha.is_some()
    }

    /// Whether `(x, y)` lies inside the bitmap.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Decode the texel at `(x, y)`. The caller checks [`Bitmap::contains`].
    pub fn texel(&self, x: i32, y: i32) -> Rgba8 {
        let (x, y) = (x as usize, y as usize);
        let row_bytes = self.format.row_bytes(self.width as usize);
        let row = &self.data[y * row_bytes..(y + 1) * row_bytes];
        match self.format {
            BitmapFormat::Direct(format) => self.direct_texel(format, row, x, y),
            BitmapFormat::L8Rgb888 | BitmapFormat::L8Argb8888 => self.palette_texel(row[x]),
        }
    }

    fn direct_texel(&self, format: PixelFormat, row: &[u8], x: usize, y: usize) -> Rgba8 {
        let gray = |g: Gray8| Rgba8::gray(g.v, 255);
        match format {
            PixelFormat::Bw => gray(Bw::pixel(row, x)),
            PixelFormat::Gray2 => gray(Gray2::pixel(row, x)),
            PixelFormat::Gray4 => gray(Gray4::pixel(row, x)),
            PixelFormat::Rgb565 => {
                let p = u16::from_le_bytes([row[x * 2], row[x * 2 + 1]]);
                let alpha = match self.alpha {
                    Some(plane) => plane[y * self.width as usize + x],
                    None => 255,
                };
                let c = Rgb565::unpack_expanded(p);
                Rgba8::new(c.r, c.g, c.b, alpha)
            }
            PixelFormat::Rgb888 => Rgba8::new(row[x * 3 + 2], row[x * 3 + 1], row[x * 3], 255),
            PixelFormat::Argb8888 => Argb8888::pixel_rgba(row, x),
            PixelFormat::Abgr2222 => Abgr2222::unpack(row[x]),
            PixelFormat::Argb2222 => Argb2222::unpack(row[x]),
            PixelFormat::Bgra2222 => Bgra2222::unpack(row[x]),
            PixelFormat::Rgba2222 => Rgba2222::unpack(row[x]),
        }
    }

    fn palette_texel(&self, index: u8) -> Rgba8 {
        let size = self.format.palette_entry_bytes();
        let start = index as usize * size;
        match self.palette.get(start..start + size) {
            Some(&[b, g, r]) => Rgba8::new(r, g, b, 255),
            Some(&[b, g, r, a]) => Rgba8::new(r, g, b, a),
            _ => Rgba8::new(0, 0, 0, 0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
