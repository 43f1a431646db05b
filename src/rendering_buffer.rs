//! Rendering buffers: row-oriented access to packed pixel data.
//!
//! - [`Framebuffer`]: the caller-owned destination surface, borrowed for
//!   the duration of a draw
//! - [`RenderingBuffer`]: a view of a sub-rectangle of a framebuffer whose
//!   row 0 / column 0 is the top-left corner of the render region
//!
//! For layouts with several pixels per byte, a sub-rectangle rarely starts
//! on a byte boundary. Its rows then start at the byte holding the first
//! pixel, and [`RenderingBuffer::x_adjust`] gives that pixel's index inside
//! the byte.

use crate::basics::Rect;
use crate::error::{RenderError, Result};
use crate::pixfmt::PixelFormat;

// ============================================================================
// Framebuffer
// ============================================================================

/// Caller-owned destination pixels.
pub struct Framebuffer<'a> {
    data: &'a mut [u8],
    width: i32,
    height: i32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> Framebuffer<'a> {
    /// Wrap `data` as a `width` x `height` surface with `stride` bytes per
    /// row.
    pub fn new(
        data: &'a mut [u8],
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let width = width.max(0);
        let height = height.max(0);
        let expected = stride * height as usize;
        if data.len() < expected || stride < format.row_bytes(width as usize) {
            return Err(RenderError::FramebufferTooSmall {
                expected: expected.max(format.row_bytes(width as usize) * height as usize),
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Wrap `data` with rows packed back to back.
    pub fn packed(
        data: &'a mut [u8],
        width: i32,
        height: i32,
        format: PixelFormat,
    ) -> Result<Self> {
        let stride = format.row_bytes(width.max(0) as usize);
        Self::new(data, width, height, stride, format)
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
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole surface as a rectangle at the origin.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Borrow the pixels of `area`, which is clipped to the surface.
    pub fn sub_buffer(&mut self, area: Rect) -> RenderingBuffer<'_> {
        let area = area.intersect(&self.rect());
        if area.is_empty() {
            return RenderingBuffer::new(&mut [], 0, 0, self.stride, 0);
        }
        let (byte_offset, x_adjust) = self.format.byte_offset(area.x as usize);
        let start = area.y as usize * self.stride + byte_offset;
        RenderingBuffer::new(
            &mut self.data[start..],
            area.width as u32,
            area.height as u32,
            self.stride,
            x_adjust as i32,
        )
    }
}

// ============================================================================
// RenderingBuffer
// ============================================================================

/// Row accessor over a region of packed pixels.
pub struct RenderingBuffer<'a> {
    buf: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
    x_adjust: i32,
}

impl<'a> RenderingBuffer<'a> {
    pub fn new(buf: &'a mut [u8], width: u32, height: u32, stride: usize, x_adjust: i32) -> Self {
        Self {
            buf,
            width,
            height,
            stride,
            x_adjust,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Index, within the first byte of each row, of the region's column 0.
    #[inline]
    pub fn x_adjust(&self) -> i32 {
        self.x_adjust
    }

    /// Mutable bytes of row `y`, from the region's first byte to the end of
    /// the framebuffer row.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride;
        let end = (start + self.stride).min(self.buf.len());
        &mut self.buf[start..end]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_validates_size() {
        let mut data = vec![0u8; 10];
        let err = Framebuffer::new(&mut data, 4, 4, 4, PixelFormat::Rgb565).err();
        assert!(matches!(err, Some(RenderError::FramebufferTooSmall { .. })));
        let mut data = vec![0u8; 32];
        assert!(Framebuffer::new(&mut data, 4, 4, 8, PixelFormat::Rgb565).is_ok());
    }

    #[test]
    fn test_packed_stride() {
        let mut data = vec![0u8; 6];
        let fb = Framebuffer::packed(&mut data, 10, 3, PixelFormat::Bw).unwrap();
        assert_eq!(fb.stride(), 2);
        assert_eq!(fb.rect(), Rect::new(0, 0, 10, 3));
    }

    #[test]
    fn test_sub_buffer_byte_format() {
        let mut data = vec![0u8; 4 * 3 * 4];
        let mut fb = Framebuffer::packed(&mut data, 4, 4, PixelFormat::Rgb888).unwrap();
        {
            let mut rbuf = fb.sub_buffer(Rect::new(1, 2, 2, 2));
            assert_eq!(rbuf.width(), 2);
            assert_eq!(rbuf.x_adjust(), 0);
            rbuf.row_mut(1)[0] = 0xAB;
        }
        assert_eq!(fb.data()[3 * 12 + 3], 0xAB);
    }

    #[test]
    fn test_sub_buffer_sub_byte_format() {
        let mut data = vec![0u8; 4 * 2];
        let mut fb = Framebuffer::packed(&mut data, 16, 2, PixelFormat::Gray2).unwrap();
        {
            let mut rbuf = fb.sub_buffer(Rect::new(6, 1, 4, 1));
            assert_eq!(rbuf.x_adjust(), 2);
            assert_eq!(rbuf.row_mut(0).len(), 3);
            rbuf.row_mut(0)[0] = 0xFF;
        }
        assert_eq!(fb.data()[4 + 1], 0xFF);
    }

    #[test]
    fn test_sub_buffer_clips_to_surface() {
        let mut data = vec![0u8; 16];
        let mut fb = Framebuffer::packed(&mut data, 4, 4, PixelFormat::Abgr2222).unwrap();
        let rbuf = fb.sub_buffer(Rect::new(2, 2, 10, 10));
        assert_eq!((rbuf.width(), rbuf.height()), (2, 2));
        let empty = fb.sub_buffer(Rect::new(5, 5, 2, 2));
        assert_eq!(empty.height(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_row_out_of_bounds_panics() {
        let mut data = vec![0u8; 4];
        let mut rbuf = RenderingBuffer::new(&mut data, 4, 1, 4, 0);
        rbuf.row_mut(1);
    }
}
