//! Error types for rasterization and drawing.

use thiserror::Error;

use crate::pixfmt::PixelFormat;

/// Result type alias using [`RenderError`].
pub type Result<T> = std::result::Result<T, RenderError>;

/// Signals that the cell pool ran out of capacity during a pass.
///
/// Recoverable: the draw controller answers it by splitting the region into
/// fewer rows and retrying.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cell pool exhausted after {capacity} cells")]
pub struct PoolExhausted {
    /// Capacity of the pool that overflowed.
    pub capacity: usize,
}

/// Errors surfaced by drawing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Even a single row of the outline needs more cells than the pool holds.
    #[error("outline too complex to rasterize row {y} with the available cell memory")]
    OutlineTooComplex {
        /// Framebuffer row that could not be rendered.
        y: i32,
    },

    /// The painter writes a different pixel layout than the framebuffer uses.
    #[error("painter writes {painter:?} pixels but the framebuffer is {framebuffer:?}")]
    IncompatiblePainter {
        /// Format produced by the painter.
        painter: PixelFormat,
        /// Format of the destination buffer.
        framebuffer: PixelFormat,
    },

    /// The scratch memory cannot hold a scanline of the requested width.
    #[error("scanline of width {width} does not fit in renderer memory (max {max})")]
    ScanlineTooWide {
        /// Requested width in pixels.
        width: i32,
        /// Widest scanline the configured memory supports.
        max: i32,
    },

    /// Renderer configuration rejected by validation.
    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),

    /// Bitmap pixel data is shorter than its declared dimensions require.
    #[error("bitmap data holds {actual} bytes, {expected} required")]
    BitmapTooSmall {
        /// Bytes needed for the declared size and format.
        expected: usize,
        /// Bytes provided.
        actual: usize,
    },

    /// Framebuffer memory is shorter than `stride * height`.
    #[error("framebuffer data holds {actual} bytes, {expected} required")]
    FramebufferTooSmall {
        /// Bytes needed for the declared size and stride.
        expected: usize,
        /// Bytes provided.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::OutlineTooComplex { y: 12 };
        assert!(err.to_string().contains("row 12"));

        let err = RenderError::IncompatiblePainter {
            painter: PixelFormat::Rgb565,
            framebuffer: PixelFormat::Argb8888,
        };
        let msg = err.to_string();
        assert!(msg.contains("Rgb565"));
        assert!(msg.contains("Argb8888"));

        let err = RenderError::ScanlineTooWide { width: 900, max: 400 };
        assert!(err.to_string().contains("900"));
    }

    #[test]
    fn test_pool_exhausted_display() {
        let err = PoolExhausted { capacity: 64 };
        assert_eq!(err.to_string(), "cell pool exhausted after 64 cells");
    }
}
