//! Solid color source.
//!
//! The simplest color source: every pixel gets the same color and the same
//! painter alpha.

use crate::painter::ColorSource;

// ============================================================================
// SolidColor
// ============================================================================

/// Fills every pixel with one color at a fixed alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidColor<C> {
    color: C,
    alpha: u8,
}

impl<C: Copy> SolidColor<C> {
    pub fn new(color: C, alpha: u8) -> Self {
        Self { color, alpha }
    }

    pub fn set_color(&mut self, color: C) {
        self.color = color;
    }

    pub fn color(&self) -> C {
        self.color
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

impl<C: Copy> ColorSource for SolidColor<C> {
    type Color = C;

    #[inline]
    fn render_init(&mut self, _x: i32, _y: i32) -> bool {
        self.alpha != 0
    }

    #[inline]
    fn render_next(&mut self, _x: i32, _y: i32) -> Option<(C, u8)> {
        Some((self.color, self.alpha))
    }
}

// ============================================================================
// Tests
// ============================================================================
