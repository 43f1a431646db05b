//! Transformed N-point polygons.
//!
//! An [`AbstractShape`] holds its corners in shape coordinates and draws
//! them scaled, rotated around the shape origin and moved to the origin's
//! position in the widget. The transformed corners and their bounding box
//! are cached whenever a corner or the transform changes.

use crate::basics::Rect;
use crate::canvas::Canvas;
use crate::canvas_widget::CanvasShape;
use crate::fixed_point::{cosine_q5, muldiv, sine_q5, Q10, Q5};

/// A vertex in `Q5` coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: Q5,
    pub y: Q5,
}

impl Point {
    pub const fn new(x: Q5, y: Q5) -> Self {
        Self { x, y }
    }

    /// A vertex at whole-pixel coordinates.
    pub const fn from_int(x: i32, y: i32) -> Self {
        Self::new(Q5::from_int(x), Q5::from_int(y))
    }
}

/// `value * scale`, with `scale` in `Q10`.
#[inline]
fn scale_q5(value: Q5, scale: Q10) -> Q5 {
    Q5(muldiv(value.0, scale.0, Q10::from_int(1).0).0)
}

// ============================================================================
// AbstractShape
// ============================================================================

/// A closed polygon with an origin, a scale and a rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractShape {
    corners: Vec<Point>,
    cache: Vec<Point>,
    origin: Point,
    angle: Q5,
    x_scale: Q10,
    y_scale: Q10,
    minimal_rect: Rect,
}

impl Default for AbstractShape {
    fn default() -> Self {
        Self {
            corners: Vec::new(),
            cache: Vec::new(),
            origin: Point::default(),
            angle: Q5::ZERO,
            x_scale: Q10::from_int(1),
            y_scale: Q10::from_int(1),
            minimal_rect: Rect::default(),
        }
    }
}

impl AbstractShape {
    /// A shape with the given corners and an identity transform.
    pub fn new(corners: impl Into<Vec<Point>>) -> Self {
        let mut shape = Self::default();
        shape.set_shape(corners);
        shape
    }

    /// Replace every corner.
    pub fn set_shape(&mut self, corners: impl Into<Vec<Point>>) {
        self.corners = corners.into();
        self.update_cache();
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.corners.len()
    }

    /// Corner `i` in shape coordinates.
    #[inline]
    pub fn corner(&self, i: usize) -> Option<Point> {
        self.corners.get(i).copied()
    }

    /// Move corner `i`. Indices past the last corner are ignored.
    pub fn set_corner(&mut self, i: usize, corner: Point) {
        if let Some(c) = self.corners.get_mut(i) {
            *c = corner;
            self.update_cache();
        }
    }

    /// Corner `i` after the transform, in widget coordinates.
    #[inline]
    pub fn cached_corner(&self, i: usize) -> Option<Point> {
        self.cache.get(i).copied()
    }

    /// Place the shape origin at `origin` in the widget.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        self.update_cache();
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Rotate clockwise by `angle` degrees around the origin.
    pub fn set_angle(&mut self, angle: Q5) {
        if self.angle != angle {
            self.angle = angle;
            self.update_cache();
        }
    }

    #[inline]
    pub fn angle(&self) -> Q5 {
        self.angle
    }

    /// Scale corners before rotating them. `Q10::from_int(1)` is unscaled.
    pub fn set_scale(&mut self, x_scale: Q10, y_scale: Q10) {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self.update_cache();
    }

    #[inline]
    pub fn scale(&self) -> (Q10, Q10) {
        (self.x_scale, self.y_scale)
    }

    fn update_cache(&mut self) {
        let sin = sine_q5(self.angle);
        let cos = cosine_q5(self.angle);

        self.cache.clear();
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (0, 0, 0, 0);
        for (i, corner) in self.corners.iter().enumerate() {
            let x = scale_q5(corner.x, self.x_scale);
            let y = scale_q5(corner.y, self.y_scale);
            let p = Point::new(
                self.origin.x + x * cos - y * sin,
                self.origin.y + y * cos + x * sin,
            );
            let (px, py) = (p.x.to_int(), p.y.to_int());
            if i == 0 {
                (x_min, x_max, y_min, y_max) = (px, px, py, py);
            } else {
                x_min = x_min.min(px);
                x_max = x_max.max(px);
                y_min = y_min.min(py);
                y_max = y_max.max(py);
            }
            self.cache.push(p);
        }
        self.minimal_rect = if self.cache.is_empty() {
            Rect::default()
        } else {
            Rect::new(x_min, y_min, x_max - x_min + 1, y_max - y_min + 1)
        };
    }
}

impl CanvasShape for AbstractShape {
    fn minimal_rect(&self) -> Rect {
        self.minimal_rect
    }

    fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>) {
        let mut points = self.cache.iter();
        let Some(first) = points.next() else {
            return;
        };
        canvas.move_to(first.x, first.y);
        for p in points {
            canvas.line_to(p.x, p.y);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
