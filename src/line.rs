//! Straight lines with a width.
//!
//! A line is drawn as the quadrilateral around the segment from start to
//! end, optionally extended by half the width at both ends (square caps) or
//! closed by half circles (round caps). The corners are recomputed whenever
//! an endpoint, the width or the ending changes.

use crate::basics::Rect;
use crate::canvas::Canvas;
use crate::canvas_widget::CanvasShape;
use crate::fixed_point::{angle, cosine, cosine_q5, isqrt, muldiv_q5, sine, sine_q5, Q5};
use crate::shape::Point;

/// Largest component the direction vector is scaled to before taking its
/// length, so that the squared length still fits in 32 bits.
const MAX_DIRECTION: i32 = 46340;

/// How the ends of a [`Line`] are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// The line stops at its endpoints.
    #[default]
    Butt,
    /// Half circles around the endpoints.
    Round,
    /// The line extends half its width past the endpoints.
    Square,
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// ============================================================================
// Line
// ============================================================================

/// A line segment of a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    start: Point,
    end: Point,
    width: Q5,
    ending: LineEnding,
    cap_precision: i32,
    corners: [Point; 4],
    minimal_rect: Rect,
}

impl Default for Line {
    fn default() -> Self {
        let mut line = Self {
            start: Point::default(),
            end: Point::default(),
            width: Q5::from_int(1),
            ending: LineEnding::Butt,
            cap_precision: 18,
            corners: [Point::default(); 4],
            minimal_rect: Rect::default(),
        };
        line.update_cached_shape();
        line
    }
}

impl Line {
    /// A one pixel wide line from `start` to `end`.
    pub fn new(start: Point, end: Point) -> Self {
        let mut line = Self::default();
        line.start = start;
        line.end = end;
        line.update_cached_shape();
        line
    }

    pub fn set_start(&mut self, start: Point) {
        if self.start != start {
            self.start = start;
            self.update_cached_shape();
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn set_end(&mut self, end: Point) {
        if self.end != end {
            self.end = end;
            self.update_cached_shape();
        }
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Move the start point and return the area that needs redrawing.
    pub fn update_start(&mut self, start: Point) -> Rect {
        let before = self.minimal_rect;
        self.set_start(start);
        before.union(&self.minimal_rect)
    }

    /// Move the end point and return the area that needs redrawing.
    pub fn update_end(&mut self, end: Point) -> Rect {
        let before = self.minimal_rect;
        self.set_end(end);
        before.union(&self.minimal_rect)
    }

    /// Place the end point `length` away from the start, in the direction
    /// `angle` degrees clockwise from up.
    pub fn update_length_and_angle(&mut self, length: Q5, angle: Q5) -> Rect {
        let end = Point::new(
            self.start.x + length * sine_q5(angle),
            self.start.y - length * cosine_q5(angle),
        );
        self.update_end(end)
    }

    pub fn set_width(&mut self, width: Q5) {
        if self.width != width {
            self.width = width;
            self.update_cached_shape();
        }
    }

    pub fn width(&self) -> Q5 {
        self.width
    }

    pub fn set_ending(&mut self, ending: LineEnding) {
        self.ending = ending;
        self.update_cached_shape();
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    /// Degrees between vertices of round caps, clamped to `1..=180`.
    pub fn set_cap_precision(&mut self, precision: i32) {
        self.cap_precision = precision.clamp(1, 180);
    }

    pub fn cap_precision(&self) -> i32 {
        self.cap_precision
    }

    /// The four corners of the outline, before any round caps.
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Half the width, split into the components along `x` and `y` of the
    /// line direction.
    fn half_width_along(&self) -> Option<(Q5, Q5)> {
        let mut dx = self.end.x - self.start.x;
        let mut dy = self.end.y - self.start.y;
        let d = if dx == Q5::ZERO && dy == Q5::ZERO {
            return None;
        } else if dx == Q5::ZERO {
            dy.abs()
        } else if dy == Q5::ZERO {
            dx.abs()
        } else {
            let divisor = gcd(dx.0.abs(), dy.0.abs());
            if divisor != 1 {
                dx = dx / divisor;
                dy = dy / divisor;
            }
            if dx.0.abs() <= MAX_DIRECTION && dy.0.abs() <= MAX_DIRECTION {
                let mult = (MAX_DIRECTION / dx.0.abs()).min(MAX_DIRECTION / dy.0.abs());
                dx = dx * mult;
                dy = dy * mult;
            } else {
                let div = (dx.0.abs() / MAX_DIRECTION).max(dy.0.abs() / MAX_DIRECTION) + 1;
                dx = dx / div;
                dy = dy / div;
            }
            let sq = |v: Q5| v.0.unsigned_abs() * v.0.unsigned_abs();
            Q5(isqrt(sq(dx) + sq(dy)) as i32)
        };
        Some((
            muldiv_q5(self.width, dx, d) / 2,
            muldiv_q5(self.width, dy, d) / 2,
        ))
    }

    fn update_cached_shape(&mut self) {
        let Point { x: x1, y: y1 } = self.start;
        let Point { x: x2, y: y2 } = self.end;
        let Some((dx, dy)) = self.half_width_along() else {
            self.corners = [self.start; 4];
            self.minimal_rect = Rect::new(x1.to_int(), y1.to_int(), 1, 1);
            return;
        };

        let butt = [
            Point::new(x1 - dy, y1 + dx),
            Point::new(x2 - dy, y2 + dx),
            Point::new(x2 + dy, y2 - dx),
            Point::new(x1 + dy, y1 - dx),
        ];
        let extended = [
            Point::new(x1 - dy - dx, y1 + dx - dy),
            Point::new(x2 - dy + dx, y2 + dx + dy),
            Point::new(x2 + dy + dx, y2 - dx + dy),
            Point::new(x1 + dy - dx, y1 - dx - dy),
        ];

        // Round caps reach as far as square ones
        let outline = match self.ending {
            LineEnding::Butt => &butt,
            LineEnding::Round | LineEnding::Square => &extended,
        };
        let x_min = outline.iter().map(|p| p.x).min().unwrap_or(x1).to_int();
        let x_max = outline.iter().map(|p| p.x).max().unwrap_or(x1).to_int();
        let y_min = outline.iter().map(|p| p.y).min().unwrap_or(y1).to_int();
        let y_max = outline.iter().map(|p| p.y).max().unwrap_or(y1).to_int();
        self.minimal_rect = Rect::new(x_min, y_min, x_max - x_min + 1, y_max - y_min + 1);

        self.corners = match self.ending {
            LineEnding::Square => extended,
            LineEnding::Butt | LineEnding::Round => butt,
        };
    }
}

impl CanvasShape for Line {
    fn minimal_rect(&self) -> Rect {
        self.minimal_rect
    }

    fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>) {
        let [c0, c1, c2, c3] = self.corners;
        let (degrees, radius) = angle(c0.x - self.start.x, c0.y - self.start.y);
        let round = self.ending == LineEnding::Round;

        canvas.move_to(c0.x, c0.y);
        canvas.line_to(c1.x, c1.y);
        if round {
            let mut i = self.cap_precision;
            while i < 180 {
                canvas.line_to(
                    self.end.x + radius * sine(degrees - i),
                    self.end.y - radius * cosine(degrees - i),
                );
                i += self.cap_precision;
            }
        }
        canvas.line_to(c2.x, c2.y);
        canvas.line_to(c3.x, c3.y);
        if round {
            let mut i = 180 - self.cap_precision;
            while i > 0 {
                canvas.line_to(
                    self.start.x + radius * sine(degrees + i),
                    self.start.y - radius * cosine(degrees + i),
                );
                i -= self.cap_precision;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::from_int(x, y)
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 5), 1);
        assert_eq!(gcd(32, 0), 32);
    }

    #[test]
    fn test_horizontal_butt_line() {
        let mut line = Line::new(p(10, 10), p(20, 10));
        line.set_width(Q5::from_int(4));
        assert_eq!(line.corners(), [p(10, 12), p(20, 12), p(20, 8), p(10, 8)]);
        assert_eq!(line.minimal_rect(), Rect::new(10, 8, 11, 5));
    }

    #[test]
    fn test_square_ending_extends() {
        let mut line = Line::new(p(10, 10), p(20, 10));
        line.set_width(Q5::from_int(4));
        line.set_ending(LineEnding::Square);
        assert_eq!(line.corners()[0], p(8, 12));
        assert_eq!(line.minimal_rect(), Rect::new(8, 8, 15, 5));
    }

    #[test]
    fn test_round_ending_keeps_butt_corners() {
        let mut line = Line::new(p(10, 10), p(20, 10));
        line.set_width(Q5::from_int(4));
        line.set_ending(LineEnding::Round);
        assert_eq!(line.corners()[0], p(10, 12));
        assert_eq!(line.minimal_rect(), Rect::new(8, 8, 15, 5));
    }

    #[test]
    fn test_vertical_line() {
        let mut line = Line::new(p(5, 0), p(5, 10));
        line.set_width(Q5::from_int(2));
        assert_eq!(line.corners(), [p(4, 0), p(4, 10), p(6, 10), p(6, 0)]);
    }

    #[test]
    fn test_diagonal_width_is_perpendicular() {
        let mut line = Line::new(p(0, 0), p(30, 40));
        line.set_width(Q5::from_int(10));
        // Direction (3, 4) / 5, half width 5: offset (-4, 3)
        let c0 = line.corners()[0];
        assert!((c0.x.0 - Q5::from_int(-4).0).abs() <= 1);
        assert!((c0.y.0 - Q5::from_int(3).0).abs() <= 1);
    }

    #[test]
    fn test_degenerate_line() {
        let line = Line::new(p(3, 4), p(3, 4));
        assert_eq!(line.corners(), [p(3, 4); 4]);
        assert_eq!(line.minimal_rect(), Rect::new(3, 4, 1, 1));
    }

    #[test]
    fn test_update_end_covers_both() {
        let mut line = Line::new(p(0, 0), p(10, 0));
        let dirty = line.update_end(p(0, 10));
        assert!(dirty.contains(&Rect::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_length_and_angle() {
        let mut line = Line::new(p(10, 10), p(10, 10));
        line.update_length_and_angle(Q5::from_int(5), Q5::from_int(90));
        assert_eq!(line.end(), p(15, 10));
    }
}
