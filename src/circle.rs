//! Circles, arcs and rings.
//!
//! The outline is approximated by straight segments every `precision`
//! degrees. Angles are `Q5` degrees, 0 pointing up and growing clockwise.
//! A line width of 0 gives a filled circle, or a pie slice for a partial
//! arc. A non-zero line width gives a ring or an arc of that width, with
//! caps at both ends of a partial arc.

use crate::basics::Rect;
use crate::canvas::Canvas;
use crate::canvas_widget::CanvasShape;
use crate::fixed_point::{cosine, cosine_q5, sine_q5, Q5};

/// Round `num` up to a multiple of `multiple`, truncating division
/// semantics for negative values.
fn round_up(num: i32, multiple: i32) -> i32 {
    if multiple == 0 {
        return num;
    }
    let m = multiple.abs();
    num + (m - num % m) % m
}

fn round_down(num: i32, multiple: i32) -> i32 {
    -round_up(-num, multiple)
}

/// Running bounding box in `Q5`.
struct Extent {
    x_min: Q5,
    x_max: Q5,
    y_min: Q5,
    y_max: Q5,
}

impl Extent {
    fn new(x: Q5, y: Q5) -> Self {
        Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        }
    }

    fn add(&mut self, x: Q5, y: Q5) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    fn to_rect(&self) -> Rect {
        let (x_min, y_min) = (self.x_min.to_int(), self.y_min.to_int());
        Rect::new(
            x_min - 1,
            y_min - 1,
            self.x_max.to_int() - x_min + 2,
            self.y_max.to_int() - y_min + 2,
        )
    }
}

// ============================================================================
// Circle
// ============================================================================

/// A circle, arc or ring centered at a point of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    center_x: Q5,
    center_y: Q5,
    radius: Q5,
    arc_start: Q5,
    arc_end: Q5,
    line_width: Q5,
    precision: i32,
    cap_precision: i32,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            center_x: Q5::ZERO,
            center_y: Q5::ZERO,
            radius: Q5::ZERO,
            arc_start: Q5::ZERO,
            arc_end: Q5::from_int(360),
            line_width: Q5::ZERO,
            precision: 5,
            cap_precision: 180,
        }
    }
}

impl Circle {
    /// A filled circle.
    pub fn new(x: Q5, y: Q5, radius: Q5) -> Self {
        let mut circle = Self::default();
        circle.set_circle(x, y, radius);
        circle
    }

    pub fn set_circle(&mut self, x: Q5, y: Q5, radius: Q5) {
        self.set_center(x, y);
        self.set_radius(radius);
    }

    pub fn set_center(&mut self, x: Q5, y: Q5) {
        self.center_x = x;
        self.center_y = y;
    }

    pub fn center(&self) -> (Q5, Q5) {
        (self.center_x, self.center_y)
    }

    pub fn set_radius(&mut self, radius: Q5) {
        self.radius = radius;
    }

    pub fn radius(&self) -> Q5 {
        self.radius
    }

    /// Draw only the arc from `start` to `end` degrees. The order of the
    /// two angles does not matter; a span of 360 or more is a full circle.
    pub fn set_arc(&mut self, start: Q5, end: Q5) {
        self.arc_start = start;
        self.arc_end = end;
    }

    pub fn arc(&self) -> (Q5, Q5) {
        (self.arc_start, self.arc_end)
    }

    /// Change the arc start and return the area that needs redrawing.
    pub fn update_arc_start(&mut self, start: Q5) -> Rect {
        if start == self.arc_start {
            return Rect::default();
        }
        let rect = self.minimal_rect_for_updated_start_angle(start);
        self.arc_start = start;
        rect
    }

    /// Change the arc end and return the area that needs redrawing.
    pub fn update_arc_end(&mut self, end: Q5) -> Rect {
        if end == self.arc_end {
            return Rect::default();
        }
        let rect = self.minimal_rect_for_updated_end_angle(end);
        self.arc_end = end;
        rect
    }

    /// Outline width. 0 fills the circle.
    pub fn set_line_width(&mut self, width: Q5) {
        self.line_width = width;
    }

    pub fn line_width(&self) -> Q5 {
        self.line_width
    }

    /// Degrees between outline vertices, clamped to `1..=120`.
    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision.clamp(1, 120);
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Degrees between vertices of the end caps, clamped to `1..=180`.
    /// 180 gives flat caps.
    pub fn set_cap_precision(&mut self, precision: i32) {
        self.cap_precision = precision.clamp(1, 180);
    }

    pub fn cap_precision(&self) -> i32 {
        self.cap_precision
    }

    /// Bounding box of the arc from `start` to `end` with the current
    /// radius and line width.
    pub fn minimal_rect_for_arc(&self, start: Q5, end: Q5) -> Rect {
        let (start, end) = normalize_arc(start, end);
        let outer = self.radius * 2 + self.line_width;
        let (x, y) = self.point_ar2(self.center_x, self.center_y, start, outer);
        let mut extent = Extent::new(x, y);
        let add_ar2 = |extent: &mut Extent, angle: Q5, r2: Q5| {
            let (x, y) = self.point_ar2(self.center_x, self.center_y, angle, r2);
            extent.add(x, y);
        };

        // Quarter turns inside the arc are the only other extremes
        let quarter = Q5::from_int(90);
        let mut i = Q5(round_up((start + Q5::from_int(1)).0, quarter.0));
        while i <= end {
            add_ar2(&mut extent, i, outer);
            i = i + quarter;
        }
        if i - quarter < end {
            add_ar2(&mut extent, end, outer);
        }

        let full = end - start >= Q5::from_int(360);
        if self.line_width == Q5::ZERO {
            if !full {
                extent.add(self.center_x, self.center_y);
            }
        } else {
            let inner = self.radius * 2 - self.line_width;
            add_ar2(&mut extent, start, inner);
            add_ar2(&mut extent, end, inner);
        }

        if self.cap_precision < 180 && !full {
            let half = self.line_width / 2;
            for angle in [start, end] {
                let (cap_x, cap_y) = self.cap_center(angle);
                extent.add(cap_x - half, cap_y - half);
                extent.add(cap_x + half, cap_y + half);
            }
        }

        extent.to_rect()
    }

    fn minimal_rect_for_updated_start_angle(&self, start: Q5) -> Rect {
        let step = Q5::from_int(self.precision).0;
        let (old_start, end) = (self.arc_start, self.arc_end);
        let (min, max) = if old_start < end {
            if start < old_start {
                (start, Q5(round_up(old_start.0, step)).min(end))
            } else if start < end {
                (old_start, Q5(round_up(start.0, step)).min(end))
            } else {
                (old_start, start)
            }
        } else if start > old_start {
            (Q5(round_down(old_start.0, step)).max(end), start)
        } else if start > end {
            (Q5(round_down(start.0, step)).max(end), old_start)
        } else {
            (start, old_start)
        };
        self.minimal_rect_for_arc(min, max)
    }

    fn minimal_rect_for_updated_end_angle(&self, end: Q5) -> Rect {
        let step = Q5::from_int(self.precision).0;
        let (start, old_end) = (self.arc_start, self.arc_end);
        let (min, max) = if start < old_end {
            if end > old_end {
                (Q5(round_down(old_end.0, step)).max(start), end)
            } else if end > start {
                (Q5(round_down(end.0, step)).max(start), old_end)
            } else {
                (end, old_end)
            }
        } else if end < old_end {
            (end, Q5(round_up(old_end.0, step)).min(start))
        } else if end < start {
            (old_end, Q5(round_up(end.0, step)).min(start))
        } else {
            (old_end, end)
        };
        self.minimal_rect_for_arc(min, max)
    }

    /// Point at `angle` on the circle of diameter `r2` around `(x, y)`.
    fn point_ar2(&self, x: Q5, y: Q5, angle: Q5, r2: Q5) -> (Q5, Q5) {
        (
            x + (r2 * sine_q5(angle)) / 2,
            y - (r2 * cosine_q5(angle)) / 2,
        )
    }

    fn cap_center(&self, angle: Q5) -> (Q5, Q5) {
        (
            self.center_x + self.radius * sine_q5(angle),
            self.center_y - self.radius * cosine_q5(angle),
        )
    }

    /// Whether `area` lies inside the hole of the ring, where there is
    /// nothing to draw.
    fn area_inside_ring(&self, area: Rect) -> bool {
        let x1 = Q5::from_int(area.x).0;
        let x2 = Q5::from_int(area.right()).0;
        let y1 = Q5::from_int(area.y).0;
        let y2 = Q5::from_int(area.bottom()).0;
        let dx = Q5((self.center_x.0 - x1).abs().max((self.center_x.0 - x2).abs())).to_int() + 1;
        let dy = Q5((self.center_y.0 - y1).abs().max((self.center_y.0 - y2).abs())).to_int() + 1;
        let rmin =
            ((self.radius - self.line_width / 2) * cosine((self.precision + 1) / 2)).to_int();
        dx * dx + dy * dy < rmin * rmin
    }
}

/// Order the arc angles and widen spans of a full turn or more to `0..360`.
fn normalize_arc(start: Q5, end: Q5) -> (Q5, Q5) {
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    if end - start >= Q5::from_int(360) {
        (Q5::ZERO, Q5::from_int(360))
    } else {
        (start, end)
    }
}

impl CanvasShape for Circle {
    fn minimal_rect(&self) -> Rect {
        self.minimal_rect_for_arc(self.arc_start, self.arc_end)
    }

    fn draw_canvas_widget(&self, canvas: &mut Canvas<'_>) {
        let (arc_start, arc_end) = normalize_arc(self.arc_start, self.arc_end);
        let full = arc_end - arc_start >= Q5::from_int(360);

        if self.line_width != Q5::ZERO && self.area_inside_ring(canvas.area()) {
            return;
        }

        let mut radius = self.radius;
        let mut line_width = self.line_width;
        if line_width > radius * 2 {
            line_width = radius + line_width / 2;
            radius = line_width / 2;
        }

        let (cx, cy) = (self.center_x, self.center_y);
        let step = Q5::from_int(self.precision);
        let outer = radius * 2 + line_width;

        let mut arc = arc_start;
        let (x, y) = self.point_ar2(cx, cy, arc, outer);
        canvas.move_to(x, y);
        let mut next = Q5(round_up((arc + Q5::from_int(1)).0, step.0));
        while next <= arc_end {
            arc = next;
            let (x, y) = self.point_ar2(cx, cy, arc, outer);
            canvas.line_to(x, y);
            next = next + step;
        }
        if arc < arc_end {
            let (x, y) = self.point_ar2(cx, cy, arc_end, outer);
            canvas.line_to(x, y);
        }

        if line_width == Q5::ZERO {
            if !full {
                canvas.line_to(cx, cy);
            }
            return;
        }

        let cap_step = Q5::from_int(self.cap_precision);
        let half_turn = Q5::from_int(180);
        if !full {
            let cap_x = cx + radius * sine_q5(arc_end);
            let cap_y = cy - radius * cosine_q5(arc_end);
            let mut angle = arc_end + cap_step;
            while angle < arc_end + half_turn {
                let (x, y) = self.point_ar2(cap_x, cap_y, angle, line_width);
                canvas.line_to(x, y);
                angle = angle + cap_step;
            }
        }

        // Back along the inside of the ring
        let inner = radius * 2 - line_width;
        if arc < arc_end {
            let (x, y) = self.point_ar2(cx, cy, arc_end, inner);
            canvas.line_to(x, y);
        }
        let mut next = arc;
        while next >= arc_start {
            arc = next;
            let (x, y) = self.point_ar2(cx, cy, arc, inner);
            canvas.line_to(x, y);
            next = next - step;
        }
        if arc > arc_start {
            let (x, y) = self.point_ar2(cx, cy, arc_start, inner);
            canvas.line_to(x, y);
        }

        if !full {
            let cap_x = cx + radius * sine_q5(arc_start);
            let cap_y = cy - radius * cosine_q5(arc_start);
            let mut angle = arc_start - half_turn + cap_step;
            while angle < arc_start {
                let (x, y) = self.point_ar2(cap_x, cap_y, angle, line_width);
                canvas.line_to(x, y);
                angle = angle + cap_step;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
