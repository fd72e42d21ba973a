//! Immediate-mode drawing contexts.
//!
//! [`DrawContext`] mirrors the path subset of a 2D canvas context. Clip
//! builders trace into it, so the same geometry can be drawn onto a live
//! context, collected as a [`BezPath`], or serialized as an SVG `d` string.

use kurbo::{Arc, BezPath, Point, Vec2};
use std::f64::consts::{PI, TAU};
use std::fmt::Write;

/// Path-building subset of a 2D drawing context. Angles are in radians.
pub trait DrawContext {
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quad_to(&mut self, ctrl: Point, p: Point);
    /// Canvas `arcTo`: a line toward `corner`, then an arc of `radius`
    /// tangent to both `current -> corner` and `corner -> end`.
    fn arc_to(&mut self, corner: Point, end: Point, radius: f64);
    /// Clockwise arc around `center` from `start_angle` to `end_angle`.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
}

/// Resolved geometry of an `arc_to` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TangentArc {
    /// Tangent point on `current -> corner`.
    pub start: Point,
    /// Tangent point on `corner -> end`.
    pub end: Point,
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    /// Signed sweep, within `(-PI, PI]`.
    pub sweep: f64,
}

/// Tangent arc for `arc_to`, or `None` when it degenerates to a line
/// (zero radius, coincident or collinear points).
pub(crate) fn tangent_arc(
    current: Point,
    corner: Point,
    end: Point,
    radius: f64,
) -> Option<TangentArc> {
    if radius <= 0.0 || !radius.is_finite() {
        return None;
    }
    let a = current - corner;
    let b = end - corner;
    let (len_a, len_b) = (a.hypot(), b.hypot());
    if len_a < f64::EPSILON || len_b < f64::EPSILON {
        return None;
    }
    let u1 = a / len_a;
    let u2 = b / len_b;
    if u1.cross(u2).abs() < 1e-12 {
        return None;
    }
    let theta = u1.dot(u2).clamp(-1.0, 1.0).acos();
    let tangent_dist = radius / (theta / 2.0).tan();
    let bisector = (u1 + u2).normalize();
    let center = corner + bisector * (radius / (theta / 2.0).sin());
    let start = corner + u1 * tangent_dist;
    let finish = corner + u2 * tangent_dist;
    let start_angle = (start - center).atan2();
    let end_angle = (finish - center).atan2();
    Some(TangentArc {
        start,
        end: finish,
        center,
        radius,
        start_angle,
        sweep: normalize_sweep(end_angle - start_angle),
    })
}

/// Wrap an angle difference into `(-PI, PI]`.
fn normalize_sweep(sweep: f64) -> f64 {
    let wrapped = sweep.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Clockwise sweep for a canvas `arc` call.
pub(crate) fn clockwise_sweep(start_angle: f64, end_angle: f64) -> f64 {
    let sweep = end_angle - start_angle;
    if sweep >= TAU { TAU } else { sweep.rem_euclid(TAU) }
}

fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}

/// Current point and subpath start, shared by the contexts below.
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl Pen {
    fn moved(&mut self, p: Point) {
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    fn closed(&mut self) {
        self.current = self.subpath_start;
    }
}

/// Collects drawing commands into a [`BezPath`]. Arcs become cubic segments
/// within `tolerance`.
#[derive(Debug, Clone)]
pub struct BezPathContext {
    path: BezPath,
    pen: Pen,
    tolerance: f64,
}

impl BezPathContext {
    pub fn new(tolerance: f64) -> Self {
        Self {
            path: BezPath::new(),
            pen: Pen::default(),
            tolerance,
        }
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn finish(self) -> BezPath {
        self.path
    }

    fn append_arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep: f64) {
        let arc = Arc {
            center,
            radii: Vec2::new(radius, radius),
            start_angle,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        self.path.extend(arc.append_iter(self.tolerance));
        self.pen.current = Some(point_on_circle(center, radius, start_angle + sweep));
    }
}

impl DrawContext for BezPathContext {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.pen = Pen::default();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
        self.pen.moved(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.pen.current.is_none() {
            self.move_to(p);
            return;
        }
        self.path.line_to(p);
        self.pen.current = Some(p);
    }

    fn quad_to(&mut self, ctrl: Point, p: Point) {
        if self.pen.current.is_none() {
            self.move_to(ctrl);
        }
        self.path.quad_to(ctrl, p);
        self.pen.current = Some(p);
    }

    fn arc_to(&mut self, corner: Point, end: Point, radius: f64) {
        let Some(current) = self.pen.current else {
            self.move_to(corner);
            return;
        };
        match tangent_arc(current, corner, end, radius) {
            Some(arc) => {
                if (arc.start - current).hypot() > 1e-9 {
                    self.line_to(arc.start);
                }
                self.append_arc(arc.center, arc.radius, arc.start_angle, arc.sweep);
            }
            None => self.line_to(corner),
        }
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let start = point_on_circle(center, radius, start_angle);
        self.line_to(start);
        self.append_arc(center, radius, start_angle, clockwise_sweep(start_angle, end_angle));
    }

    fn close_path(&mut self) {
        if self.pen.current.is_some() {
            self.path.close_path();
            self.pen.closed();
        }
    }
}

/// Serializes drawing commands as an SVG path `d` attribute
/// (`M`, `L`, `Q`, `A`, `Z`).
#[derive(Debug, Clone, Default)]
pub struct SvgPathContext {
    d: String,
    pen: Pen,
}

impl SvgPathContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.d
    }

    pub fn finish(self) -> String {
        self.d
    }

    fn push_arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep: f64) {
        let sweep_flag = u8::from(sweep > 0.0);
        if sweep.abs() >= TAU - 1e-9 {
            let mid = point_on_circle(center, radius, start_angle + sweep / 2.0);
            let end = point_on_circle(center, radius, start_angle + sweep);
            let _ = write!(self.d, "A{radius},{radius} 0 0,{sweep_flag} {},{}", mid.x, mid.y);
            let _ = write!(self.d, "A{radius},{radius} 0 0,{sweep_flag} {},{}", end.x, end.y);
            self.pen.current = Some(end);
        } else {
            let large = u8::from(sweep.abs() > PI);
            let end = point_on_circle(center, radius, start_angle + sweep);
            let _ = write!(self.d, "A{radius},{radius} 0 {large},{sweep_flag} {},{}", end.x, end.y);
            self.pen.current = Some(end);
        }
    }
}

impl DrawContext for SvgPathContext {
    fn begin_path(&mut self) {
        self.d.clear();
        self.pen = Pen::default();
    }

    fn move_to(&mut self, p: Point) {
        let _ = write!(self.d, "M{},{}", p.x, p.y);
        self.pen.moved(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.pen.current.is_none() {
            self.move_to(p);
            return;
        }
        let _ = write!(self.d, "L{},{}", p.x, p.y);
        self.pen.current = Some(p);
    }

    fn quad_to(&mut self, ctrl: Point, p: Point) {
        if self.pen.current.is_none() {
            self.move_to(ctrl);
        }
        let _ = write!(self.d, "Q{},{} {},{}", ctrl.x, ctrl.y, p.x, p.y);
        self.pen.current = Some(p);
    }

    fn arc_to(&mut self, corner: Point, end: Point, radius: f64) {
        let Some(current) = self.pen.current else {
            self.move_to(corner);
            return;
        };
        match tangent_arc(current, corner, end, radius) {
            Some(arc) => {
                if (arc.start - current).hypot() > 1e-9 {
                    self.line_to(arc.start);
                }
                self.push_arc(arc.center, arc.radius, arc.start_angle, arc.sweep);
            }
            None => self.line_to(corner),
        }
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let start = point_on_circle(center, radius, start_angle);
        self.line_to(start);
        self.push_arc(center, radius, start_angle, clockwise_sweep(start_angle, end_angle));
    }

    fn close_path(&mut self) {
        if self.pen.current.is_some() {
            self.d.push('Z');
            self.pen.closed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{ParamCurve, PathEl, Shape};

    #[test]
    fn test_tangent_arc_right_angle() {
        // top edge heading right, turning down at (100, 0)
        let arc = tangent_arc(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            10.0,
        )
        .unwrap();
        assert!((arc.start.x - 90.0).abs() < 1e-9);
        assert!(arc.start.y.abs() < 1e-9);
        assert!((arc.end.x - 100.0).abs() < 1e-9);
        assert!((arc.end.y - 10.0).abs() < 1e-9);
        assert!((arc.center.x - 90.0).abs() < 1e-9);
        assert!((arc.center.y - 10.0).abs() < 1e-9);
        assert!((arc.sweep - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_arc_degenerate() {
        let p = Point::new(1.0, 1.0);
        assert!(tangent_arc(p, p, Point::new(5.0, 5.0), 3.0).is_none());
        let (x1, x2, y1) = (Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 1.0));
        assert!(tangent_arc(Point::ZERO, x1, x2, 3.0).is_none());
        assert!(tangent_arc(Point::ZERO, x1, y1, 0.0).is_none());
    }

    #[test]
    fn test_clockwise_sweep() {
        assert!((clockwise_sweep(0.0, TAU) - TAU).abs() < f64::EPSILON);
        assert!((clockwise_sweep(0.0, 3.0 * TAU) - TAU).abs() < f64::EPSILON);
        assert!((clockwise_sweep(PI, PI / 2.0) - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_svg_commands() {
        let mut ctx = SvgPathContext::new();
        ctx.begin_path();
        ctx.move_to(Point::new(1.0, 2.0));
        ctx.line_to(Point::new(3.0, 4.0));
        ctx.quad_to(Point::new(5.0, 6.0), Point::new(7.5, 8.0));
        ctx.close_path();
        assert_eq!(ctx.finish(), "M1,2L3,4Q5,6 7.5,8Z");
    }

    #[test]
    fn test_svg_arc_to_degenerate_is_line() {
        let mut ctx = SvgPathContext::new();
        ctx.move_to(Point::ZERO);
        ctx.arc_to(Point::new(10.0, 0.0), Point::new(20.0, 0.0), 5.0);
        assert_eq!(ctx.as_str(), "M0,0L10,0");
    }

    #[test]
    fn test_line_without_current_point_moves() {
        let mut ctx = SvgPathContext::new();
        ctx.line_to(Point::new(4.0, 4.0));
        assert_eq!(ctx.as_str(), "M4,4");
    }

    #[test]
    fn test_bez_full_circle() {
        let mut ctx = BezPathContext::new(0.01);
        ctx.begin_path();
        ctx.arc(Point::new(50.0, 50.0), 20.0, 0.0, TAU);
        ctx.close_path();
        let path = ctx.finish();

        assert!(matches!(path.elements().first(), Some(PathEl::MoveTo(_))));
        assert!(matches!(path.elements().last(), Some(PathEl::ClosePath)));
        let bbox = path.bounding_box();
        assert!((bbox.x0 - 30.0).abs() < 0.05);
        assert!((bbox.x1 - 70.0).abs() < 0.05);
        assert!((bbox.y0 - 30.0).abs() < 0.05);
        assert!((bbox.y1 - 70.0).abs() < 0.05);
    }

    #[test]
    fn test_bez_arc_to_ends_on_tangent() {
        let mut ctx = BezPathContext::new(0.01);
        ctx.move_to(Point::ZERO);
        ctx.arc_to(Point::new(100.0, 0.0), Point::new(100.0, 50.0), 10.0);
        let end = ctx.path().segments().last().unwrap().end();
        assert!((end.x - 100.0).abs() < 1e-6);
        assert!((end.y - 10.0).abs() < 1e-6);
    }
}
