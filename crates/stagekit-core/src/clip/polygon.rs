//! Smooth-rounded polygons and regular polygon vertices.

use super::context::DrawContext;
use kurbo::{BezPath, Point, Shape, Size, SvgParseError, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Where the vertices of a regular polygon are anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonOrigin {
    /// Centered on the origin.
    Center,
    /// Shifted so the minimum x and y are zero.
    #[default]
    TopLeft,
}

/// Rounding of one polygon vertex: a quadratic curve from `entry` to `exit`
/// with the vertex as control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerCut {
    pub entry: Point,
    pub control: Point,
    pub exit: Point,
    /// Effective radius, `min(radius, |in| / 2, |out| / 2)`.
    pub radius: f64,
}

fn unit(v: Vec2, len: f64) -> Vec2 {
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

/// Cut the corner at `curr` between edges `prev -> curr` and `curr -> next`.
pub fn corner_cut(prev: Point, curr: Point, next: Point, radius: f64) -> CornerCut {
    let incoming = curr - prev;
    let outgoing = next - curr;
    let (len_in, len_out) = (incoming.hypot(), outgoing.hypot());
    let r = radius.min(len_in / 2.0).min(len_out / 2.0);
    CornerCut {
        entry: curr - unit(incoming, len_in) * r,
        control: curr,
        exit: curr + unit(outgoing, len_out) * r,
        radius: r,
    }
}

/// Corner cuts for every vertex of a closed polygon.
pub fn corner_cuts(points: &[Point], radius: f64) -> Vec<CornerCut> {
    let len = points.len();
    (0..len)
        .map(|i| {
            let prev = points[(i + len - 1) % len];
            let next = points[(i + 1) % len];
            corner_cut(prev, points[i], next, radius)
        })
        .collect()
}

/// Trace a polygon whose corners are rounded with quadratic curves.
/// Fewer than three vertices draw nothing.
pub fn trace_smooth_polygon(ctx: &mut dyn DrawContext, points: &[Point], radius: f64) {
    if points.len() < 3 {
        return;
    }
    for (i, cut) in corner_cuts(points, radius).into_iter().enumerate() {
        if i == 0 {
            ctx.begin_path();
            ctx.move_to(cut.entry);
        } else {
            ctx.line_to(cut.entry);
        }
        ctx.quad_to(cut.control, cut.exit);
    }
    ctx.close_path();
}

/// Vertices of a regular polygon with the given circumradius. Vertex `i`
/// sits at angle `PI / sides + i * 2PI / sides`.
pub fn regular_polygon_points(sides: u32, radius: f64, origin: PolygonOrigin) -> Vec<Point> {
    let n = f64::from(sides);
    let offset = PI / n;
    let points: Vec<Point> = (0..sides)
        .map(|i| {
            let angle = offset + f64::from(i) * 2.0 * PI / n;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    match origin {
        PolygonOrigin::Center => points,
        PolygonOrigin::TopLeft => {
            let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
            let shift = Vec2::new(min_x, min_y);
            points.into_iter().map(|p| p - shift).collect()
        }
    }
}

/// Width and height of the points' bounding box. Empty input is zero-sized.
pub fn bounding_size_of_points(points: &[Point]) -> Size {
    if points.is_empty() {
        return Size::ZERO;
    }
    let (mut min, mut max) = (points[0], points[0]);
    for p in &points[1..] {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    Size::new(max.x - min.x, max.y - min.y)
}

/// Width and height of the bounding box of an SVG path `d` string.
///
/// Curves are measured by their extrema, not their control points.
pub fn path_bounding_size(d: &str) -> Result<Size, SvgParseError> {
    Ok(BezPath::from_svg(d)?.bounding_box().size())
}
