//! Clip path generation.
//!
//! A [`ClipSpec`] describes a clip region. It can be traced into any
//! [`DrawContext`], turned into a [`BezPath`], serialized as an SVG path
//! string, or boxed up as a draw callback for a host renderer.

mod context;
mod polygon;
mod rounded_rect;

pub use context::{BezPathContext, DrawContext, SvgPathContext};
pub use polygon::{
    CornerCut, PolygonOrigin, bounding_size_of_points, corner_cut, corner_cuts,
    path_bounding_size, regular_polygon_points, trace_smooth_polygon,
};
pub use rounded_rect::{CornerRadii, trace_rounded_rect};

use crate::config::ClipConfig;
use kurbo::{BezPath, Point, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Boxed draw callback, invoked with the host's drawing context.
pub type ClipFn = Box<dyn Fn(&mut dyn DrawContext)>;

/// A clip region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClipSpec {
    Circle { center: Point, radius: f64 },
    RoundedRect { size: Size, radii: CornerRadii },
    SmoothPolygon { points: Vec<Point>, radius: f64 },
}

impl ClipSpec {
    pub fn circle(center: Point, radius: f64) -> Self {
        ClipSpec::Circle { center, radius }
    }

    pub fn rounded_rect(size: Size, radii: impl Into<CornerRadii>) -> Self {
        ClipSpec::RoundedRect {
            size,
            radii: radii.into(),
        }
    }

    pub fn smooth_polygon(points: Vec<Point>, radius: f64) -> Self {
        ClipSpec::SmoothPolygon { points, radius }
    }

    /// Smooth polygon using the configured default radius.
    pub fn polygon(points: Vec<Point>, config: &ClipConfig) -> Self {
        Self::smooth_polygon(points, config.polygon_radius)
    }

    /// Whether tracing produces no geometry.
    pub fn is_empty(&self) -> bool {
        match self {
            ClipSpec::SmoothPolygon { points, .. } => points.len() < 3,
            _ => false,
        }
    }

    /// Trace the clip outline into `ctx`.
    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        match self {
            ClipSpec::Circle { center, radius } => {
                ctx.begin_path();
                ctx.arc(*center, *radius, 0.0, TAU);
                ctx.close_path();
            }
            ClipSpec::RoundedRect { size, radii } => trace_rounded_rect(ctx, *size, *radii),
            ClipSpec::SmoothPolygon { points, radius } => {
                trace_smooth_polygon(ctx, points, *radius)
            }
        }
    }

    /// SVG path `d` string of the outline.
    pub fn to_svg_path(&self) -> String {
        let mut ctx = SvgPathContext::new();
        self.draw(&mut ctx);
        ctx.finish()
    }

    /// Outline as a kurbo path, arcs flattened to cubics within `tolerance`.
    pub fn to_bez_path(&self, tolerance: f64) -> BezPath {
        let mut ctx = BezPathContext::new(tolerance);
        self.draw(&mut ctx);
        ctx.finish()
    }

    /// Outline as a kurbo path using the configured tolerance.
    pub fn to_bez_path_with(&self, config: &ClipConfig) -> BezPath {
        self.to_bez_path(config.curve_tolerance)
    }

    /// Owned draw callback for hosts that take a clip function.
    pub fn clip_fn(&self) -> ClipFn {
        let spec = self.clone();
        Box::new(move |ctx: &mut dyn DrawContext| spec.draw(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Shape};

    /// Records calls so outputs of different contexts can be compared.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DrawContext for Recorder {
        fn begin_path(&mut self) {
            self.calls.push("begin".into());
        }
        fn move_to(&mut self, p: Point) {
            self.calls.push(format!("move {p:?}"));
        }
        fn line_to(&mut self, p: Point) {
            self.calls.push(format!("line {p:?}"));
        }
        fn quad_to(&mut self, ctrl: Point, p: Point) {
            self.calls.push(format!("quad {ctrl:?} {p:?}"));
        }
        fn arc_to(&mut self, corner: Point, end: Point, radius: f64) {
            self.calls.push(format!("arc_to {corner:?} {end:?} {radius}"));
        }
        fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
            self.calls.push(format!("arc {center:?} {radius} {start} {end}"));
        }
        fn close_path(&mut self) {
            self.calls.push("close".into());
        }
    }

    #[test]
    fn test_circle_calls() {
        let mut rec = Recorder::default();
        ClipSpec::circle(Point::new(5.0, 5.0), 3.0).draw(&mut rec);
        assert_eq!(rec.calls.len(), 3);
        assert_eq!(rec.calls[0], "begin");
        assert!(rec.calls[1].starts_with("arc"));
        assert_eq!(rec.calls[2], "close");
    }

    #[test]
    fn test_clip_fn_matches_draw() {
        let spec = ClipSpec::rounded_rect(Size::new(100.0, 50.0), 30.0);
        let mut direct = Recorder::default();
        spec.draw(&mut direct);

        let callback = spec.clip_fn();
        let mut boxed = Recorder::default();
        callback(&mut boxed);
        assert_eq!(direct.calls, boxed.calls);
        assert!(
            direct
                .calls
                .iter()
                .filter(|c| c.starts_with("arc_to"))
                .all(|c| c.ends_with(" 30"))
        );
    }

    #[test]
    fn test_polygon_svg_and_bez_agree() {
        let points = regular_polygon_points(6, 50.0, PolygonOrigin::TopLeft);
        let spec = ClipSpec::polygon(points.clone(), &ClipConfig::default());
        let svg = spec.to_svg_path();
        let path = spec.to_bez_path(0.1);

        assert_eq!(svg.matches('Q').count(), 6);
        let quads: Vec<Point> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::QuadTo(ctrl, _) => Some(*ctrl),
                _ => None,
            })
            .collect();
        assert_eq!(quads, points);
        assert!(matches!(path.elements().last(), Some(PathEl::ClosePath)));
    }

    #[test]
    fn test_empty_polygon() {
        let spec = ClipSpec::smooth_polygon(vec![Point::ZERO], 4.0);
        assert!(spec.is_empty());
        assert!(spec.to_svg_path().is_empty());
        assert!(spec.to_bez_path(0.1).elements().is_empty());
    }

    #[test]
    fn test_rounded_rect_bez_bounds() {
        let spec = ClipSpec::rounded_rect(Size::new(100.0, 50.0), [10.0, 0.0, 20.0, 5.0]);
        let bbox = spec.to_bez_path_with(&ClipConfig::default()).bounding_box();
        assert!(bbox.x0.abs() < 1e-6);
        assert!(bbox.y0.abs() < 1e-6);
        assert!((bbox.x1 - 100.0).abs() < 1e-6);
        assert!((bbox.y1 - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_svg() {
        let svg = ClipSpec::circle(Point::new(10.0, 10.0), 5.0).to_svg_path();
        assert!(svg.starts_with("M15,10A5,5 0 0,1 "));
        assert_eq!(svg.matches('A').count(), 2);
        assert!(svg.ends_with('Z'));
    }
}
