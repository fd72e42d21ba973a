//! Linear gradient endpoints from a CSS angle.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Start and end point of a linear gradient inside a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientEndpoints {
    pub start: Point,
    pub end: Point,
}

/// Map a CSS `linear-gradient` angle onto endpoints in a `width` x `height`
/// box.
///
/// The gradient line runs through the box center with half-length equal to
/// half the diagonal. Each endpoint is then clamped into the box.
pub fn gradient_endpoints(width: f64, height: f64, angle_degrees: f64) -> GradientEndpoints {
    // `%` keeps the sign of the dividend
    let rad = ((450.0 - angle_degrees) % 360.0).to_radians();
    let center = Point::new(width / 2.0, height / 2.0);
    let half_len = width.hypot(height) / 2.0;
    let dx = rad.cos() * half_len;
    let dy = rad.sin() * half_len;

    let clamp = |p: Point| Point::new(p.x.max(0.0).min(width), p.y.max(0.0).min(height));
    GradientEndpoints {
        start: clamp(Point::new(center.x - dx, center.y - dy)),
        end: clamp(Point::new(center.x + dx, center.y + dy)),
    }
}

impl GradientEndpoints {
    pub fn for_size(size: Size, angle_degrees: f64) -> Self {
        gradient_endpoints(size.width, size.height, angle_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(p: Point, w: f64, h: f64) -> bool {
        (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y)
    }

    #[test]
    fn test_negative_angle_stays_in_box() {
        let g = gradient_endpoints(200.0, 100.0, -270.0);
        assert!(inside(g.start, 200.0, 100.0));
        assert!(inside(g.end, 200.0, 100.0));
    }

    #[test]
    fn test_180_is_vertical() {
        let g = gradient_endpoints(100.0, 100.0, 180.0);
        assert!((g.start.x - 50.0).abs() < 1e-9);
        assert!((g.start.y - 100.0).abs() < 1e-9);
        assert!((g.end.x - 50.0).abs() < 1e-9);
        assert!(g.end.y.abs() < 1e-9);
    }

    #[test]
    fn test_zero_swaps_with_180() {
        let up = gradient_endpoints(100.0, 100.0, 0.0);
        let down = gradient_endpoints(100.0, 100.0, 180.0);
        assert!((up.start.y - down.end.y).abs() < 1e-9);
        assert!((up.end.y - down.start.y).abs() < 1e-9);
    }

    #[test]
    fn test_90_runs_left_to_right() {
        let g = GradientEndpoints::for_size(Size::new(300.0, 100.0), 90.0);
        assert!(g.start.x.abs() < 1e-9);
        assert!((g.end.x - 300.0).abs() < 1e-9);
        assert!((g.start.y - 50.0).abs() < 1e-9);
    }
}
