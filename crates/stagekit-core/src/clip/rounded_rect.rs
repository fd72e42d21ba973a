//! Rounded rectangle clip.

use super::context::DrawContext;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Corner radii in the order top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii(pub [f64; 4]);

impl CornerRadii {
    pub const fn uniform(radius: f64) -> Self {
        Self([radius; 4])
    }

    pub fn top_left(&self) -> f64 {
        self.0[0]
    }

    pub fn top_right(&self) -> f64 {
        self.0[1]
    }

    pub fn bottom_right(&self) -> f64 {
        self.0[2]
    }

    pub fn bottom_left(&self) -> f64 {
        self.0[3]
    }

    /// Radii limited to half the width. Height is not considered.
    pub fn clamped(&self, size: Size) -> Self {
        let limit = size.width / 2.0;
        Self(self.0.map(|r| r.min(limit).max(0.0)))
    }
}

impl From<f64> for CornerRadii {
    fn from(radius: f64) -> Self {
        Self::uniform(radius)
    }
}

impl From<[f64; 4]> for CornerRadii {
    fn from(radii: [f64; 4]) -> Self {
        Self(radii)
    }
}

/// Trace a rounded rectangle anchored at the origin.
pub fn trace_rounded_rect(ctx: &mut dyn DrawContext, size: Size, radii: CornerRadii) {
    let Size { width: w, height: h } = size;
    let [tl, tr, br, bl] = radii.clamped(size).0;

    ctx.begin_path();
    ctx.move_to(Point::new(tl, 0.0));

    ctx.line_to(Point::new(w - tr, 0.0));
    if tr > 0.0 {
        ctx.arc_to(Point::new(w, 0.0), Point::new(w, tr), tr);
    }

    ctx.line_to(Point::new(w, h - br));
    if br > 0.0 {
        ctx.arc_to(Point::new(w, h), Point::new(w - br, h), br);
    }

    ctx.line_to(Point::new(bl, h));
    if bl > 0.0 {
        ctx.arc_to(Point::new(0.0, h), Point::new(0.0, h - bl), bl);
    }

    ctx.line_to(Point::new(0.0, tl));
    if tl > 0.0 {
        ctx.arc_to(Point::ZERO, Point::new(tl, 0.0), tl);
    }

    ctx.close_path();
}
