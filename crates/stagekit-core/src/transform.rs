//! Coordinate space conversions.
//!
//! A node's absolute transform maps its local frame to stage coordinates;
//! these helpers apply it and its inverse.

use crate::node::{NodeId, SceneView};
use kurbo::{Affine, Point, Vec2};

/// Convert a point in the node's frame to stage coordinates.
pub fn to_absolute(view: &impl SceneView, node: NodeId, relative: Point) -> Point {
    view.absolute_transform(node) * relative
}

/// Convert a stage point into the node's frame.
///
/// A singular transform (zero scale) leaves the point unchanged.
pub fn to_relative(view: &impl SceneView, node: NodeId, absolute: Point) -> Point {
    let transform = view.absolute_transform(node);
    if transform.determinant().abs() < f64::EPSILON {
        log::trace!("Singular transform on node {}, point left as is", node);
        return absolute;
    }
    transform.inverse() * absolute
}

/// Rotate `point` about `center` by `degrees`.
pub fn rotate_around(point: Point, center: Point, degrees: f64) -> Point {
    let rotation = Affine::translate(center.to_vec2())
        * Affine::rotate(degrees.to_radians())
        * Affine::translate(-center.to_vec2());
    rotation * point
}

/// Offset that moves `from` onto `to`.
pub fn delta(from: Point, to: Point) -> Vec2 {
    to - from
}
