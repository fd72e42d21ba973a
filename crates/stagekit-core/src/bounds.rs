//! Resize bounds and the minimum-visibility rule.
//!
//! A node may hang partly outside its parent, but at least a
//! [`MinVisible`] part of it must stay inside on every edge.

use crate::config::ConstraintConfig;
use crate::node::{Bounds, ClientRectOptions, NodeClass, NodeId, SceneView};
use crate::text::collapse_whitespace;
use kurbo::Size;

/// Part of a node that has to remain inside its parent, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinVisible {
    pub width: f64,
    pub height: f64,
}

impl MinVisible {
    /// Threshold for a node of `class` and `size`.
    ///
    /// `bound_space` overrides everything with `dimension - 2 * bound_space`.
    /// Otherwise classes that require full visibility use the whole dimension
    /// and the rest use `max(floor, dimension * ratio)`.
    pub fn resolve(
        class: NodeClass,
        size: Size,
        bound_space: Option<f64>,
        config: &ConstraintConfig,
    ) -> Self {
        if let Some(space) = bound_space {
            return Self {
                width: size.width - space * 2.0,
                height: size.height - space * 2.0,
            };
        }
        if config.requires_full_visibility(class) {
            return Self {
                width: size.width,
                height: size.height,
            };
        }
        let partial = |d: f64| config.min_visible_floor.max(d * config.min_visible_ratio);
        Self {
            width: partial(size.width),
            height: partial(size.height),
        }
    }
}

/// Reference container for a bound check and its box.
///
/// An unknown or absent id resolves to the stage, as does a parent with zero
/// width or height.
pub fn resolve_parent(view: &impl SceneView, parent: Option<NodeId>) -> (NodeId, Bounds) {
    let root = view.root();
    let candidate = parent.filter(|id| view.contains(*id)).unwrap_or(root);
    let bounds = view.bounds(candidate);
    if candidate != root && bounds.is_degenerate() {
        return (root, view.bounds(root));
    }
    (candidate, bounds)
}

/// Whether `child` leaves less than `min` visible inside `parent`.
pub fn violates_min_visible(child: Bounds, parent: Bounds, min: MinVisible) -> bool {
    child.x + min.width > parent.x + parent.width
        || child.x + child.width - min.width < parent.x
        || child.y + min.height > parent.y + parent.height
        || child.y + child.height - min.height < parent.y
}

/// Whether a node (or a proposed box for it) is out of its parent's range.
///
/// Without `node_box` the node's bare client rect in the parent's frame is
/// used.
pub fn is_out_of_parent_range(
    view: &impl SceneView,
    config: &ConstraintConfig,
    node: NodeId,
    parent: Option<NodeId>,
    node_box: Option<Bounds>,
) -> bool {
    let (frame, parent_box) = resolve_parent(view, parent);
    let child = node_box.unwrap_or_else(|| {
        view.client_rect(node, ClientRectOptions::geometry_in(Some(frame)))
            .into()
    });
    let min = MinVisible::resolve(view.class(node), child.size(), None, config);
    violates_min_visible(child, parent_box, min)
}

/// Whether a text node renders less text than its source (ignoring
/// whitespace), meaning the box is too small.
pub fn text_overflows(view: &impl SceneView, node: NodeId) -> bool {
    if view.class(node) != NodeClass::Text {
        return false;
    }
    view.text(node).is_some_and(|content| {
        collapse_whitespace(&content.displayed()) != collapse_whitespace(&content.text)
    })
}

/// Resize bound: accept `new` unless it is negative, out of the parent's
/// range, or makes text overflow. Rejections return `old`.
pub fn transform_bound(
    view: &impl SceneView,
    config: &ConstraintConfig,
    node: NodeId,
    parent: Option<NodeId>,
    old: Bounds,
    new: Bounds,
) -> Bounds {
    if new.is_negative() {
        log::trace!("Resize of {} rejected: negative size {:?}", node, new);
        return old;
    }
    if is_out_of_parent_range(view, config, node, parent, Some(new)) {
        log::trace!("Resize of {} rejected: out of parent range", node);
        return old;
    }
    if text_overflows(view, node) {
        log::trace!("Resize of {} rejected: text overflow", node);
        return old;
    }
    new
}

/// A resize constraint for one node, applied to a fresh snapshot each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConstraint {
    pub node: NodeId,
    pub parent: Option<NodeId>,
}

impl TransformConstraint {
    pub fn new(node: NodeId, parent: Option<NodeId>) -> Self {
        Self { node, parent }
    }

    pub fn apply(
        &self,
        view: &impl SceneView,
        config: &ConstraintConfig,
        old: Bounds,
        new: Bounds,
    ) -> Bounds {
        transform_bound(view, config, self.node, self.parent, old, new)
    }
}
