//! Drag bounds for single nodes and multi-node selections.
//!
//! Both bounds take the pointer-driven target position of the dragged node
//! and return the position it may actually take, so that every affected node
//! keeps its [`MinVisible`] part inside the reference box.

use crate::bounds::{MinVisible, resolve_parent};
use crate::config::ConstraintConfig;
use crate::node::{Bounds, ClientRectOptions, NodeId, SceneView};
use crate::transform::{delta, to_relative};
use kurbo::{Point, Vec2};
use std::collections::HashSet;

/// Ordered set of selected nodes with one driver (the node under the
/// pointer); the others follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    driver: NodeId,
    members: Vec<NodeId>,
}

impl Selection {
    /// Selection of `members` driven by `driver`. The driver is added in
    /// front if missing; duplicates are dropped.
    pub fn new(driver: NodeId, members: impl IntoIterator<Item = NodeId>) -> Self {
        let mut seen = HashSet::new();
        let mut unique: Vec<NodeId> = members.into_iter().filter(|id| seen.insert(*id)).collect();
        if !seen.contains(&driver) {
            unique.insert(0, driver);
        }
        Self {
            driver,
            members: unique,
        }
    }

    pub fn single(node: NodeId) -> Self {
        Self {
            driver: node,
            members: vec![node],
        }
    }

    pub fn driver(&self) -> NodeId {
        self.driver
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Every member except the driver, in selection order.
    pub fn followers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied().filter(move |id| *id != self.driver)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Same members, driven by another member.
    pub fn with_driver(&self, driver: NodeId) -> Option<Self> {
        self.contains(driver).then(|| Self {
            driver,
            members: self.members.clone(),
        })
    }
}

/// Limit a delta along one axis so that the span `[start, start + extent]`
/// shifted by it keeps `min_visible` inside `[parent_start, parent_start +
/// parent_extent]`.
fn clamp_axis(
    start: f64,
    extent: f64,
    min_visible: f64,
    parent_start: f64,
    parent_extent: f64,
    delta: f64,
) -> f64 {
    if start + delta + min_visible > parent_start + parent_extent {
        parent_start + parent_extent - min_visible - start
    } else if start + delta + extent - min_visible < parent_start {
        parent_start + min_visible - (start + extent)
    } else {
        delta
    }
}

fn clamp_delta(origin: Point, child: Bounds, min: MinVisible, parent: Bounds, d: Vec2) -> Vec2 {
    Vec2::new(
        clamp_axis(origin.x, child.width, min.width, parent.x, parent.width, d.x),
        clamp_axis(origin.y, child.height, min.height, parent.y, parent.height, d.y),
    )
}

/// Bare client box of a node in its own parent's frame.
fn box_in_parent(view: &impl SceneView, node: NodeId) -> Bounds {
    view.client_rect(node, ClientRectOptions::geometry_in(view.parent(node)))
        .into()
}

/// Drag bound for a single node.
///
/// The reference box is `parent` (or the stage, see
/// [`resolve_parent`]); the node's box is taken in its own parent's frame.
/// `bound_space` overrides the minimum-visibility rule.
pub fn drag_bound(
    view: &impl SceneView,
    config: &ConstraintConfig,
    node: NodeId,
    parent: Option<NodeId>,
    bound_space: Option<f64>,
    pos: Point,
) -> Point {
    let (_, parent_box) = resolve_parent(view, parent);
    let child = box_in_parent(view, node);
    let position = view.position(node);
    let raw = delta(position, pos);
    let min = MinVisible::resolve(view.class(node), child.size(), bound_space, config);
    let d = clamp_delta(child.origin(), child, min, parent_box, raw);
    if d != raw {
        log::trace!("Drag of {} clamped from {:?} to {:?}", node, raw, d);
    }
    position + d
}

/// Per-member data for a multi-node drag.
struct Member {
    id: NodeId,
    bounds: Bounds,
    min: MinVisible,
    absolute: Point,
    nested: bool,
}

impl Member {
    fn measure(
        view: &impl SceneView,
        config: &ConstraintConfig,
        id: NodeId,
        bound_space: Option<f64>,
    ) -> Self {
        Self {
            id,
            bounds: box_in_parent(view, id),
            min: MinVisible::resolve(view.class(id), view.size(id), bound_space, config),
            absolute: view.absolute_position(id),
            nested: !view.is_top_level(id),
        }
    }
}

/// Drag bound for the driver of a multi-node selection.
///
/// The shared delta is limited against the stage box by every follower in
/// turn and finally by the driver itself, so no member leaves the stage
/// range. Followers in a different coordinate space than the driver are
/// re-expressed first:
///
/// - both nested in different containers: offset by the difference of their
///   absolute positions plus the difference of their boxes;
/// - follower top-level, driver nested: follower box origin converted into
///   the driver's parent frame;
/// - follower nested, driver top-level: follower absolute position.
pub fn drag_bound_multiple(
    view: &impl SceneView,
    config: &ConstraintConfig,
    selection: &Selection,
    bound_space: Option<f64>,
    pos: Point,
) -> Point {
    let driver = selection.driver();
    let stage_box = view.bounds(view.root());
    let position = view.position(driver);
    let raw = delta(position, pos);
    let mut d = raw;

    let lead = Member::measure(view, config, driver, bound_space);
    let lead_parent = view.parent(driver);

    for id in selection.followers() {
        let follower = Member::measure(view, config, id, bound_space);
        let same_parent = view.parent(id) == lead_parent;
        let mut base = follower.bounds.origin();
        let mut offset = Vec2::ZERO;
        if follower.nested && lead.nested && !same_parent {
            offset = (follower.absolute - lead.absolute)
                + (lead.bounds.origin() - follower.bounds.origin());
        } else if !follower.nested && lead.nested {
            if let Some(frame) = lead_parent {
                base = to_relative(view, frame, base);
            }
        } else if follower.nested && !lead.nested {
            base = follower.absolute;
        }
        let before = d;
        d = clamp_delta(base + offset, follower.bounds, follower.min, stage_box, d);
        if d != before {
            log::trace!("Group drag limited by {}: {:?} -> {:?}", follower.id, before, d);
        }
    }

    let before = d;
    d = clamp_delta(lead.bounds.origin(), lead.bounds, lead.min, stage_box, d);
    if d != before {
        log::trace!("Group drag limited by driver {}: {:?} -> {:?}", lead.id, before, d);
    }
    position + d
}

/// A drag constraint, applied to a fresh snapshot every pointer move.
#[derive(Debug, Clone, PartialEq)]
pub enum DragConstraint {
    Single {
        node: NodeId,
        parent: Option<NodeId>,
        bound_space: Option<f64>,
    },
    Multiple {
        selection: Selection,
        bound_space: Option<f64>,
    },
}

impl DragConstraint {
    /// Single-node bound for a one-member selection, group bound otherwise.
    /// `parent` only applies to the single-node case.
    pub fn for_selection(
        selection: Selection,
        parent: Option<NodeId>,
        bound_space: Option<f64>,
    ) -> Self {
        if selection.len() > 1 {
            DragConstraint::Multiple {
                selection,
                bound_space,
            }
        } else {
            DragConstraint::Single {
                node: selection.driver(),
                parent,
                bound_space,
            }
        }
    }

    /// The node whose position the bound produces.
    pub fn driver(&self) -> NodeId {
        match self {
            DragConstraint::Single { node, .. } => *node,
            DragConstraint::Multiple { selection, .. } => selection.driver(),
        }
    }

    /// Allowed position of the driver for the pointer-driven target `pos`.
    pub fn apply(&self, view: &impl SceneView, config: &ConstraintConfig, pos: Point) -> Point {
        match self {
            DragConstraint::Single {
                node,
                parent,
                bound_space,
            } => drag_bound(view, config, *node, *parent, *bound_space, pos),
            DragConstraint::Multiple {
                selection,
                bound_space,
            } => drag_bound_multiple(view, config, selection, *bound_space, pos),
        }
    }
}
