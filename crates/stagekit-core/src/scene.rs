//! Arena-backed scene graph.
//!
//! Nodes live in a flat map keyed by [`NodeId`]; the tree is expressed with
//! parent and child id links. Removing a node drops its whole subtree and
//! unlinks it from its parent.

use crate::clip::{ClipSpec, CornerRadii};
use crate::node::{ClientRectOptions, NodeClass, NodeId, SceneView, TextContent};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Scene mutation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    #[error("Node cannot hold children: {0}")]
    InvalidParent(NodeId),
    #[error("Node id already in use: {0}")]
    DuplicateId(NodeId),
    #[error("The stage cannot be removed")]
    RootRemoval,
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Drop shadow of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f64,
}

/// Paint properties that influence client rects and caret color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_width: f64,
    pub shadow: Option<Shadow>,
}

/// What a node is, with kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Stage,
    Layer,
    Group { clip: Option<ClipSpec> },
    Rect { corner_radius: CornerRadii },
    Circle,
    RegularPolygon { sides: u32 },
    Image { url: String },
    Text(TextContent),
}

impl NodeKind {
    pub fn class(&self) -> NodeClass {
        match self {
            NodeKind::Stage => NodeClass::Stage,
            NodeKind::Layer => NodeClass::Layer,
            NodeKind::Group { .. } => NodeClass::Group,
            NodeKind::Rect { .. } => NodeClass::Rect,
            NodeKind::Circle => NodeClass::Circle,
            NodeKind::RegularPolygon { .. } => NodeClass::RegularPolygon,
            NodeKind::Image { .. } => NodeClass::Image,
            NodeKind::Text(_) => NodeClass::Text,
        }
    }
}

/// A node stored in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub(crate) id: NodeId,
    pub kind: NodeKind,
    /// Position in the parent's frame.
    pub position: Point,
    pub size: Size,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale: Vec2,
    pub draggable: bool,
    /// Requested index among siblings, applied by [`Scene::apply_z_indices`].
    /// Zero means unset.
    pub z_index: Option<i32>,
    pub style: NodeStyle,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// Create a detached node with a fresh id.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_id(Uuid::new_v4(), kind)
    }

    /// Create a detached node with a specific id.
    pub fn with_id(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            position: Point::ZERO,
            size: Size::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            draggable: false,
            z_index: None,
            style: NodeStyle::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn rect(size: Size) -> Self {
        Self::new(NodeKind::Rect {
            corner_radius: CornerRadii::default(),
        })
        .with_size(size)
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group { clip: None })
    }

    pub fn text(content: TextContent, size: Size) -> Self {
        Self::new(NodeKind::Text(content)).with_size(size)
    }

    pub fn image(url: impl Into<String>, size: Size) -> Self {
        Self::new(NodeKind::Image { url: url.into() }).with_size(size)
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Transform from this node's frame into its parent's frame.
    pub fn local_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// Geometry box in the node's own frame, before stroke and shadow.
    fn self_rect(&self) -> Rect {
        let Size { width, height } = self.size;
        match self.kind {
            NodeKind::Circle | NodeKind::RegularPolygon { .. } => {
                Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
            }
            _ => Rect::new(0.0, 0.0, width, height),
        }
    }

    /// Self rect grown by stroke and shadow as requested.
    fn painted_rect(&self, options: ClientRectOptions) -> Rect {
        let mut rect = self.self_rect();
        if !options.skip_stroke && self.style.stroke.is_some() && self.style.stroke_width > 0.0 {
            let half = self.style.stroke_width / 2.0;
            rect = rect.inflate(half, half);
        }
        if !options.skip_shadow {
            if let Some(shadow) = self.style.shadow {
                let shadow_rect = (rect + shadow.offset).inflate(shadow.blur, shadow.blur);
                rect = rect.union(shadow_rect);
            }
        }
        rect
    }
}

/// The scene: a stage and everything below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    root: NodeId,
    nodes: HashMap<NodeId, SceneNode>,
}

impl Scene {
    /// Create a scene with an empty stage of the given size.
    pub fn new(size: Size) -> Self {
        let stage = SceneNode::new(NodeKind::Stage).with_size(size);
        let root = stage.id;
        let mut nodes = HashMap::new();
        nodes.insert(root, stage);
        Self { root, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Child ids of a node, in paint order. Unknown ids have none.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Add a layer covering the stage.
    pub fn add_layer(&mut self) -> NodeId {
        let size = self.nodes.get(&self.root).map(|s| s.size).unwrap_or(Size::ZERO);
        let layer = SceneNode::new(NodeKind::Layer).with_size(size);
        let id = layer.id;
        let root = self.root;
        if let Some(stage) = self.nodes.get_mut(&root) {
            stage.children.push(id);
        }
        self.nodes.insert(id, SceneNode { parent: Some(root), ..layer });
        log::debug!("Added layer {}", id);
        id
    }

    /// Append a node as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeId, mut node: SceneNode) -> SceneResult<NodeId> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateId(id));
        }
        let parent_node = match self.nodes.get_mut(&parent) {
            Some(p) => p,
            None => {
                log::warn!("Cannot add node {}: parent {} not found", id, parent);
                return Err(SceneError::NotFound(parent));
            }
        };
        if !parent_node.kind.class().is_container() {
            return Err(SceneError::InvalidParent(parent));
        }
        parent_node.children.push(id);
        node.parent = Some(parent);
        node.children.clear();
        log::debug!("Added {} node {} under {}", node.kind.class().name(), id, parent);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node and its subtree. Returns the removed node.
    pub fn remove_node(&mut self, id: NodeId) -> SceneResult<SceneNode> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let Some(node) = self.nodes.remove(&id) else {
            log::warn!("Cannot remove node {}: not found", id);
            return Err(SceneError::NotFound(id));
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut stack = node.children.clone();
        let mut removed = 1;
        while let Some(child) = stack.pop() {
            if let Some(child_node) = self.nodes.remove(&child) {
                stack.extend(child_node.children);
                removed += 1;
            }
        }
        log::debug!("Removed node {} ({} nodes)", id, removed);
        Ok(node)
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) -> SceneResult<()> {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position = position;
                Ok(())
            }
            None => {
                log::warn!("Cannot move node {}: not found", id);
                Err(SceneError::NotFound(id))
            }
        }
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) -> SceneResult<()> {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.size = size;
                Ok(())
            }
            None => {
                log::warn!("Cannot resize node {}: not found", id);
                Err(SceneError::NotFound(id))
            }
        }
    }

    fn is_draggable(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.draggable)
    }

    /// Depth-first lookup of `id` below `scope`.
    ///
    /// A direct match is returned only when `always_return_self` is set or the
    /// match is draggable; otherwise the scan moves on. A match found inside a
    /// container is returned if it qualifies, else the container itself if the
    /// container is draggable.
    pub fn find_shape(
        &self,
        scope: NodeId,
        id: NodeId,
        always_return_self: bool,
    ) -> Option<NodeId> {
        for &child in self.children(scope) {
            let Some(node) = self.nodes.get(&child) else {
                continue;
            };
            if child == id {
                if always_return_self || node.draggable {
                    return Some(child);
                }
            } else if node.kind.class().is_container() {
                if let Some(found) = self.find_shape(child, id, always_return_self) {
                    if always_return_self || self.is_draggable(found) {
                        return Some(found);
                    } else if node.draggable {
                        return Some(child);
                    }
                }
            }
        }
        None
    }

    /// Direct child of `scope` whose subtree holds `id`.
    ///
    /// Returns `None` when `id` is itself a direct child of `scope`. The owning
    /// child is only returned if `always_return_self` is set or it is draggable.
    pub fn owning_shape(
        &self,
        scope: NodeId,
        id: NodeId,
        always_return_self: bool,
    ) -> Option<NodeId> {
        for &child in self.children(scope) {
            if child == id {
                return None;
            }
            let is_container = self
                .nodes
                .get(&child)
                .is_some_and(|n| n.kind.class().is_container());
            if is_container
                && self.find_shape(child, id, true).is_some()
                && (always_return_self || self.is_draggable(child))
            {
                return Some(child);
            }
        }
        None
    }

    /// Parent id and position among its siblings.
    pub fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes.get(&id)?.parent?;
        let index = self.children(parent).iter().position(|c| *c == id)?;
        Some((parent, index))
    }

    /// Move every node that carries a non-zero `z_index` to that index among
    /// its siblings, in document order.
    ///
    /// A `z_index` of 0 counts as unset. The node is taken out of the list
    /// first; a negative index then counts from the end of the remaining
    /// siblings and an index past the end appends.
    pub fn apply_z_indices(&mut self) {
        let order = self.descendants(self.root);
        let mut moved = 0;
        for id in order {
            let z = self.nodes.get(&id).and_then(|n| n.z_index);
            let Some(z) = z.filter(|z| *z != 0) else {
                continue;
            };
            let Some((parent, index)) = self.index_in_parent(id) else {
                continue;
            };
            let Some(siblings) = self.nodes.get_mut(&parent).map(|p| &mut p.children) else {
                continue;
            };
            if usize::try_from(z).map_or(true, |z| z >= siblings.len()) {
                log::warn!("z_index {} of node {} is outside 0..{}", z, id, siblings.len());
            }
            let child = siblings.remove(index);
            let remaining = siblings.len();
            let target = match usize::try_from(z) {
                Ok(z) => z.min(remaining),
                Err(_) => {
                    let back = usize::try_from(z.unsigned_abs()).unwrap_or(usize::MAX);
                    remaining.saturating_sub(back)
                }
            };
            siblings.insert(target, child);
            if target != index {
                moved += 1;
            }
        }
        log::debug!("Applied z-indices ({} nodes moved)", moved);
    }

    /// All nodes below `scope` in pre-order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// `scope` followed by its descendants, in pre-order.
    fn subtree(&self, scope: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(&scope) {
            return Vec::new();
        }
        let mut out = vec![scope];
        out.extend(self.descendants(scope));
        out
    }

    fn is_image(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|n| matches!(n.kind, NodeKind::Image { .. }))
    }

    /// First image node in `scope`'s subtree, `scope` included.
    pub fn first_image_node(&self, scope: NodeId) -> Option<NodeId> {
        self.subtree(scope).into_iter().find(|id| self.is_image(*id))
    }

    /// Every image node in `scope`'s subtree, `scope` included.
    pub fn image_nodes(&self, scope: NodeId) -> Vec<NodeId> {
        self.subtree(scope)
            .into_iter()
            .filter(|id| self.is_image(*id))
            .collect()
    }

    /// Every text node in `scope`'s subtree, `scope` included.
    pub fn text_nodes(&self, scope: NodeId) -> Vec<NodeId> {
        self.subtree(scope)
            .into_iter()
            .filter(|id| self.class(*id) == NodeClass::Text)
            .collect()
    }

    /// Client rect in absolute coordinates.
    fn absolute_client_rect(&self, id: NodeId, options: ClientRectOptions) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        if node.kind.class().is_container() {
            return node
                .children
                .iter()
                .filter_map(|c| self.absolute_client_rect(*c, options))
                .reduce(|a, b| a.union(b));
        }
        let rect = node.painted_rect(options);
        Some(self.absolute_transform(id).transform_rect_bbox(rect))
    }
}

impl SceneView for Scene {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn class(&self, id: NodeId) -> NodeClass {
        self.nodes
            .get(&id)
            .map(|n| n.kind.class())
            .unwrap_or(NodeClass::Rect)
    }

    fn position(&self, id: NodeId) -> Point {
        self.nodes.get(&id).map(|n| n.position).unwrap_or(Point::ZERO)
    }

    fn size(&self, id: NodeId) -> Size {
        self.nodes.get(&id).map(|n| n.size).unwrap_or(Size::ZERO)
    }

    fn rotation(&self, id: NodeId) -> f64 {
        self.nodes.get(&id).map(|n| n.rotation).unwrap_or(0.0)
    }

    fn scale(&self, id: NodeId) -> Vec2 {
        self.nodes
            .get(&id)
            .map(|n| n.scale)
            .unwrap_or(Vec2::new(1.0, 1.0))
    }

    fn absolute_transform(&self, id: NodeId) -> Affine {
        let mut transform = Affine::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            transform = node.local_transform() * transform;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        transform
    }

    fn client_rect(&self, id: NodeId, options: ClientRectOptions) -> Rect {
        let Some(rect) = self.absolute_client_rect(id, options) else {
            return Rect::ZERO;
        };
        match options.relative_to {
            Some(frame) => self
                .absolute_transform(frame)
                .inverse()
                .transform_rect_bbox(rect),
            None => rect,
        }
    }

    fn text(&self, id: NodeId) -> Option<&TextContent> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    fn stroke(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id)?.style.stroke.as_deref()
    }

    fn fill(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id)?.style.fill.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> (Scene, NodeId) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let layer = scene.add_layer();
        (scene, layer)
    }

    #[test]
    fn test_add_and_lookup() {
        let (mut scene, layer) = stage();
        let rect = scene
            .add_node(layer, SceneNode::rect(Size::new(10.0, 20.0)))
            .unwrap();
        assert_eq!(scene.parent(rect), Some(layer));
        assert_eq!(scene.layer(rect), Some(layer));
        assert_eq!(scene.layer(layer), Some(layer));
        assert!(scene.is_top_level(rect));
        assert_eq!(scene.size(layer), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_add_under_leaf_fails() {
        let (mut scene, layer) = stage();
        let rect = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let err = scene.add_node(rect, SceneNode::rect(Size::ZERO)).unwrap_err();
        assert_eq!(err, SceneError::InvalidParent(rect));
    }

    #[test]
    fn test_remove_subtree() {
        let (mut scene, layer) = stage();
        let group = scene.add_node(layer, SceneNode::group()).unwrap();
        let inner = scene.add_node(group, SceneNode::rect(Size::ZERO)).unwrap();
        let before = scene.len();

        scene.remove_node(group).unwrap();
        assert_eq!(scene.len(), before - 2);
        assert!(!scene.contains(inner));
        assert!(scene.children(layer).is_empty());
        assert_eq!(scene.remove_node(group).unwrap_err(), SceneError::NotFound(group));
        assert_eq!(scene.remove_node(scene.root()).unwrap_err(), SceneError::RootRemoval);
    }

    #[test]
    fn test_nested_absolute_transform() {
        let (mut scene, layer) = stage();
        let group = scene
            .add_node(layer, SceneNode::group().with_position(Point::new(100.0, 50.0)))
            .unwrap();
        let rect = scene
            .add_node(
                group,
                SceneNode::rect(Size::new(10.0, 10.0)).with_position(Point::new(5.0, 5.0)),
            )
            .unwrap();
        let abs = scene.absolute_position(rect);
        assert!((abs.x - 105.0).abs() < f64::EPSILON);
        assert!((abs.y - 55.0).abs() < f64::EPSILON);
        assert!(!scene.is_top_level(rect));
    }

    #[test]
    fn test_client_rect_stroke_and_shadow() {
        let (mut scene, layer) = stage();
        let style = NodeStyle {
            stroke: Some("#000".into()),
            stroke_width: 4.0,
            shadow: Some(Shadow {
                offset: Vec2::new(10.0, 0.0),
                blur: 0.0,
            }),
            ..Default::default()
        };
        let rect = scene
            .add_node(
                layer,
                SceneNode::rect(Size::new(100.0, 50.0))
                    .with_position(Point::new(20.0, 30.0))
                    .with_style(style),
            )
            .unwrap();

        let bare = scene.client_rect(rect, ClientRectOptions::geometry_in(None));
        assert_eq!(bare, Rect::new(20.0, 30.0, 120.0, 80.0));

        let stroked = scene.client_rect(
            rect,
            ClientRectOptions {
                skip_shadow: true,
                ..Default::default()
            },
        );
        assert_eq!(stroked, Rect::new(18.0, 28.0, 122.0, 82.0));

        let full = scene.client_rect(rect, ClientRectOptions::default());
        assert_eq!(full, Rect::new(18.0, 28.0, 132.0, 82.0));
    }

    #[test]
    fn test_client_rect_relative_and_rotated() {
        let (mut scene, layer) = stage();
        let group = scene
            .add_node(layer, SceneNode::group().with_position(Point::new(100.0, 100.0)))
            .unwrap();
        let rect = scene
            .add_node(
                group,
                SceneNode::rect(Size::new(100.0, 50.0)).with_rotation(90.0),
            )
            .unwrap();

        let local = scene.client_rect(rect, ClientRectOptions::geometry_in(Some(group)));
        assert!((local.x0 + 50.0).abs() < 1e-9);
        assert!((local.y0).abs() < 1e-9);
        assert!((local.width() - 50.0).abs() < 1e-9);
        assert!((local.height() - 100.0).abs() < 1e-9);

        let group_rect = scene.client_rect(group, ClientRectOptions::geometry_in(None));
        assert!((group_rect.x0 - 50.0).abs() < 1e-9);
        assert!((group_rect.y0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_group_client_rect_is_zero() {
        let (mut scene, layer) = stage();
        let group = scene.add_node(layer, SceneNode::group()).unwrap();
        assert_eq!(scene.client_rect(group, ClientRectOptions::default()), Rect::ZERO);
        assert_eq!(scene.client_rect(Uuid::new_v4(), ClientRectOptions::default()), Rect::ZERO);
    }

    #[test]
    fn test_find_shape_draggable_rule() {
        let (mut scene, layer) = stage();
        let group = scene
            .add_node(layer, SceneNode::group().with_draggable(true))
            .unwrap();
        let locked = scene.add_node(group, SceneNode::rect(Size::ZERO)).unwrap();
        let free = scene
            .add_node(layer, SceneNode::rect(Size::ZERO).with_draggable(true))
            .unwrap();
        let root = scene.root();

        assert_eq!(scene.find_shape(root, free, false), Some(free));
        // a non-draggable match is skipped even inside a draggable group
        assert_eq!(scene.find_shape(root, locked, false), None);
        assert_eq!(scene.find_shape(root, locked, true), Some(locked));
        assert_eq!(scene.find_shape(layer, group, false), Some(group));
    }

    #[test]
    fn test_find_shape_skips_non_draggable_direct_match() {
        let (mut scene, layer) = stage();
        let locked = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        assert_eq!(scene.find_shape(layer, locked, false), None);
        assert_eq!(scene.find_shape(layer, locked, true), Some(locked));
    }

    #[test]
    fn test_owning_shape() {
        let (mut scene, layer) = stage();
        let group = scene.add_node(layer, SceneNode::group()).unwrap();
        let inner = scene.add_node(group, SceneNode::rect(Size::ZERO)).unwrap();

        assert_eq!(scene.owning_shape(layer, inner, true), Some(group));
        assert_eq!(scene.owning_shape(layer, inner, false), None);
        assert_eq!(scene.owning_shape(layer, group, true), None);

        scene.node_mut(group).unwrap().draggable = true;
        assert_eq!(scene.owning_shape(layer, inner, false), Some(group));
    }

    #[test]
    fn test_index_in_parent() {
        let (mut scene, layer) = stage();
        let a = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let b = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        assert_eq!(scene.index_in_parent(a), Some((layer, 0)));
        assert_eq!(scene.index_in_parent(b), Some((layer, 1)));
        assert_eq!(scene.index_in_parent(scene.root()), None);
    }

    #[test]
    fn test_apply_z_indices() {
        let (mut scene, layer) = stage();
        let a = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let b = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let c = scene
            .add_node(layer, SceneNode::rect(Size::ZERO).with_z_index(0))
            .unwrap();
        let d = scene
            .add_node(layer, SceneNode::rect(Size::ZERO).with_z_index(99))
            .unwrap();
        scene.node_mut(a).unwrap().z_index = Some(99);

        scene.apply_z_indices();
        // a moves to the end first, c keeps its place, then d goes last
        assert_eq!(scene.children(layer), &[b, c, a, d]);
    }

    #[test]
    fn test_negative_z_index_counts_from_end() {
        let (mut scene, layer) = stage();
        let a = scene
            .add_node(layer, SceneNode::rect(Size::ZERO).with_z_index(-1))
            .unwrap();
        let b = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let c = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();
        let d = scene.add_node(layer, SceneNode::rect(Size::ZERO)).unwrap();

        scene.apply_z_indices();
        assert_eq!(scene.children(layer), &[b, c, a, d]);

        scene.node_mut(a).unwrap().z_index = Some(-10);
        scene.apply_z_indices();
        assert_eq!(scene.children(layer), &[a, b, c, d]);
    }

    #[test]
    fn test_image_and_text_discovery() {
        let (mut scene, layer) = stage();
        let group = scene.add_node(layer, SceneNode::group()).unwrap();
        let first = scene
            .add_node(group, SceneNode::image("a.png", Size::new(10.0, 10.0)))
            .unwrap();
        let text = scene
            .add_node(layer, SceneNode::text(TextContent::new("hi"), Size::ZERO))
            .unwrap();
        let second = scene
            .add_node(layer, SceneNode::image("b.png", Size::ZERO))
            .unwrap();

        assert_eq!(scene.first_image_node(layer), Some(first));
        assert_eq!(scene.image_nodes(scene.root()), vec![first, second]);
        assert_eq!(scene.text_nodes(layer), vec![text]);
        assert_eq!(scene.first_image_node(text), None);
    }

    #[test]
    fn test_unknown_ids_read_as_defaults() {
        let (scene, _) = stage();
        let ghost = Uuid::new_v4();
        assert!(!scene.contains(ghost));
        assert_eq!(scene.position(ghost), Point::ZERO);
        assert_eq!(scene.size(ghost), Size::ZERO);
        assert_eq!(scene.absolute_transform(ghost), Affine::IDENTITY);
        assert!(scene.text(ghost).is_none());
    }
}
