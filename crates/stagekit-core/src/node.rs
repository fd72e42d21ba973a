//! Node capability interface.
//!
//! The constraint engine never owns nodes. It reads them through
//! [`SceneView`], a snapshot of the host scene graph addressed by node id.
//! [`crate::scene::Scene`] is the reference implementation; tests and other
//! hosts can provide their own.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = Uuid;

/// Type tag of a node (the host's class name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Stage,
    Layer,
    Group,
    Rect,
    Circle,
    RegularPolygon,
    Image,
    Text,
}

impl NodeClass {
    /// Class name as the host reports it.
    pub fn name(&self) -> &'static str {
        match self {
            NodeClass::Stage => "Stage",
            NodeClass::Layer => "Layer",
            NodeClass::Group => "Group",
            NodeClass::Rect => "Rect",
            NodeClass::Circle => "Circle",
            NodeClass::RegularPolygon => "RegularPolygon",
            NodeClass::Image => "Image",
            NodeClass::Text => "Text",
        }
    }

    /// Whether nodes of this class hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeClass::Stage | NodeClass::Layer | NodeClass::Group)
    }
}

/// Axis-aligned box `{x, y, width, height}` in some coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Box from a node's position and size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when either dimension is negative.
    pub fn is_negative(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// True when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Rect::new(b.x, b.y, b.x + b.width, b.y + b.height)
    }
}

/// Options for [`SceneView::client_rect`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientRectOptions {
    /// Ignore the shadow contribution.
    pub skip_shadow: bool,
    /// Ignore the stroke contribution.
    pub skip_stroke: bool,
    /// Reference frame; `None` means absolute (stage) coordinates.
    pub relative_to: Option<NodeId>,
}

impl ClientRectOptions {
    /// Bare geometry (no shadow, no stroke) relative to `frame`.
    pub fn geometry_in(frame: Option<NodeId>) -> Self {
        Self {
            skip_shadow: true,
            skip_stroke: true,
            relative_to: frame,
        }
    }
}

/// Text content of a text node: the source string and the lines the host
/// actually rendered after wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    pub lines: Vec<String>,
}

impl TextContent {
    /// Single-line content that fits entirely.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.lines().map(str::to_string).collect();
        Self { text, lines }
    }

    /// Content with explicit rendered lines.
    pub fn with_lines(text: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            text: text.into(),
            lines,
        }
    }

    /// Rendered text joined back together.
    pub fn displayed(&self) -> String {
        self.lines.concat()
    }
}

/// Read access to the host scene graph.
///
/// Unknown ids read as default geometry; implementations must not panic.
pub trait SceneView {
    /// The stage (root container).
    fn root(&self) -> NodeId;

    /// Whether the id names a live node.
    fn contains(&self, id: NodeId) -> bool;

    /// Parent of a node (`None` for the stage).
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Class tag of a node.
    fn class(&self, id: NodeId) -> NodeClass;

    /// Position in the parent's frame.
    fn position(&self, id: NodeId) -> Point;

    /// Declared size.
    fn size(&self, id: NodeId) -> Size;

    /// Rotation in degrees.
    fn rotation(&self, id: NodeId) -> f64;

    /// Scale factors.
    fn scale(&self, id: NodeId) -> Vec2;

    /// Transform from the node's local frame to absolute coordinates.
    fn absolute_transform(&self, id: NodeId) -> Affine;

    /// Axis-aligned bounding box in the requested frame.
    fn client_rect(&self, id: NodeId, options: ClientRectOptions) -> Rect;

    /// Text content, for text nodes.
    fn text(&self, id: NodeId) -> Option<&TextContent>;

    /// Stroke color string, if any.
    fn stroke(&self, id: NodeId) -> Option<&str>;

    /// Fill color string, if any.
    fn fill(&self, id: NodeId) -> Option<&str>;

    /// The layer a node belongs to: the ancestor that is a direct child of
    /// the stage. A layer is its own layer.
    fn layer(&self, id: NodeId) -> Option<NodeId> {
        let root = self.root();
        let mut current = id;
        loop {
            match self.parent(current) {
                Some(parent) if parent == root => return Some(current),
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Whether the node sits directly in its layer (not inside a group).
    fn is_top_level(&self, id: NodeId) -> bool {
        self.parent(id) == self.layer(id)
    }

    /// Absolute position of the node's origin.
    fn absolute_position(&self, id: NodeId) -> Point {
        self.absolute_transform(id) * Point::ZERO
    }

    /// Position and size as a box in the parent's frame.
    fn bounds(&self, id: NodeId) -> Bounds {
        Bounds::from_origin_size(self.position(id), self.size(id))
    }
}
