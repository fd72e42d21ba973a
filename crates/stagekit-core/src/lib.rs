//! stagekit core library
//!
//! Platform-agnostic geometry engine for the stagekit template composer:
//! drag and resize constraints, clip-path generation, coordinate conversion,
//! caret color selection and structural diffing of node configurations.

pub mod bounds;
pub mod clip;
pub mod color;
pub mod config;
pub mod diff;
pub mod drag;
pub mod gradient;
pub mod node;
pub mod scene;
pub mod text;
pub mod transform;

pub use bounds::{
    MinVisible, TransformConstraint, is_out_of_parent_range, resolve_parent, transform_bound,
};
pub use clip::{
    BezPathContext, ClipFn, ClipSpec, CornerRadii, DrawContext, PolygonOrigin, SvgPathContext,
    bounding_size_of_points, path_bounding_size, regular_polygon_points,
};
pub use color::{
    ColorNormalizer, ColorParseError, CssNormalizer, Rgba, caret_color_for, composite_over_white,
    parse_color, pick_caret_color, relative_luminance,
};
pub use config::{ClipConfig, ConfigError, ConfigResult, ConstraintConfig, EngineConfig};
pub use diff::{ConfigChange, ConfigValue, changes, deep_clone, structurally_equal};
pub use drag::{DragConstraint, Selection, drag_bound, drag_bound_multiple};
pub use gradient::{GradientEndpoints, gradient_endpoints};
pub use node::{Bounds, ClientRectOptions, NodeClass, NodeId, SceneView, TextContent};
pub use scene::{NodeKind, NodeStyle, Scene, SceneError, SceneNode, SceneResult, Shadow};
pub use text::{
    FontStyle, MAX_TEXT_STROKE_RANGE, collapse_whitespace, parse_font_style, text_stroke_css,
};
pub use transform::{rotate_around, to_absolute, to_relative};
