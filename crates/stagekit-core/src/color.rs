//! CSS color parsing and caret color selection.
//!
//! Hex and `rgb()`/`rgba()` strings are parsed directly. Anything else goes
//! through a [`ColorNormalizer`] that rewrites it into `rgb()` form, which is
//! then parsed again. The default normalizer is backed by peniko's CSS color
//! parser.

use crate::node::{NodeId, SceneView};
use peniko::Color;
use peniko::color::{Srgb, parse_color as parse_css_color};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stroke color assumed when a node has none.
pub const DEFAULT_STROKE: &str = "#ffffff";

/// Fill color assumed when a node has none.
pub const DEFAULT_FILL: &str = "#000000";

/// Caret color used when neither stroke nor fill parse.
pub const FALLBACK_CARET: &str = "black";

/// Why a color string was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Empty color string")]
    Empty,
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Invalid color component: {0}")]
    InvalidComponent(String),
    #[error("Unrecognized color: {0}")]
    Unrecognized(String),
}

/// An sRGB color with channels in `[0, 255]` and alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255.0, 255.0, 255.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Relative luminance of the color channels (alpha ignored).
    pub fn luminance(&self) -> f64 {
        relative_luminance(self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)` string, alpha dropped.
    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_with(s, &CssNormalizer)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba8 = color.to_rgba8();
        Self::new(
            f64::from(rgba8.r),
            f64::from(rgba8.g),
            f64::from(rgba8.b),
            f64::from(color.components[3]),
        )
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::new([
            (c.r / 255.0) as f32,
            (c.g / 255.0) as f32,
            (c.b / 255.0) as f32,
            c.a as f32,
        ])
    }
}

/// Rewrites arbitrary CSS color syntax into `rgb()`/`rgba()` form.
pub trait ColorNormalizer {
    fn normalize(&self, input: &str) -> Option<String>;
}

/// Normalizer backed by peniko's CSS color parser (named colors, `hsl()`,
/// modern space-separated syntax and so on).
#[derive(Debug, Clone, Copy, Default)]
pub struct CssNormalizer;

impl ColorNormalizer for CssNormalizer {
    fn normalize(&self, input: &str) -> Option<String> {
        let color: Color = parse_css_color(input).ok()?.to_alpha_color::<Srgb>();
        let c = Rgba::from(color);
        if c.a >= 1.0 {
            Some(c.to_rgb_string())
        } else {
            Some(c.to_string())
        }
    }
}

/// Parse a CSS color. Unparsable input yields `None`.
pub fn parse_color(input: &str) -> Option<Rgba> {
    parse_color_with(input, &CssNormalizer)
}

/// Parse a CSS color with a custom fallback normalizer.
pub fn parse_color_with(input: &str, normalizer: &dyn ColorNormalizer) -> Option<Rgba> {
    match parse_with(input, normalizer) {
        Ok(color) => Some(color),
        Err(err) => {
            log::trace!("{}", err);
            None
        }
    }
}

fn parse_with(input: &str, normalizer: &dyn ColorNormalizer) -> Result<Rgba, ColorParseError> {
    let c = input.trim();
    if c.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if let Some(hex) = c.strip_prefix('#') {
        if matches!(hex.len(), 3 | 4 | 6 | 8) {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(c.to_string()));
        }
    }
    // Comma-separated rgb() is read directly; anything else, including the
    // space-separated form, goes through the normalizer.
    let direct = rgb_function_args(c).map(|args| parse_rgb_args(args, c));
    if let Some(Ok(color)) = direct {
        return Ok(color);
    }
    let normalized = normalizer.normalize(c).and_then(|norm| {
        rgb_function_args(&norm).and_then(|args| parse_rgb_args(args, &norm).ok())
    });
    match (normalized, direct) {
        (Some(color), _) => Ok(color),
        (None, Some(Err(err))) => Err(err),
        (None, _) => Err(ColorParseError::Unrecognized(c.to_string())),
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
    let short = hex.len() <= 4;
    let digits: Vec<String> = if short {
        hex.chars().map(|ch| format!("{ch}{ch}")).collect()
    } else {
        hex.as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect()
    };
    let r = channel(&digits[0])?;
    let g = channel(&digits[1])?;
    let b = channel(&digits[2])?;
    let a = match digits.get(3) {
        Some(d) => channel(d)? / 255.0,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}

/// Inner argument list of `rgb(...)` / `rgba(...)`, case-insensitive.
fn rgb_function_args(c: &str) -> Option<&str> {
    let lower = c.to_ascii_lowercase();
    let open = if lower.starts_with("rgba(") {
        5
    } else if lower.starts_with("rgb(") {
        4
    } else {
        return None;
    };
    let inner = c.get(open..)?.strip_suffix(')')?;
    if inner.is_empty() || inner.contains(')') {
        return None;
    }
    Some(inner)
}

fn parse_rgb_args(args: &str, source: &str) -> Result<Rgba, ColorParseError> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(ColorParseError::Unrecognized(source.to_string()));
    }
    let number = |s: &str| {
        s.trim_end_matches('%')
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(|| ColorParseError::InvalidComponent(s.to_string()))
    };
    let r = number(parts[0])?.clamp(0.0, 255.0);
    let g = number(parts[1])?.clamp(0.0, 255.0);
    let b = number(parts[2])?.clamp(0.0, 255.0);
    let a = match parts.get(3) {
        Some(p) => number(p)?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Ok(Rgba::new(r, g, b, a))
}

/// sRGB relative luminance: 0 for black, 1 for white.
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    let to_linear = |v: f64| {
        let c = v / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * to_linear(r) + 0.7152 * to_linear(g) + 0.0722 * to_linear(b)
}

/// Composite a color over opaque white. Non-finite alpha counts as opaque.
pub fn composite_over_white(c: Rgba) -> Rgba {
    let a = if c.a.is_finite() { c.a } else { 1.0 };
    if a >= 1.0 {
        return Rgba { a: 1.0, ..c };
    }
    let blend = |v: f64| (v * a + 255.0 * (1.0 - a)).round();
    Rgba::new(blend(c.r), blend(c.g), blend(c.b), 1.0)
}

/// Choose a readable caret color from a stroke and fill.
///
/// Missing or empty values fall back to white stroke and black fill. When
/// both parse, the darker one (after compositing over white) wins; ties go
/// to the stroke.
pub fn pick_caret_color(stroke: Option<&str>, fill: Option<&str>) -> String {
    let stroke = stroke.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_STROKE);
    let fill = fill.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_FILL);
    let darker = match (parse_color(stroke), parse_color(fill)) {
        (None, None) => return FALLBACK_CARET.to_string(),
        (Some(s), None) => composite_over_white(s),
        (None, Some(f)) => composite_over_white(f),
        (Some(s), Some(f)) => {
            let cs = composite_over_white(s);
            let cf = composite_over_white(f);
            if cs.luminance() <= cf.luminance() { cs } else { cf }
        }
    };
    darker.to_rgb_string()
}

/// Caret color for a node, read from its stroke and fill.
pub fn caret_color_for(view: &impl SceneView, node: NodeId) -> String {
    pick_caret_color(view.stroke(node), view.fill(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgba(c: Rgba, r: f64, g: f64, b: f64, a: f64) {
        assert!((c.r - r).abs() < 1e-9, "r: {} != {}", c.r, r);
        assert!((c.g - g).abs() < 1e-9, "g: {} != {}", c.g, g);
        assert!((c.b - b).abs() < 1e-9, "b: {} != {}", c.b, b);
        assert!((c.a - a).abs() < 1e-6, "a: {} != {}", c.a, a);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_rgba(parse_color("#ffffff").unwrap(), 255.0, 255.0, 255.0, 1.0);
        assert_rgba(parse_color("#00000080").unwrap(), 0.0, 0.0, 0.0, 128.0 / 255.0);
        assert_rgba(parse_color("#f0a").unwrap(), 255.0, 0.0, 170.0, 1.0);
        assert_rgba(parse_color("  #0f08 ").unwrap(), 0.0, 255.0, 0.0, 136.0 / 255.0);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_color("not-a-color").is_none());
        assert!(parse_color("").is_none());
        assert!(parse_color("#zzzzzz").is_none());
        assert!(parse_color("rgb(1, 2)").is_none());
        assert_eq!(
            "#gg0000".parse::<Rgba>().unwrap_err(),
            ColorParseError::InvalidHex("#gg0000".into())
        );
    }

    #[test]
    fn test_parse_rgb_clamps() {
        assert_rgba(parse_color("rgba(300, -5, 10, 2)").unwrap(), 255.0, 0.0, 10.0, 1.0);
        assert_rgba(parse_color("RGB(1, 2, 3)").unwrap(), 1.0, 2.0, 3.0, 1.0);
        assert_rgba(parse_color("rgba(10,20,30,0.25)").unwrap(), 10.0, 20.0, 30.0, 0.25);
    }

    #[test]
    fn test_parse_via_normalizer() {
        assert_rgba(parse_color("red").unwrap(), 255.0, 0.0, 0.0, 1.0);
        assert_rgba(parse_color("hsl(120, 100%, 50%)").unwrap(), 0.0, 255.0, 0.0, 1.0);
    }

    #[test]
    fn test_space_separated_rgb_uses_normalizer() {
        assert_rgba(parse_color("rgb(255 0 0)").unwrap(), 255.0, 0.0, 0.0, 1.0);
        assert_rgba(parse_color("rgb(255 0 0 / 50%)").unwrap(), 255.0, 0.0, 0.0, 0.5);
        assert_rgba(
            parse_color_with("rgb(1 2)", &FixedNormalizer).unwrap(),
            1.0,
            2.0,
            3.0,
            0.5,
        );
    }

    struct RejectingNormalizer;

    impl ColorNormalizer for RejectingNormalizer {
        fn normalize(&self, _input: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_direct_error_kept_when_normalizer_fails() {
        assert_eq!(
            parse_with("rgb(1, x, 3)", &RejectingNormalizer),
            Err(ColorParseError::InvalidComponent("x".into()))
        );
        assert_eq!(
            parse_with("rgb(1 2 3)", &RejectingNormalizer),
            Err(ColorParseError::Unrecognized("rgb(1 2 3)".into()))
        );
    }

    struct FixedNormalizer;

    impl ColorNormalizer for FixedNormalizer {
        fn normalize(&self, _input: &str) -> Option<String> {
            Some("rgba(1, 2, 3, 0.5)".into())
        }
    }

    #[test]
    fn test_custom_normalizer() {
        let c = parse_color_with("anything", &FixedNormalizer).unwrap();
        assert_rgba(c, 1.0, 2.0, 3.0, 0.5);
    }

    #[test]
    fn test_luminance_extremes() {
        assert!((relative_luminance(255.0, 255.0, 255.0) - 1.0).abs() < 1e-12);
        assert!(relative_luminance(0.0, 0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_composite_over_white() {
        let white = composite_over_white(Rgba::new(0.0, 0.0, 0.0, 0.0));
        assert_rgba(white, 255.0, 255.0, 255.0, 1.0);

        let half = composite_over_white(Rgba::new(0.0, 0.0, 0.0, 0.5));
        assert_rgba(half, 128.0, 128.0, 128.0, 1.0);

        let opaque = composite_over_white(Rgba::new(10.0, 20.0, 30.0, f64::NAN));
        assert_rgba(opaque, 10.0, 20.0, 30.0, 1.0);
    }

    #[test]
    fn test_pick_caret_color() {
        assert_eq!(pick_caret_color(None, None), "rgb(0, 0, 0)");
        assert_eq!(pick_caret_color(Some("#ff0000"), Some("#ffffff")), "rgb(255, 0, 0)");
        assert_eq!(pick_caret_color(Some(""), Some("#00000080")), "rgb(127, 127, 127)");
        assert_eq!(pick_caret_color(Some("nope"), Some("nah")), "black");
        assert_eq!(pick_caret_color(Some("nope"), Some("#102030")), "rgb(16, 32, 48)");
    }

    #[test]
    fn test_peniko_roundtrip() {
        let color: Color = Rgba::new(255.0, 0.0, 0.0, 1.0).into();
        assert_eq!(color.to_rgba8().r, 255);
        let back = Rgba::from(color);
        assert_rgba(back, 255.0, 0.0, 0.0, 1.0);
    }
}
