//! Text helpers.

use serde::{Deserialize, Serialize};

/// Remove every run of whitespace.
pub fn collapse_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Style and weight parsed out of a combined font style string such as
/// `"italic bold"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontStyle {
    pub style: String,
    pub weight: String,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            style: "normal".to_string(),
            weight: "normal".to_string(),
        }
    }
}

/// Split a space-separated font style into style and weight. Later tokens
/// win; unknown tokens are ignored.
pub fn parse_font_style(style: &str) -> FontStyle {
    let mut out = FontStyle::default();
    for part in style.split(' ') {
        match part {
            "normal" | "italic" | "oblique" => out.style = part.to_string(),
            "bold" | "lighter" | "bolder" => out.weight = part.to_string(),
            _ if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) => {
                out.weight = part.to_string();
            }
            _ => {}
        }
    }
    out
}

/// Largest shadow offset [`text_stroke_css`] emits on either axis.
///
/// The list grows with the square of the range, so wider strokes are drawn
/// at this range.
pub const MAX_TEXT_STROKE_RANGE: i64 = 20;

/// CSS `text-shadow` list that fakes a stroke of `width` around text.
///
/// One hard shadow per offset in `-range..=range` on both axes, where
/// `range = floor(width / 2.4)` capped at [`MAX_TEXT_STROKE_RANGE`],
/// skipping the origin.
pub fn text_stroke_css(width: f64, color: &str) -> String {
    let range = (width / 2.4).floor();
    if !range.is_finite() || range < 1.0 {
        return String::new();
    }
    let full = range as i64;
    let range = full.min(MAX_TEXT_STROKE_RANGE);
    if full > range {
        log::trace!("Text stroke {} capped at range {}", width, range);
    }
    let mut shadows = Vec::new();
    for x in -range..=range {
        for y in -range..=range {
            if x == 0 && y == 0 {
                continue;
            }
            shadows.push(format!("{x}px {y}px 0 {color}"));
        }
    }
    shadows.join(",\n")
}
