//! Border style resolution.

use overlay_common::Rgba;
use serde::{Deserialize, Serialize};

/// Caller-facing border request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    /// Stroke color for polygon rings.
    #[serde(default = "default_border_color")]
    pub color: Rgba,

    /// Stroke width in pixels; `None` or `0` disables the border.
    #[serde(default)]
    pub width: Option<f32>,
}

fn default_border_color() -> Rgba {
    Rgba::opaque(0, 0, 0)
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            color: default_border_color(),
            width: None,
        }
    }
}

impl BorderSpec {
    /// A border of the given width in the default color.
    pub fn with_width(width: f32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// No border at all.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Resolved border style for the stroke pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBorder {
    pub draw: bool,
    pub width: f32,
    pub color: Rgba,
}

impl ResolvedBorder {
    /// Resolve a border request. Pure; a missing, zero, or negative
    /// width means no border pixels are ever sampled.
    pub fn resolve(spec: &BorderSpec) -> Self {
        match spec.width {
            Some(w) if w > 0.0 => Self {
                draw: true,
                width: w,
                color: spec.color,
            },
            _ => Self {
                draw: false,
                width: 0.0,
                color: spec.color,
            },
        }
    }
}
