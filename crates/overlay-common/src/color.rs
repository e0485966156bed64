//! RGBA color type with hex and named-color parsing.

use crate::error::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Parse a color from a string: `#RRGGBB`, `#RRGGBBAA`, or a
    /// well-known color name ("red", "steelblue", ...).
    pub fn parse(s: &str) -> OverlayResult<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') || trimmed.len() == 6 || trimmed.len() == 8 {
            if let Some(c) = parse_hex(trimmed) {
                return Ok(c);
            }
        }
        named_color(trimmed)
            .ok_or_else(|| OverlayError::InvalidColor(format!("unrecognized color '{}'", s)))
    }

    /// Pack as `[r, g, b, a]` bytes.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl std::str::FromStr for Rgba {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::parse(s)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(s) => Rgba::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.len() {
                3 => Ok(Rgba::opaque(v[0], v[1], v[2])),
                4 => Ok(Rgba::new(v[0], v[1], v[2], v[3])),
                n => Err(serde::de::Error::custom(format!(
                    "color array must have 3 or 4 components, got {}",
                    n
                ))),
            },
        }
    }
}

/// Parse a hex color string to RGBA. Accepts an optional leading '#'.
fn parse_hex(hex: &str) -> Option<Rgba> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        6 => Some(Rgba::opaque(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => Some(Rgba::new(
            byte(0..2)?,
            byte(2..4)?,
            byte(4..6)?,
            byte(6..8)?,
        )),
        _ => None,
    }
}

/// Look up a well-known color name (case-insensitive).
///
/// Covers the names callers commonly pass for fills and borders; this
/// is not a full CSS table.
fn named_color(name: &str) -> Option<Rgba> {
    let (r, g, b) = match name.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "grey" | "gray" => (128, 128, 128),
        "darkgrey" | "darkgray" => (169, 169, 169),
        "lightgrey" | "lightgray" => (211, 211, 211),
        "steelblue" => (70, 130, 180),
        "forestgreen" => (34, 139, 34),
        "goldenrod" => (218, 165, 32),
        "firebrick" => (178, 34, 34),
        "navy" => (0, 0, 128),
        "transparent" => return Some(Rgba::TRANSPARENT),
        _ => return None,
    };
    Some(Rgba::opaque(r, g, b))
}
