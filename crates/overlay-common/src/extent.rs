//! Extent (bounding box) types and operations.
//!
//! The extent defines the coordinate-to-pixel mapping of the output
//! raster: its box maps edge-to-edge onto the full canvas.

use crate::error::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in the same coordinate space as the
/// feature geometry.
///
/// Invariant: `min_x < max_x` and `min_y < max_y`. Construction does
/// not enforce this; call [`Extent::validate`] at pipeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    /// Create a new extent from corner coordinates.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Parse an extent parameter string: "xmin,xmax,ymin,ymax"
    pub fn from_param_string(s: &str) -> OverlayResult<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(OverlayError::InvalidExtent(format!(
                "expected 'xmin,xmax,ymin,ymax', got '{}'",
                s
            )));
        }

        let mut vals = [0.0f64; 4];
        for (v, part) in vals.iter_mut().zip(&parts) {
            *v = part.trim().parse().map_err(|_| {
                OverlayError::InvalidExtent(format!("invalid number '{}'", part))
            })?;
        }

        Ok(Self::new(vals[0], vals[1], vals[2], vals[3]))
    }

    /// Check the `min < max` invariant on both axes.
    ///
    /// Non-finite bounds are rejected as well; a degenerate extent has
    /// no defined pixel mapping.
    pub fn validate(&self) -> OverlayResult<()> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(OverlayError::InvalidExtent(
                "extent bounds must be finite".to_string(),
            ));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(OverlayError::InvalidExtent(format!(
                "degenerate extent: x [{}, {}], y [{}, {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    /// Width of the extent in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the extent in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this extent.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_string() {
        let e = Extent::from_param_string("-125.0,-66.0,24.0,50.0").unwrap();
        assert_eq!(e.min_x, -125.0);
        assert_eq!(e.max_x, -66.0);
        assert_eq!(e.min_y, 24.0);
        assert_eq!(e.max_y, 50.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Extent::from_param_string("1,2,3").is_err());
        assert!(Extent::from_param_string("a,b,c,d").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Extent::new(0.0, 10.0, 0.0, 10.0).validate().is_ok());
        assert!(Extent::new(10.0, 0.0, 0.0, 10.0).validate().is_err());
        assert!(Extent::new(0.0, 10.0, 5.0, 5.0).validate().is_err());
        assert!(Extent::new(0.0, f64::NAN, 0.0, 10.0).validate().is_err());
    }

    #[test]
    fn test_contains_point() {
        let e = Extent::new(0.0, 10.0, 0.0, 10.0);
        assert!(e.contains_point(5.0, 5.0));
        assert!(e.contains_point(0.0, 10.0));
        assert!(!e.contains_point(-0.1, 5.0));
    }
}
