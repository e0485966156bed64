//! End-to-end overlay rendering.
//!
//! Ties the pipeline stages together: crop to extent, resolve fill
//! palette and border style, build the pixel-space scene, rasterize.
//! The renderer holds no state between invocations; every call starts
//! from a fresh transparent canvas.

use crate::crop::crop_features;
use crate::palette::{resolve_fill, PaletteSpec};
use crate::raster::{build_scene, OverlayRaster, PolygonRasterizer, SkiaRasterizer};
use crate::style::{BorderSpec, ResolvedBorder};
use overlay_common::{Extent, FeatureSet, OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};

/// Output raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions matching a reference grid, one pixel per cell, so the
    /// overlay composites onto that grid's raster without resampling.
    pub fn from_grid(cols: u32, rows: u32) -> Self {
        Self {
            width: cols,
            height: rows,
        }
    }

    fn validate(&self) -> OverlayResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OverlayError::Render(format!(
                "output size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// One overlay rendering job.
#[derive(Debug)]
pub struct OverlayRequest {
    pub features: FeatureSet,
    pub extent: Extent,
    pub palette: PaletteSpec,
    /// Attribute column driving palette lookups; ignored for single
    /// and transparent palettes.
    pub data_column: Option<String>,
    pub border: BorderSpec,
    pub size: OutputSize,
}

impl OverlayRequest {
    pub fn new(features: FeatureSet, extent: Extent, size: OutputSize) -> Self {
        Self {
            features,
            extent,
            palette: PaletteSpec::Transparent,
            data_column: None,
            border: BorderSpec::default(),
            size,
        }
    }

    pub fn with_palette(mut self, palette: PaletteSpec) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_data_column(mut self, column: impl Into<String>) -> Self {
        self.data_column = Some(column.into());
        self
    }

    pub fn with_border(mut self, border: BorderSpec) -> Self {
        self.border = border;
        self
    }
}

/// Renders overlay requests with a pluggable rasterizer backend.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer<R = SkiaRasterizer> {
    rasterizer: R,
}

impl OverlayRenderer<SkiaRasterizer> {
    pub fn new() -> Self {
        Self {
            rasterizer: SkiaRasterizer::new(),
        }
    }
}

impl<R: PolygonRasterizer> OverlayRenderer<R> {
    pub fn with_rasterizer(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    /// Render one overlay.
    ///
    /// Returns a raster of exactly the requested dimensions. A request
    /// whose features all fall outside the extent yields a fully
    /// transparent raster, not an error.
    pub fn render(&self, request: &OverlayRequest) -> OverlayResult<OverlayRaster> {
        request.size.validate()?;

        let cropped = crop_features(&request.features, &request.extent)?;
        let fill = resolve_fill(&cropped, &request.palette, request.data_column.as_deref())?;
        let border = ResolvedBorder::resolve(&request.border);

        let scene = build_scene(
            &cropped,
            &fill,
            border,
            &request.extent,
            request.size.width,
            request.size.height,
        )?;

        self.rasterizer
            .rasterize(&scene, request.size.width, request.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_common::Feature;

    fn square_set() -> FeatureSet {
        FeatureSet::new().with_feature(Feature::polygon(vec![
            (2.0, 2.0),
            (2.0, 8.0),
            (8.0, 8.0),
            (8.0, 2.0),
        ]))
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let request = OverlayRequest::new(
            square_set(),
            Extent::new(0.0, 10.0, 0.0, 10.0),
            OutputSize::new(0, 64),
        );
        let err = OverlayRenderer::new().render(&request).unwrap_err();
        assert!(matches!(err, OverlayError::Render(_)));
    }

    #[test]
    fn test_output_matches_requested_size() {
        let request = OverlayRequest::new(
            square_set(),
            Extent::new(0.0, 10.0, 0.0, 10.0),
            OutputSize::from_grid(37, 21),
        );
        let raster = OverlayRenderer::new().render(&request).unwrap();
        assert_eq!(raster.width, 37);
        assert_eq!(raster.height, 21);
        assert_eq!(raster.data.len(), 37 * 21 * 4);
    }
}
