//! Rasterization of cropped, styled features into an RGBA buffer.
//!
//! The pipeline maps geometry into pixel space and hands a [`Scene`] of
//! pixel-space polygons to a [`PolygonRasterizer`]. Scan conversion
//! itself is the rasterizer's job; [`SkiaRasterizer`] implements it
//! with tiny-skia. Fills are painted in feature order (painter's
//! order), then all borders are stroked so no border is occluded by a
//! later feature's fill.

use crate::palette::FillColors;
use crate::style::ResolvedBorder;
use overlay_common::{Extent, FeatureSet, OverlayError, OverlayResult, Rgba};

/// A finished overlay: RGBA8 pixels with straight (non-premultiplied)
/// alpha, row-major, row 0 at the top (`max_y`). Starts fully
/// transparent; only the rasterizer mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl OverlayRaster {
    /// Read one pixel as `[r, g, b, a]`. Panics outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Linear, isotropic-per-axis mapping from extent coordinates onto the
/// full pixel canvas. No internal margins; callers pick dimensions
/// consistent with the extent's aspect ratio or accept distortion.
#[derive(Debug, Clone, Copy)]
pub struct MapTransform {
    min_x: f64,
    max_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl MapTransform {
    pub fn new(extent: &Extent, width: u32, height: u32) -> Self {
        Self {
            min_x: extent.min_x,
            max_y: extent.max_y,
            scale_x: width as f64 / extent.width(),
            scale_y: height as f64 / extent.height(),
        }
    }

    /// Map a data coordinate to pixel space (y axis flipped: larger y
    /// is further up the map, smaller row index).
    pub fn apply(&self, x: f64, y: f64) -> (f32, f32) {
        (
            ((x - self.min_x) * self.scale_x) as f32,
            ((self.max_y - y) * self.scale_y) as f32,
        )
    }
}

/// One polygon in pixel space, ready for scan conversion.
#[derive(Debug, Clone)]
pub struct ScenePolygon {
    /// Closed rings; even-odd fill, so interior rings cut holes.
    pub rings: Vec<Vec<(f32, f32)>>,

    /// Interior color; `None` leaves the interior unpainted.
    pub fill: Option<Rgba>,
}

/// Everything the rasterizer needs: pixel-space polygons in paint
/// order plus the border style applied to every ring.
#[derive(Debug, Clone)]
pub struct Scene {
    pub polygons: Vec<ScenePolygon>,
    pub border: ResolvedBorder,
}

/// Build the pixel-space scene for a cropped feature set.
///
/// `fill` must be aligned to `features` (one entry per feature) unless
/// it is `Transparent`.
pub fn build_scene(
    features: &FeatureSet,
    fill: &FillColors,
    border: ResolvedBorder,
    extent: &Extent,
    width: u32,
    height: u32,
) -> OverlayResult<Scene> {
    let per_feature: Option<&[Option<Rgba>]> = match fill {
        FillColors::Transparent => None,
        FillColors::PerFeature(v) => {
            if v.len() != features.len() {
                return Err(OverlayError::Render(format!(
                    "resolved {} fill colors for {} features",
                    v.len(),
                    features.len()
                )));
            }
            Some(v)
        }
    };

    let transform = MapTransform::new(extent, width, height);

    let polygons = features
        .iter()
        .enumerate()
        .map(|(i, feature)| ScenePolygon {
            rings: feature
                .rings
                .iter()
                .map(|ring| ring.iter().map(|&(x, y)| transform.apply(x, y)).collect())
                .collect(),
            fill: per_feature.and_then(|colors| colors[i]),
        })
        .collect();

    Ok(Scene {
        polygons,
        border,
    })
}

/// Scan conversion capability required by the pipeline.
///
/// Implementations must start from a fully transparent buffer, paint
/// fills in scene order, stroke borders after all fills, and release
/// any scratch drawing surface before returning on every path.
pub trait PolygonRasterizer {
    fn rasterize(&self, scene: &Scene, width: u32, height: u32) -> OverlayResult<OverlayRaster>;
}

/// CPU rasterizer backed by tiny-skia. Stateless; the drawing surface
/// is scoped to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaRasterizer;

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PolygonRasterizer for SkiaRasterizer {
    fn rasterize(&self, scene: &Scene, width: u32, height: u32) -> OverlayResult<OverlayRaster> {
        use tiny_skia::{
            Color, FillRule, LineCap, LineJoin, Paint, Pixmap, Stroke, Transform,
        };

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            OverlayError::Render(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        pixmap.fill(Color::TRANSPARENT);

        // Fill pass, painter's order.
        for polygon in &scene.polygons {
            let Some(fill) = polygon.fill else { continue };
            let Some(path) = polygon_path(&polygon.rings) else {
                continue;
            };

            let mut paint = Paint::default();
            paint.set_color_rgba8(fill.r, fill.g, fill.b, fill.a);
            paint.anti_alias = true;

            pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
        }

        // Stroke pass, after all fills.
        if scene.border.draw {
            let color = scene.border.color;
            let mut paint = Paint::default();
            paint.set_color_rgba8(color.r, color.g, color.b, color.a);
            paint.anti_alias = true;

            let mut stroke = Stroke::default();
            stroke.width = scene.border.width;
            stroke.line_cap = LineCap::Round;
            stroke.line_join = LineJoin::Round;

            for polygon in &scene.polygons {
                for ring in &polygon.rings {
                    let Some(path) = ring_path(ring) else { continue };
                    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                }
            }
        }

        tracing::debug!(width, height, polygons = scene.polygons.len(), "rasterized overlay");

        Ok(raster_from_pixmap(&pixmap))
    }
}

/// Build one path covering all rings of a polygon (even-odd subpaths).
fn polygon_path(rings: &[Vec<(f32, f32)>]) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    let mut any = false;

    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        pb.move_to(ring[0].0, ring[0].1);
        for &(x, y) in &ring[1..] {
            pb.line_to(x, y);
        }
        pb.close();
        any = true;
    }

    if any { pb.finish() } else { None }
}

/// Build a closed path for a single ring.
fn ring_path(ring: &[(f32, f32)]) -> Option<tiny_skia::Path> {
    if ring.len() < 3 {
        return None;
    }
    let mut pb = tiny_skia::PathBuilder::new();
    pb.move_to(ring[0].0, ring[0].1);
    for &(x, y) in &ring[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

/// Read the pixmap back as straight-alpha RGBA bytes.
fn raster_from_pixmap(pixmap: &tiny_skia::Pixmap) -> OverlayRaster {
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    OverlayRaster {
        width: pixmap.width(),
        height: pixmap.height(),
        data,
    }
}
