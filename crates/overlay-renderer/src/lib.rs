//! Styled polygon overlay rendering.
//!
//! Turns a set of attributed polygon features into a transparent-background
//! RGBA raster aligned to a bounding extent, ready for alpha-compositing
//! over another raster of the same dimensions. Four stages:
//!
//! - Extent cropping (clip features to the bounding box)
//! - Palette resolution (fill color per feature)
//! - Border style resolution
//! - Rasterization (painter's-order fills, then borders)

pub mod crop;
pub mod overlay;
pub mod palette;
pub mod png;
pub mod raster;
pub mod style;

pub use crop::crop_features;
pub use overlay::{OutputSize, OverlayRenderer, OverlayRequest};
pub use palette::{resolve_fill, ColorRamp, FillColors, PaletteSpec};
pub use png::{encode_png, encode_png_rgba};
pub use raster::{
    build_scene, MapTransform, OverlayRaster, PolygonRasterizer, Scene, ScenePolygon,
    SkiaRasterizer,
};
pub use style::{BorderSpec, ResolvedBorder};
