//! End-to-end pipeline tests: crop, palette, border, rasterize.
//!
//! Pixel assertions sample well inside filled regions so anti-aliased
//! edges never affect the expected values.

use overlay_common::{Extent, Feature, FeatureSet, OverlayError, Rgba};
use overlay_renderer::{
    encode_png, BorderSpec, OutputSize, OverlayRenderer, OverlayRequest, PaletteSpec,
};

const RED: Rgba = Rgba::opaque(255, 0, 0);
const BLUE: Rgba = Rgba::opaque(0, 0, 255);

fn square(min: f64, max: f64) -> Vec<(f64, f64)> {
    vec![(min, min), (min, max), (max, max), (max, min)]
}

fn extent_0_10() -> Extent {
    Extent::new(0.0, 10.0, 0.0, 10.0)
}

#[test]
fn test_single_color_square() {
    // Data square [2,8]x[2,8] maps to pixels [20,80]x[20,80] on a
    // 100x100 canvas.
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(2.0, 8.0))),
        extent_0_10(),
        OutputSize::new(100, 100),
    )
    .with_palette(PaletteSpec::Single(RED));

    let raster = OverlayRenderer::new().render(&request).unwrap();

    assert_eq!(raster.pixel(50, 50), [255, 0, 0, 255]);
    assert_eq!(raster.pixel(25, 75), [255, 0, 0, 255]);

    // Outside the square the overlay is fully transparent.
    assert_eq!(raster.pixel(5, 5)[3], 0);
    assert_eq!(raster.pixel(95, 95)[3], 0);
}

#[test]
fn test_transparent_palette_with_border_is_outline_only() {
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(2.0, 8.0))),
        extent_0_10(),
        OutputSize::new(100, 100),
    )
    .with_palette(PaletteSpec::Transparent)
    .with_border(BorderSpec {
        color: Rgba::opaque(0, 0, 0),
        width: Some(2.0),
    });

    let raster = OverlayRenderer::new().render(&request).unwrap();

    // Interior stays transparent.
    assert_eq!(raster.pixel(50, 50)[3], 0);

    // The ring edge at x=20 is stroked.
    assert!(raster.pixel(20, 50)[3] > 0);
}

#[test]
fn test_no_border_by_default() {
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(2.0, 8.0))),
        extent_0_10(),
        OutputSize::new(100, 100),
    )
    .with_palette(PaletteSpec::Transparent);

    let raster = OverlayRenderer::new().render(&request).unwrap();
    assert!(raster.data.iter().all(|&b| b == 0));
}

#[test]
fn test_painters_order_later_feature_wins_overlap() {
    let features = FeatureSet::new()
        .with_feature(Feature::polygon(square(2.0, 6.0)))
        .with_feature(Feature::polygon(square(4.0, 8.0)));

    let request = OverlayRequest::new(features, extent_0_10(), OutputSize::new(100, 100))
        .with_palette(PaletteSpec::Sequence(vec![RED, BLUE]));

    let raster = OverlayRenderer::new().render(&request).unwrap();

    // Red-only region (y axis is flipped: data y=3 is row 70).
    assert_eq!(raster.pixel(30, 70), [255, 0, 0, 255]);
    // Blue-only region.
    assert_eq!(raster.pixel(70, 30), [0, 0, 255, 255]);
    // Overlap: the second feature paints over the first.
    assert_eq!(raster.pixel(50, 50), [0, 0, 255, 255]);
}

#[test]
fn test_inner_ring_cuts_hole() {
    let feature = Feature {
        rings: vec![square(2.0, 8.0), square(4.0, 6.0)],
        attributes: Default::default(),
    };

    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(feature),
        extent_0_10(),
        OutputSize::new(100, 100),
    )
    .with_palette(PaletteSpec::Single(RED));

    let raster = OverlayRenderer::new().render(&request).unwrap();

    // Annulus is painted, hole is not.
    assert_eq!(raster.pixel(25, 50), [255, 0, 0, 255]);
    assert_eq!(raster.pixel(50, 50)[3], 0);
}

#[test]
fn test_unmatched_category_leaves_gap() {
    let features = FeatureSet::new()
        .with_feature(Feature::polygon(square(1.0, 4.0)).with_attribute("zone", "known"))
        .with_feature(Feature::polygon(square(6.0, 9.0)).with_attribute("zone", "mystery"));

    let request = OverlayRequest::new(features, extent_0_10(), OutputSize::new(100, 100))
        .with_palette(PaletteSpec::Named(vec![("known".to_string(), RED)]))
        .with_data_column("zone");

    let raster = OverlayRenderer::new().render(&request).unwrap();

    // Matched feature: data (2.5, 2.5) is pixel (25, 75).
    assert_eq!(raster.pixel(25, 75), [255, 0, 0, 255]);
    // Unmatched feature stays unpainted: data (7.5, 7.5) is pixel (75, 25).
    assert_eq!(raster.pixel(75, 25)[3], 0);
}

#[test]
fn test_features_outside_extent_yield_transparent_raster() {
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(100.0, 110.0))),
        extent_0_10(),
        OutputSize::new(64, 64),
    )
    .with_palette(PaletteSpec::Single(RED));

    let raster = OverlayRenderer::new().render(&request).unwrap();
    assert_eq!(raster.width, 64);
    assert_eq!(raster.height, 64);
    assert!(raster.data.iter().all(|&b| b == 0));
}

#[test]
fn test_cropped_feature_still_painted_inside() {
    // Straddles the right edge; the surviving part is painted.
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(8.0, 14.0))),
        extent_0_10(),
        OutputSize::new(100, 100),
    )
    .with_palette(PaletteSpec::Single(RED));

    let raster = OverlayRenderer::new().render(&request).unwrap();

    // Data (9, 9) is pixel (90, 10), inside the clipped remainder.
    assert_eq!(raster.pixel(90, 10), [255, 0, 0, 255]);
    // Left of the feature stays transparent.
    assert_eq!(raster.pixel(50, 50)[3], 0);
}

#[test]
fn test_palette_cardinality_error_propagates() {
    let features = FeatureSet::new()
        .with_feature(Feature::polygon(square(1.0, 2.0)))
        .with_feature(Feature::polygon(square(3.0, 4.0)))
        .with_feature(Feature::polygon(square(5.0, 6.0)));

    let request = OverlayRequest::new(features, extent_0_10(), OutputSize::new(32, 32))
        .with_palette(PaletteSpec::Sequence(vec![RED, BLUE]));

    let err = OverlayRenderer::new().render(&request).unwrap_err();
    assert!(matches!(
        err,
        OverlayError::PaletteCardinality {
            colors: 2,
            features: 3
        }
    ));
}

#[test]
fn test_empty_feature_set_rejected() {
    let request = OverlayRequest::new(FeatureSet::new(), extent_0_10(), OutputSize::new(32, 32));
    let err = OverlayRenderer::new().render(&request).unwrap_err();
    assert!(matches!(err, OverlayError::MissingGeometry(_)));
}

#[test]
fn test_render_then_encode_png() {
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(2.0, 8.0))),
        extent_0_10(),
        OutputSize::new(64, 64),
    )
    .with_palette(PaletteSpec::Single(RED))
    .with_border(BorderSpec::with_width(1.0));

    let raster = OverlayRenderer::new().render(&request).unwrap();
    let png = encode_png(&raster).unwrap();

    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert!(png.windows(4).any(|w| w == b"IEND"));
}

#[test]
fn test_repeated_renders_are_identical() {
    let request = OverlayRequest::new(
        FeatureSet::new().with_feature(Feature::polygon(square(2.0, 8.0))),
        extent_0_10(),
        OutputSize::new(64, 64),
    )
    .with_palette(PaletteSpec::Single(RED));

    let renderer = OverlayRenderer::new();
    let first = renderer.render(&request).unwrap();
    let second = renderer.render(&request).unwrap();
    assert_eq!(first, second);
}
