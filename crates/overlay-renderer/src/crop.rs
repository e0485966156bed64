//! Extent cropping: clip features to the bounding box.
//!
//! Rings are clipped with Sutherland-Hodgman against each extent edge
//! in turn. Features whose rings are removed entirely are dropped;
//! surviving features keep their attributes and relative order.

use overlay_common::{Extent, Feature, FeatureSet, OverlayError, OverlayResult, Ring};

/// Edge of the clipping extent.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    fn is_inside(&self, p: (f64, f64), extent: &Extent) -> bool {
        match self {
            Edge::Left => p.0 >= extent.min_x,
            Edge::Right => p.0 <= extent.max_x,
            Edge::Bottom => p.1 >= extent.min_y,
            Edge::Top => p.1 <= extent.max_y,
        }
    }

    fn intersect(&self, p: (f64, f64), q: (f64, f64), extent: &Extent) -> (f64, f64) {
        let (px, py) = p;
        let (qx, qy) = q;
        let dx = qx - px;
        let dy = qy - py;

        match self {
            Edge::Left => {
                let t = (extent.min_x - px) / dx;
                (extent.min_x, py + t * dy)
            }
            Edge::Right => {
                let t = (extent.max_x - px) / dx;
                (extent.max_x, py + t * dy)
            }
            Edge::Bottom => {
                let t = (extent.min_y - py) / dy;
                (px + t * dx, extent.min_y)
            }
            Edge::Top => {
                let t = (extent.max_y - py) / dy;
                (px + t * dx, extent.max_y)
            }
        }
    }
}

/// Clip a ring against one edge (Sutherland-Hodgman step).
fn clip_ring_edge(vertices: &[(f64, f64)], edge: Edge, extent: &Extent) -> Vec<(f64, f64)> {
    if vertices.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::with_capacity(vertices.len() + 4);
    let n = vertices.len();

    for i in 0..n {
        let current = vertices[i];
        let next = vertices[(i + 1) % n];

        let current_inside = edge.is_inside(current, extent);
        let next_inside = edge.is_inside(next, extent);

        match (current_inside, next_inside) {
            (true, true) => output.push(next),
            (true, false) => output.push(edge.intersect(current, next, extent)),
            (false, true) => {
                output.push(edge.intersect(current, next, extent));
                output.push(next);
            }
            (false, false) => {}
        }
    }

    output
}

/// Clip a single ring to the extent. Returns `None` when the ring lies
/// entirely outside.
fn clip_ring(ring: &Ring, extent: &Extent) -> Option<Ring> {
    let mut vertices: Vec<(f64, f64)> = ring.clone();

    // The closing vertex is implicit for the algorithm.
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    // Rings already inside the extent pass through untouched. This also
    // keeps cropping exactly idempotent: the edge loop below re-emits
    // vertices starting from the second one, which would rotate an
    // already-clipped ring.
    if vertices.iter().all(|&(x, y)| extent.contains_point(x, y)) {
        if vertices.len() < 3 {
            return None;
        }
        return Some(vertices);
    }

    for edge in [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top] {
        vertices = clip_ring_edge(&vertices, edge, extent);
        if vertices.is_empty() {
            return None;
        }
    }

    // A clipped ring needs at least a triangle to enclose area.
    if vertices.len() < 3 {
        return None;
    }

    Some(vertices)
}

/// Clip a feature set to the extent.
///
/// Fails with `InvalidExtent` when the extent is degenerate and with
/// `MissingGeometry` when the input collection is empty or carries no
/// polygon rings at all. A set emptied *by* cropping is valid output.
///
/// Cropping is idempotent: re-cropping the result with the same extent
/// returns an equal set.
pub fn crop_features(features: &FeatureSet, extent: &Extent) -> OverlayResult<FeatureSet> {
    extent.validate()?;

    if features.is_empty() {
        return Err(OverlayError::MissingGeometry(
            "feature collection is empty".to_string(),
        ));
    }
    if !features.iter().any(Feature::has_geometry) {
        return Err(OverlayError::MissingGeometry(
            "feature collection contains no polygon rings".to_string(),
        ));
    }

    let cropped: FeatureSet = features
        .iter()
        .filter_map(|feature| {
            let rings: Vec<Ring> = feature
                .rings
                .iter()
                .filter_map(|ring| clip_ring(ring, extent))
                .collect();

            if rings.is_empty() {
                return None;
            }

            Some(Feature {
                rings,
                attributes: feature.attributes.clone(),
            })
        })
        .collect();

    tracing::debug!(
        input = features.len(),
        output = cropped.len(),
        "cropped features to extent"
    );

    Ok(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(offset_x: f64, offset_y: f64) -> Feature {
        Feature::polygon(vec![
            (offset_x, offset_y),
            (offset_x + 1.0, offset_y),
            (offset_x + 1.0, offset_y + 1.0),
            (offset_x, offset_y + 1.0),
        ])
    }

    #[test]
    fn test_inside_ring_unchanged() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let set = FeatureSet::new().with_feature(unit_square(2.0, 2.0));

        let cropped = crop_features(&set, &extent).unwrap();
        assert_eq!(cropped.len(), 1);
        assert_eq!(cropped.features[0].rings[0].len(), 4);
    }

    #[test]
    fn test_outside_ring_dropped() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let set = FeatureSet::new()
            .with_feature(unit_square(2.0, 2.0))
            .with_feature(unit_square(20.0, 20.0));

        let cropped = crop_features(&set, &extent).unwrap();
        assert_eq!(cropped.len(), 1);
    }

    #[test]
    fn test_straddling_ring_clipped_to_boundary() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let set = FeatureSet::new().with_feature(unit_square(9.5, 2.0));

        let cropped = crop_features(&set, &extent).unwrap();
        assert_eq!(cropped.len(), 1);
        for &(x, y) in &cropped.features[0].rings[0] {
            assert!(x <= 10.0 && x >= 9.5, "x out of range: {}", x);
            assert!((2.0..=3.0).contains(&y), "y out of range: {}", y);
        }
    }

    #[test]
    fn test_attributes_and_order_preserved() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let set = FeatureSet::new()
            .with_feature(unit_square(1.0, 1.0).with_attribute("name", "a"))
            .with_feature(unit_square(20.0, 20.0).with_attribute("name", "gone"))
            .with_feature(unit_square(4.0, 4.0).with_attribute("name", "b"));

        let cropped = crop_features(&set, &extent).unwrap();
        let names: Vec<_> = cropped
            .iter()
            .map(|f| f.attribute("name").unwrap().as_text().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_idempotent() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let set = FeatureSet::new()
            .with_feature(unit_square(9.5, 9.5))
            .with_feature(unit_square(3.0, 3.0));

        let once = crop_features(&set, &extent).unwrap();
        let twice = crop_features(&once, &extent).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_degenerate_extent_rejected() {
        let set = FeatureSet::new().with_feature(unit_square(0.0, 0.0));
        let err = crop_features(&set, &Extent::new(5.0, 5.0, 0.0, 10.0)).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidExtent(_)));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let err = crop_features(&FeatureSet::new(), &Extent::new(0.0, 1.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, OverlayError::MissingGeometry(_)));
    }

    #[test]
    fn test_fully_cropped_set_is_valid_and_empty() {
        let extent = Extent::new(0.0, 1.0, 0.0, 1.0);
        let set = FeatureSet::new().with_feature(unit_square(5.0, 5.0));
        let cropped = crop_features(&set, &extent).unwrap();
        assert!(cropped.is_empty());
    }
}
