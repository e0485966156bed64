//! Polygon feature model: geometry rings plus an attribute row.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A closed polygon ring as an ordered list of `(x, y)` points.
///
/// The closing edge back to the first point is implicit; a trailing
/// duplicate of the first point is tolerated but not required.
pub type Ring = Vec<(f64, f64)>;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// The numeric value, if this attribute is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Text(_) => None,
        }
    }

    /// The text value, if this attribute is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Number(_) => None,
            AttrValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

/// One polygon (possibly multi-ring) plus its attribute row.
///
/// The first ring is the outer boundary; subsequent rings are rendered
/// as holes (even-odd fill).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub rings: Vec<Ring>,

    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
}

impl Feature {
    /// Create a feature from a single outer ring with no attributes.
    pub fn polygon(ring: Ring) -> Self {
        Self {
            rings: vec![ring],
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute value to this feature.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute by column name.
    pub fn attribute(&self, column: &str) -> Option<&AttrValue> {
        self.attributes.get(column)
    }

    /// Whether the feature carries any ring with at least 3 points.
    pub fn has_geometry(&self) -> bool {
        self.rings.iter().any(|r| r.len() >= 3)
    }
}

/// An ordered collection of features.
///
/// Insertion order is significant: it is the key that ties a resolved
/// fill color back to its polygon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
}

impl FeatureSet {
    /// Create an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature, preserving insertion order.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Whether any feature's attribute row contains the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.features
            .iter()
            .any(|f| f.attributes.contains_key(column))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}
