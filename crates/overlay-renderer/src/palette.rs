//! Palette resolution: from a palette specification to one fill color
//! per cropped feature.
//!
//! The resolver walks a fixed decision table:
//!
//! 1. `Transparent` short-circuits: no fill at all.
//! 2. A color ramp is invoked with the feature count to obtain a
//!    concrete sequence.
//! 3. Without a data column the sequence recycles cyclically and must
//!    evenly divide the feature count.
//! 4. With a data column, numeric values select by linear rescale into
//!    the sequence, text values select by palette name. Unmatched
//!    values become rendering gaps, never errors.

use overlay_common::{AttrValue, FeatureSet, OverlayError, OverlayResult, Rgba};
use std::fmt;

/// A callable palette: feature count in, that many colors out.
pub struct ColorRamp(Box<dyn Fn(usize) -> Vec<Rgba> + Send + Sync>);

impl ColorRamp {
    pub fn new(f: impl Fn(usize) -> Vec<Rgba> + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Produce a sequence for `count` features.
    pub fn colors(&self, count: usize) -> Vec<Rgba> {
        (self.0)(count)
    }
}

impl fmt::Debug for ColorRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ColorRamp(..)")
    }
}

/// How to fill the cropped features.
#[derive(Debug)]
pub enum PaletteSpec {
    /// Explicit "no fill" sentinel; only borders may be drawn.
    Transparent,

    /// One color for every feature.
    Single(Rgba),

    /// An ordered color list, recycled across features.
    Sequence(Vec<Rgba>),

    /// An ordered name-to-color mapping, for categorical columns.
    Named(Vec<(String, Rgba)>),

    /// A function from feature count to a color list of that length.
    Ramp(ColorRamp),
}

impl PaletteSpec {
    /// Parse a palette from JSON: a color string (or `"transparent"`),
    /// an array of colors, or a name-to-color object.
    pub fn from_json(json: &str) -> OverlayResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| OverlayError::InvalidPalette(e.to_string()))?;

        match value {
            serde_json::Value::Null => Ok(PaletteSpec::Transparent),
            serde_json::Value::String(s) => {
                if s.eq_ignore_ascii_case("transparent") || s.eq_ignore_ascii_case("none") {
                    Ok(PaletteSpec::Transparent)
                } else {
                    Ok(PaletteSpec::Single(Rgba::parse(&s)?))
                }
            }
            serde_json::Value::Array(_) => {
                let colors: Vec<Rgba> = serde_json::from_value(value)
                    .map_err(|e| OverlayError::InvalidPalette(e.to_string()))?;
                Ok(PaletteSpec::Sequence(colors))
            }
            serde_json::Value::Object(map) => {
                let mut named = Vec::with_capacity(map.len());
                for (name, v) in map {
                    let color: Rgba = serde_json::from_value(v)
                        .map_err(|e| OverlayError::InvalidPalette(e.to_string()))?;
                    named.push((name, color));
                }
                Ok(PaletteSpec::Named(named))
            }
            other => Err(OverlayError::InvalidPalette(format!(
                "expected color, color list, or name-to-color map, got {}",
                other
            ))),
        }
    }
}

/// Resolved fill colors, aligned to the cropped feature sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FillColors {
    /// Skip the fill pass entirely.
    Transparent,

    /// One entry per feature; `None` is a documented rendering gap
    /// (that feature's interior stays unpainted).
    PerFeature(Vec<Option<Rgba>>),
}

impl FillColors {
    pub fn is_transparent(&self) -> bool {
        matches!(self, FillColors::Transparent)
    }
}

/// Resolve fill colors for the (already cropped) feature set.
///
/// `data_column` names the attribute column that drives the mapping;
/// without it the palette recycles cyclically. A column missing from
/// every feature logs a warning and falls back to recycling.
pub fn resolve_fill(
    features: &FeatureSet,
    spec: &PaletteSpec,
    data_column: Option<&str>,
) -> OverlayResult<FillColors> {
    let n = features.len();

    let (colors, names): (Vec<Rgba>, Option<Vec<&str>>) = match spec {
        PaletteSpec::Transparent => return Ok(FillColors::Transparent),
        PaletteSpec::Single(c) => (vec![*c], None),
        PaletteSpec::Sequence(seq) => (seq.clone(), None),
        PaletteSpec::Named(pairs) => (
            pairs.iter().map(|(_, c)| *c).collect(),
            Some(pairs.iter().map(|(name, _)| name.as_str()).collect()),
        ),
        PaletteSpec::Ramp(ramp) => (ramp.colors(n), None),
    };

    if colors.is_empty() {
        return Err(OverlayError::InvalidPalette(
            "palette produced no colors".to_string(),
        ));
    }

    let column = match data_column {
        Some(col) if features.has_column(col) => col,
        Some(col) => {
            tracing::warn!(
                column = col,
                "attribute column not found; falling back to cyclic palette assignment"
            );
            return recycle(&colors, n);
        }
        None => return recycle(&colors, n),
    };

    let values: Vec<Option<&AttrValue>> =
        features.iter().map(|f| f.attribute(column)).collect();

    let resolved = if is_numeric_column(&values) {
        map_numeric(&values, &colors)
    } else {
        map_categorical(&values, &colors, names.as_deref())
    };

    tracing::debug!(
        column,
        features = n,
        painted = resolved.iter().filter(|c| c.is_some()).count(),
        "resolved attribute-driven fill colors"
    );

    Ok(FillColors::PerFeature(resolved))
}

/// Cyclic assignment; the sequence length must evenly divide the
/// feature count.
fn recycle(colors: &[Rgba], n: usize) -> OverlayResult<FillColors> {
    if n % colors.len() != 0 {
        return Err(OverlayError::PaletteCardinality {
            colors: colors.len(),
            features: n,
        });
    }
    Ok(FillColors::PerFeature(
        (0..n).map(|i| Some(colors[i % colors.len()])).collect(),
    ))
}

/// A column is numeric when every present value is a finite number.
fn is_numeric_column(values: &[Option<&AttrValue>]) -> bool {
    let mut any_present = false;
    for v in values.iter().flatten() {
        any_present = true;
        match v.as_number() {
            Some(x) if x.is_finite() => {}
            _ => return false,
        }
    }
    any_present
}

/// Continuous colormap: rescale each value into `[0, k)` and truncate.
///
/// `min`/`max` come from the present values only. The exact top of the
/// range truncates to `k`, one past the last entry; that index is
/// clamped to `k - 1` so the max-valued feature is painted. Missing
/// values stay unpainted.
fn map_numeric(values: &[Option<&AttrValue>], colors: &[Rgba]) -> Vec<Option<Rgba>> {
    let k = colors.len();

    let present: Vec<f64> = values
        .iter()
        .flatten()
        .filter_map(|v| v.as_number())
        .collect();
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|value| {
            let v = (*value)?.as_number()?;
            // A zero-width range maps everything to the first entry.
            let idx = if range == 0.0 {
                0
            } else {
                ((v - min) / range * k as f64).trunc() as usize
            };
            Some(colors[idx.min(k - 1)])
        })
        .collect()
}

/// Categorical mapping: match attribute text against palette names.
///
/// An unnamed palette or an unmatched value yields a gap for that
/// feature, not an error.
fn map_categorical(
    values: &[Option<&AttrValue>],
    colors: &[Rgba],
    names: Option<&[&str]>,
) -> Vec<Option<Rgba>> {
    let Some(names) = names else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|value| {
            let key = match (*value)? {
                AttrValue::Text(s) => s.clone(),
                AttrValue::Number(x) => x.to_string(),
            };
            names
                .iter()
                .position(|name| *name == key)
                .map(|i| colors[i])
        })
        .collect()
}
