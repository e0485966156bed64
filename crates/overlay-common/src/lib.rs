//! Common types shared between the overlay pipeline stages.

pub mod color;
pub mod error;
pub mod extent;
pub mod feature;

pub use color::Rgba;
pub use error::{OverlayError, OverlayResult};
pub use extent::Extent;
pub use feature::{AttrValue, Feature, FeatureSet, Ring};
