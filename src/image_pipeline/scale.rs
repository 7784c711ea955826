//! Geometric normalization
//!
//! Spline resampling, derotation and cropping of solar maps to a canonical
//! angular sampling anchored on the solar radius.

pub mod crop;
pub mod radius;
pub mod rotate;
pub mod spline;
pub mod types;

pub use crop::{crop_resolution, submap_pixels, submap_world};
pub use radius::normalize_radius;
pub use rotate::rotate_map;
pub use spline::SplineImage;
pub use types::{RadiusConfig, RadiusConfigBuilder};
