//! Radius normalization configuration types

use serde::{Deserialize, Serialize};

/// Configuration for radius normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusConfig {
    /// Output width and height in pixels
    pub resolution: usize,
    /// Fraction of the solar radius kept as margin around the disk
    pub padding_factor: f64,
    /// Whether to crop to exactly `resolution × resolution`
    pub crop: bool,
    /// Spline interpolation order (0-4)
    pub order: usize,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            padding_factor: 0.1,
            crop: true,
            order: 4,
        }
    }
}

impl RadiusConfig {
    pub fn builder() -> RadiusConfigBuilder {
        RadiusConfigBuilder::default()
    }
}

/// Builder for RadiusConfig
#[derive(Default)]
pub struct RadiusConfigBuilder {
    resolution: Option<usize>,
    padding_factor: Option<f64>,
    crop: Option<bool>,
    order: Option<usize>,
}

impl RadiusConfigBuilder {
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn padding_factor(mut self, padding_factor: f64) -> Self {
        self.padding_factor = Some(padding_factor);
        self
    }

    pub fn crop(mut self, crop: bool) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    pub fn build(self) -> RadiusConfig {
        let default = RadiusConfig::default();
        RadiusConfig {
            resolution: self.resolution.unwrap_or(default.resolution),
            padding_factor: self.padding_factor.unwrap_or(default.padding_factor),
            crop: self.crop.unwrap_or(default.crop),
            order: self.order.unwrap_or(default.order),
        }
    }
}
