//! Patch selection configuration types

use serde::{Deserialize, Serialize};

/// Which extremum of the smoothed channel the patch is centered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Brightest,
    Darkest,
}

/// Configuration for patch selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Patch size as `(rows, cols)`
    pub patch_shape: (usize, usize),
    /// Channel searched for the extremum
    pub channel: usize,
    /// Probability of taking a uniformly random patch instead
    pub random_selection: f64,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            patch_shape: (256, 256),
            channel: 0,
            random_selection: 0.2,
        }
    }
}

impl PatchConfig {
    pub fn builder() -> PatchConfigBuilder {
        PatchConfigBuilder::default()
    }
}

/// Builder for PatchConfig
#[derive(Default)]
pub struct PatchConfigBuilder {
    patch_shape: Option<(usize, usize)>,
    channel: Option<usize>,
    random_selection: Option<f64>,
}

impl PatchConfigBuilder {
    pub fn patch_shape(mut self, rows: usize, cols: usize) -> Self {
        self.patch_shape = Some((rows, cols));
        self
    }

    pub fn channel(mut self, channel: usize) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn random_selection(mut self, probability: f64) -> Self {
        self.random_selection = Some(probability);
        self
    }

    pub fn build(self) -> PatchConfig {
        let default = PatchConfig::default();
        PatchConfig {
            patch_shape: self.patch_shape.unwrap_or(default.patch_shape),
            channel: self.channel.unwrap_or(default.channel),
            random_selection: self.random_selection.unwrap_or(default.random_selection),
        }
    }
}
