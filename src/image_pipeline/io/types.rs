//! Map store configuration types

use serde::{Deserialize, Serialize};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced (default)
    #[default]
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Configuration for the TIFF map store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Whether to write the header sidecar next to the image
    pub write_header: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::default(),
            write_header: true,
        }
    }
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    compression: Option<TiffCompression>,
    write_header: Option<bool>,
}

impl StoreConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn write_header(mut self, enable: bool) -> Self {
        self.write_header = Some(enable);
        self
    }

    pub fn build(self) -> StoreConfig {
        let default = StoreConfig::default();
        StoreConfig {
            compression: self.compression.unwrap_or(default.compression),
            write_header: self.write_header.unwrap_or(default.write_header),
        }
    }
}
