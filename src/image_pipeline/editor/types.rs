//! Values threaded through an editor pipeline

use std::collections::BTreeMap;
use std::path::PathBuf;

use ndarray::Array3;

use crate::image_pipeline::map::{HeaderValue, SolarMap};

/// The value an editor consumes and produces.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorData {
    /// An image file not yet loaded
    Path(PathBuf),
    /// An image with its header
    Map(SolarMap),
    /// A `(channels, rows, cols)` array
    Array(Array3<f32>),
}

impl EditorData {
    pub fn kind(&self) -> &'static str {
        match self {
            EditorData::Path(_) => "path",
            EditorData::Map(_) => "map",
            EditorData::Array(_) => "array",
        }
    }
}

impl From<PathBuf> for EditorData {
    fn from(path: PathBuf) -> Self {
        EditorData::Path(path)
    }
}

impl From<SolarMap> for EditorData {
    fn from(map: SolarMap) -> Self {
        EditorData::Map(map)
    }
}

impl From<Array3<f32>> for EditorData {
    fn from(array: Array3<f32>) -> Self {
        EditorData::Array(array)
    }
}

/// Keyword side channel accumulated across a pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorContext {
    entries: BTreeMap<String, HeaderValue>,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds every entry of `other`, replacing existing keys.
    pub fn merge(&mut self, other: EditorContext) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Result of one editor call: the new data plus context additions.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOutput {
    pub data: EditorData,
    pub context: EditorContext,
}

impl EditorOutput {
    pub fn new(data: impl Into<EditorData>) -> Self {
        Self {
            data: data.into(),
            context: EditorContext::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.context.insert(key, value);
        self
    }
}

impl From<EditorData> for EditorOutput {
    fn from(data: EditorData) -> Self {
        EditorOutput::new(data)
    }
}
