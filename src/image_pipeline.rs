//! Solar image editor pipeline
//!
//! This module provides composable editors that prepare solar observatory
//! images for downstream use, with separate modules for numeric
//! normalization, geometric normalization, patch selection, degradation
//! calibration, image I/O and the pipeline runner.

pub mod archive;
pub mod calibration;
pub mod common;
pub mod editor;
pub mod io;
pub mod map;
pub mod normalize;
pub mod patch;
pub mod scale;

pub use common::{EditorError, Result};

pub use map::{Header, HeaderValue, SolarMap};

pub use calibration::{CachedFileSource, CalibrationCache, CalibrationMode, CalibrationTableSource};

pub use io::{
    FitsMapStore, ImageReader, ImageWriter, StoreConfig, TiffCompression, TiffMapStore,
};

pub use patch::{Extremum, PatchConfig};

pub use scale::RadiusConfig;

pub use editor::{
    BrightestPixelPatchEditor, ContrastNormalizeEditor, DarkestPixelPatchEditor,
    DegradationEditor, Editor, EditorContext, EditorData, EditorOutput, EditorPipeline,
    EditorTimings, LoadMapEditor, MapToArrayEditor, MinMaxQuantileNormalizeEditor,
    NormalizeFnEditor, NormalizeRadiusEditor, SaveMapEditor, ShiftMeanEditor, StretchPixelEditor,
    WhiteningEditor,
};
