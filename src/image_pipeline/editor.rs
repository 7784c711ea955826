//! Editor pipeline
//!
//! Editors are small stateless transforms over [`EditorData`]; an
//! [`EditorPipeline`] applies them in order while threading an
//! [`EditorContext`] of keyword additions alongside.

mod base;
mod map_editors;
mod normalize_editors;
mod patch_editors;
mod pipeline;
mod timings;
pub mod types;

#[cfg(test)]
mod tests;

pub use base::Editor;
pub use map_editors::{
    DegradationEditor, LoadMapEditor, MapToArrayEditor, NormalizeRadiusEditor, SaveMapEditor,
};
pub use normalize_editors::{
    ContrastNormalizeEditor, MinMaxQuantileNormalizeEditor, NormalizeFnEditor, ShiftMeanEditor,
    StretchPixelEditor, WhiteningEditor,
};
pub use patch_editors::{BrightestPixelPatchEditor, DarkestPixelPatchEditor};
pub use pipeline::EditorPipeline;
pub use timings::{EditorTiming, EditorTimings};
pub use types::{EditorContext, EditorData, EditorOutput};
