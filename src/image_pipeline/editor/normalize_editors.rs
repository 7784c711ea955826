use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayD, ArrayViewD, Ix2, Ix3};
use rand::RngCore;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::editor::base::Editor;
use crate::image_pipeline::editor::types::{EditorContext, EditorData, EditorOutput};
use crate::image_pipeline::map::SolarMap;
use crate::image_pipeline::normalize::{
    Scale, Shift, contrast_normalize, min_max_quantile, normalize_fn, shift_mean, stretch_pixel,
    whitening,
};

/// Applies a shape-preserving normalizer to map data or an array.
///
/// Maps keep their header.
fn apply(
    editor: &str,
    data: EditorData,
    f: impl Fn(ArrayViewD<'_, f32>) -> ArrayD<f32>,
) -> Result<EditorOutput> {
    let shape_error = |e: ndarray::ShapeError| EditorError::InvalidArgument(e.to_string());
    match data {
        EditorData::Map(map) => {
            let out = f(map.data.view().into_dyn())
                .into_dimensionality::<Ix2>()
                .map_err(shape_error)?;
            Ok(EditorOutput::new(SolarMap::new(out, map.header)))
        }
        EditorData::Array(array) => {
            let out = f(array.view().into_dyn())
                .into_dimensionality::<Ix3>()
                .map_err(shape_error)?;
            Ok(EditorOutput::new(out))
        }
        other => Err(EditorError::UnexpectedData {
            editor: editor.to_string(),
            expected: "map or array",
            found: other.kind(),
        }),
    }
}

/// Quantile min-max scaling to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxQuantileNormalizeEditor;

impl Editor for MinMaxQuantileNormalizeEditor {
    fn name(&self) -> &str {
        "min_max_quantile_normalize"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| min_max_quantile(&a))
    }
}

/// Full-range min-max scaling to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StretchPixelEditor;

impl Editor for StretchPixelEditor {
    fn name(&self) -> &str {
        "stretch_pixel"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| stretch_pixel(&a))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteningEditor;

impl Editor for WhiteningEditor {
    fn name(&self) -> &str {
        "whitening"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| whitening(&a))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastNormalizeEditor {
    pub shift: Shift,
    pub scale: Scale,
}

impl ContrastNormalizeEditor {
    pub fn new(shift: Shift, scale: Scale) -> Self {
        Self { shift, scale }
    }
}

impl Editor for ContrastNormalizeEditor {
    fn name(&self) -> &str {
        "contrast_normalize"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| contrast_normalize(&a, self.shift, self.scale))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftMeanEditor;

impl Editor for ShiftMeanEditor {
    fn name(&self) -> &str {
        "shift_mean"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| shift_mean(&a))
    }
}

/// Maps each value through a `[0, 1]`-valued function, then to `[-1, 1]`.
#[derive(Clone)]
pub struct NormalizeFnEditor {
    f: Arc<dyn Fn(f32) -> f32 + Send + Sync>,
}

impl NormalizeFnEditor {
    pub fn new(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl fmt::Debug for NormalizeFnEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeFnEditor").finish_non_exhaustive()
    }
}

impl Editor for NormalizeFnEditor {
    fn name(&self) -> &str {
        "normalize_fn"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        apply(self.name(), data, |a| normalize_fn(&a, |v| (self.f)(v)))
    }
}
