use rand::RngCore;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::editor::base::{Editor, expect_array};
use crate::image_pipeline::editor::types::{EditorContext, EditorData, EditorOutput};
use crate::image_pipeline::patch::{Extremum, PatchConfig, select_patch};

/// Patch around the brightest smoothed pixel, or a random patch with
/// probability `random_selection`.
#[derive(Debug, Clone, Default)]
pub struct BrightestPixelPatchEditor {
    config: PatchConfig,
}

impl BrightestPixelPatchEditor {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }
}

impl Editor for BrightestPixelPatchEditor {
    fn name(&self) -> &str {
        "brightest_pixel_patch"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let array = expect_array(self.name(), data)?;
        let patch = select_patch(&array, &self.config, Extremum::Brightest, rng)?;
        Ok(EditorOutput::new(patch))
    }
}

/// Patch around the darkest smoothed pixel, or a random patch with
/// probability `random_selection`.
#[derive(Debug, Clone, Default)]
pub struct DarkestPixelPatchEditor {
    config: PatchConfig,
}

impl DarkestPixelPatchEditor {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }
}

impl Editor for DarkestPixelPatchEditor {
    fn name(&self) -> &str {
        "darkest_pixel_patch"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let array = expect_array(self.name(), data)?;
        let patch = select_patch(&array, &self.config, Extremum::Darkest, rng)?;
        Ok(EditorOutput::new(patch))
    }
}
