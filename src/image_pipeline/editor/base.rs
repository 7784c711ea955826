use std::path::PathBuf;

use ndarray::{Array3, Axis};
use rand::RngCore;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::editor::types::{EditorContext, EditorData, EditorOutput};
use crate::image_pipeline::map::SolarMap;

/// One stateless step of an editor pipeline.
///
/// `call` transforms the data and may report context additions; `convert`
/// merges those additions into the running context. Editors that draw random
/// numbers use the generator they are handed.
pub trait Editor: Send + Sync {
    fn name(&self) -> &str;

    fn call(
        &self,
        data: EditorData,
        ctx: &EditorContext,
        rng: &mut dyn RngCore,
    ) -> Result<EditorOutput>;

    fn convert(
        &self,
        data: EditorData,
        mut ctx: EditorContext,
        rng: &mut dyn RngCore,
    ) -> Result<(EditorData, EditorContext)> {
        let output = self.call(data, &ctx, rng)?;
        ctx.merge(output.context);
        Ok((output.data, ctx))
    }
}

fn unexpected(editor: &str, expected: &'static str, found: &EditorData) -> EditorError {
    EditorError::UnexpectedData {
        editor: editor.to_string(),
        expected,
        found: found.kind(),
    }
}

pub(crate) fn expect_path(editor: &str, data: EditorData) -> Result<PathBuf> {
    match data {
        EditorData::Path(path) => Ok(path),
        other => Err(unexpected(editor, "path", &other)),
    }
}

pub(crate) fn expect_map(editor: &str, data: EditorData) -> Result<SolarMap> {
    match data {
        EditorData::Map(map) => Ok(map),
        other => Err(unexpected(editor, "map", &other)),
    }
}

/// Multi-channel view of the data; a map becomes a single channel.
pub(crate) fn expect_array(editor: &str, data: EditorData) -> Result<Array3<f32>> {
    match data {
        EditorData::Array(array) => Ok(array),
        EditorData::Map(map) => Ok(map.data.insert_axis(Axis(0))),
        other => Err(unexpected(editor, "array", &other)),
    }
}
