use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::image_pipeline::calibration::{
    self, CalibrationCache, CalibrationMode, correct_degradation,
};
use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::editor::base::{Editor, expect_array, expect_map, expect_path};
use crate::image_pipeline::editor::types::{EditorContext, EditorData, EditorOutput};
use crate::image_pipeline::io::{FitsMapStore, ImageReader, ImageWriter};
use crate::image_pipeline::scale::{RadiusConfig, normalize_radius};

/// Loads the map at a path and records the path in the context.
///
/// `TIMESYS` is forced to `TAI` so leap seconds in `DATE-OBS` are read as
/// atomic time.
pub struct LoadMapEditor {
    reader: Arc<dyn ImageReader>,
}

impl LoadMapEditor {
    /// Reads FITS files.
    pub fn new() -> Self {
        Self::with_reader(FitsMapStore::new())
    }

    pub fn with_reader(reader: impl ImageReader + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }
}

impl Default for LoadMapEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for LoadMapEditor {
    fn name(&self) -> &str {
        "load_map"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let path = expect_path(self.name(), data)?;
        let mut map = self.reader.read_map(&path)?;
        map.header.set("TIMESYS", "TAI");
        Ok(EditorOutput::new(map).with("path", path.display().to_string()))
    }
}

/// Writes the map into a directory, named after the loaded file.
///
/// The file stem comes from the `path` context entry, `map` when absent.
/// The written location is recorded as `output_path`.
pub struct SaveMapEditor {
    writer: Arc<dyn ImageWriter>,
    dir: PathBuf,
    extension: String,
}

impl SaveMapEditor {
    /// Writes `<stem>.fits` files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_writer(FitsMapStore::new(), dir, "fits")
    }

    pub fn with_writer(
        writer: impl ImageWriter + 'static,
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            writer: Arc::new(writer),
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    fn target(&self, ctx: &EditorContext) -> PathBuf {
        let stem = ctx
            .get_str("path")
            .and_then(|p| Path::new(p).file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "map".to_string());
        self.dir.join(format!("{stem}.{}", self.extension))
    }
}

impl Editor for SaveMapEditor {
    fn name(&self) -> &str {
        "save_map"
    }

    fn call(

        &self,

        data: EditorData,

        ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let map = expect_map(self.name(), data)?;
        let target = self.target(ctx);
        self.writer.write_map(&map, &target)?;
        debug!("Saved map to {}", target.display());
        Ok(EditorOutput::new(map).with("output_path", target.display().to_string()))
    }
}

/// Degradation correction and exposure normalization.
pub struct DegradationEditor {
    mode: CalibrationMode,
    cache: Arc<CalibrationCache>,
}

impl DegradationEditor {
    pub fn new(mode: CalibrationMode, cache: Arc<CalibrationCache>) -> Self {
        Self { mode, cache }
    }

    /// Uses the process-wide cache installed by [`calibration::init_global`].
    pub fn from_global(mode: CalibrationMode) -> Result<Self> {
        let cache = calibration::global().ok_or_else(|| {
            EditorError::InvalidArgument("global calibration cache not initialized".to_string())
        })?;
        Ok(Self::new(mode, cache))
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }
}

impl Editor for DegradationEditor {
    fn name(&self) -> &str {
        "degradation"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let map = expect_map(self.name(), data)?;
        let corrected = correct_degradation(&map, self.mode, &self.cache)?;
        Ok(EditorOutput::new(corrected))
    }
}

/// Resamples the map to a fixed apparent solar radius.
#[derive(Debug, Clone, Default)]
pub struct NormalizeRadiusEditor {
    config: RadiusConfig,
}

impl NormalizeRadiusEditor {
    pub fn new(config: RadiusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RadiusConfig {
        &self.config
    }
}

impl Editor for NormalizeRadiusEditor {
    fn name(&self) -> &str {
        "normalize_radius"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        let map = expect_map(self.name(), data)?;
        Ok(EditorOutput::new(normalize_radius(&map, &self.config)?))
    }
}

/// Drops the header and keeps the data as a single-channel array.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapToArrayEditor;

impl Editor for MapToArrayEditor {
    fn name(&self) -> &str {
        "map_to_array"
    }

    fn call(

        &self,

        data: EditorData,

        _ctx: &EditorContext,

        _rng: &mut dyn RngCore,

    ) -> Result<EditorOutput> {
        Ok(EditorOutput::new(expect_array(self.name(), data)?))
    }
}
