use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use crate::image_pipeline::calibration::source::CalibrationTableSource;
use crate::image_pipeline::calibration::tables::{AutoCalibrationTable, CorrectionTable};
use crate::image_pipeline::common::error::{EditorError, Result};

static GLOBAL_CACHE: OnceLock<Arc<CalibrationCache>> = OnceLock::new();

/// Fetch-once holder of the calibration tables.
///
/// Each table is requested from the source on first use and shared
/// afterwards. The slot lock is held during the fetch, so concurrent first
/// callers wait for a single fetch. Failed fetches are not cached.
pub struct CalibrationCache {
    source: Box<dyn CalibrationTableSource>,
    auto: Mutex<Option<Arc<AutoCalibrationTable>>>,
    correction: Mutex<Option<Arc<CorrectionTable>>>,
}

impl CalibrationCache {
    pub fn new(source: impl CalibrationTableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            auto: Mutex::new(None),
            correction: Mutex::new(None),
        }
    }

    fn get_or_fetch<T>(
        slot: &Mutex<Option<Arc<T>>>,
        name: &str,
        fetch: impl FnOnce() -> Result<T>,
    ) -> Result<Arc<T>> {
        let mut guard = slot.lock();
        if let Some(table) = guard.as_ref() {
            return Ok(Arc::clone(table));
        }
        debug!(table = name, "Fetching calibration table");
        let table = Arc::new(fetch()?);
        *guard = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn auto_table(&self) -> Result<Arc<AutoCalibrationTable>> {
        Self::get_or_fetch(&self.auto, "auto", || self.source.auto_table())
    }

    pub fn correction_table(&self) -> Result<Arc<CorrectionTable>> {
        Self::get_or_fetch(&self.correction, "correction", || {
            self.source.correction_table()
        })
    }
}

/// Installs the process-wide calibration cache.
///
/// Fails if a cache has already been installed.
pub fn init_global(cache: CalibrationCache) -> Result<Arc<CalibrationCache>> {
    let cache = Arc::new(cache);
    GLOBAL_CACHE.set(Arc::clone(&cache)).map_err(|_| {
        EditorError::InvalidArgument("global calibration cache already initialized".to_string())
    })?;
    Ok(cache)
}

/// The process-wide calibration cache, if installed.
pub fn global() -> Option<Arc<CalibrationCache>> {
    GLOBAL_CACHE.get().cloned()
}
