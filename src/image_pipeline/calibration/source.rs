use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::info;

use crate::image_pipeline::calibration::tables::{AutoCalibrationTable, CorrectionTable};
use crate::image_pipeline::common::error::{EditorError, Result};

/// Published auto-calibration table for SDO/AIA.
pub const AUTO_CALIBRATION_URL: &str = "http://kanzelhohe.uni-graz.at/iti/sdo_autocal_table.csv";

/// Provides the calibration tables.
///
/// Each call may hit the filesystem or the network; callers normally go
/// through a [`CalibrationCache`](super::CalibrationCache) instead.
pub trait CalibrationTableSource: Send + Sync {
    fn auto_table(&self) -> Result<AutoCalibrationTable>;
    fn correction_table(&self) -> Result<CorrectionTable>;
}

/// Reads the tables from per-user files, downloading them when missing.
///
/// Defaults to `~/.iti/sdo_autocal_table.csv` and
/// `~/aiapy/correction_table.dat`. The correction table is only downloaded
/// when a URL has been configured.
#[derive(Debug, Clone)]
pub struct CachedFileSource {
    auto_path: PathBuf,
    correction_path: PathBuf,
    auto_url: Option<String>,
    correction_url: Option<String>,
}

impl CachedFileSource {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            EditorError::CalibrationTable("cannot determine home directory".to_string())
        })?;
        let home = base_dirs.home_dir();
        Ok(Self::with_paths(
            home.join(".iti").join("sdo_autocal_table.csv"),
            home.join("aiapy").join("correction_table.dat"),
        ))
    }

    pub fn with_paths(auto_path: impl Into<PathBuf>, correction_path: impl Into<PathBuf>) -> Self {
        Self {
            auto_path: auto_path.into(),
            correction_path: correction_path.into(),
            auto_url: Some(AUTO_CALIBRATION_URL.to_string()),
            correction_url: None,
        }
    }

    pub fn auto_url(mut self, url: Option<String>) -> Self {
        self.auto_url = url;
        self
    }

    pub fn correction_url(mut self, url: Option<String>) -> Self {
        self.correction_url = url;
        self
    }

    pub fn auto_path(&self) -> &Path {
        &self.auto_path
    }

    pub fn correction_path(&self) -> &Path {
        &self.correction_path
    }
}

fn download(url: &str, path: &Path) -> Result<()> {
    let fetch_error = |reason: String| EditorError::FetchError {
        url: url.to_string(),
        reason,
    };
    info!("Downloading {} to {}", url, path.display());

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_error(e.to_string()))?;
    let body = response.bytes().map_err(|e| fetch_error(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &body)?;
    info!("Downloaded {} ({} bytes)", url, body.len());
    Ok(())
}

fn ensure_file(path: &Path, url: Option<&str>) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    match url {
        Some(url) => download(url, path),
        None => Err(EditorError::InputReadError(format!(
            "calibration table not found at {}",
            path.display()
        ))),
    }
}

impl CalibrationTableSource for CachedFileSource {
    fn auto_table(&self) -> Result<AutoCalibrationTable> {
        ensure_file(&self.auto_path, self.auto_url.as_deref())?;
        AutoCalibrationTable::from_path(&self.auto_path)
    }

    fn correction_table(&self) -> Result<CorrectionTable> {
        ensure_file(&self.correction_path, self.correction_url.as_deref())?;
        CorrectionTable::from_path(&self.correction_path)
    }
}
