//! Degradation calibration
//!
//! Looks up per-wavelength correction factors from cached calibration tables
//! and applies them together with exposure normalization.

pub mod cache;
pub mod correct;
pub mod source;
pub mod tables;
pub mod types;

pub use cache::{CalibrationCache, global, init_global};
pub use correct::correct_degradation;
pub use source::{AUTO_CALIBRATION_URL, CachedFileSource, CalibrationTableSource};
pub use tables::{AutoCalibrationTable, CorrectionEpoch, CorrectionTable};
pub use types::CalibrationMode;
