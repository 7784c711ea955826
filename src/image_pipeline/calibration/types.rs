//! Calibration mode selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::EditorError;

/// How degradation is corrected before exposure normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationMode {
    /// Nearest-date factor from the auto-calibration table
    #[default]
    Auto,
    /// Effective-area degradation from the correction table
    Aiapy,
    /// Exposure normalization only
    None,
}

impl CalibrationMode {
    pub const VALUES: [&'static str; 3] = ["auto", "aiapy", "none"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationMode::Auto => "auto",
            CalibrationMode::Aiapy => "aiapy",
            CalibrationMode::None => "none",
        }
    }
}

impl fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalibrationMode {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CalibrationMode::Auto),
            "aiapy" => Ok(CalibrationMode::Aiapy),
            "none" => Ok(CalibrationMode::None),
            _ => Err(EditorError::InvalidArgument(format!(
                "unrecognized calibration mode '{s}', must be one of {}",
                Self::VALUES.join(", ")
            ))),
        }
    }
}
