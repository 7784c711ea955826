use chrono::{NaiveDate, NaiveDateTime};

use crate::image_pipeline::common::error::{EditorError, Result};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an observation timestamp as written by the SDO and Solar Orbiter archives.
///
/// Accepts ISO-8601 with or without fractional seconds, a trailing `Z`, a
/// space separator and bare dates. Archive records sometimes carry a leap
/// second (`:60`), which is folded to `:59`.
pub fn parse_observation_date(raw: &str) -> Result<NaiveDateTime> {
    let mut value = raw.trim().replace("MISSING", "");
    if let Some(stripped) = value.strip_suffix('Z') {
        value = stripped.to_string();
    }
    if value.get(17..19) == Some("60") {
        value.replace_range(17..19, "59");
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&value, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }

    Err(EditorError::InvalidKeyword {
        key: "DATE-OBS".to_string(),
        value: raw.to_string(),
    })
}
