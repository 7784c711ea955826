use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::map::time::parse_observation_date;

/// Nominal photospheric radius in meters, used when a header carries no `RSUN_REF`.
pub const RSUN_REF_METERS: f64 = 695_700_000.0;

const ARCSEC_PER_RADIAN: f64 = 180.0 / std::f64::consts::PI * 3600.0;

/// A single header value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(i) => Some(*i as f64),
            HeaderValue::Float(f) => Some(*f),
            HeaderValue::Str(s) => s.trim().parse().ok(),
            HeaderValue::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(i) => Some(*i),
            HeaderValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            HeaderValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HeaderValue::Bool(_) => "bool",
            HeaderValue::Int(_) => "int",
            HeaderValue::Float(_) => "float",
            HeaderValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Bool(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            HeaderValue::Int(i) => write!(f, "{i}"),
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Str(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Bool(v)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Float(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Str(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Str(v)
    }
}

/// Keyword/value metadata attached to a [`SolarMap`](super::SolarMap).
///
/// Keywords are case-insensitive and stored upper case, the way FITS cards are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    cards: BTreeMap<String, HeaderValue>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards.get(&key.to_ascii_uppercase())
    }

    pub fn set(&mut self, key: &str, value: impl Into<HeaderValue>) {
        self.cards.insert(key.to_ascii_uppercase(), value.into());
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: &str, value: impl Into<HeaderValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<HeaderValue> {
        self.cards.remove(&key.to_ascii_uppercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(&key.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.cards.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self
            .get(key)
            .ok_or_else(|| EditorError::MissingKeyword(key.to_ascii_uppercase()))?;
        value.as_f64().ok_or_else(|| EditorError::InvalidKeyword {
            key: key.to_ascii_uppercase(),
            value: value.to_string(),
        })
    }

    fn get_f64_or(&self, key: &str, default: f64) -> Result<f64> {
        if self.contains(key) {
            self.get_f64(key)
        } else {
            Ok(default)
        }
    }

    pub fn wavelength(&self) -> Result<f64> {
        self.get_f64("WAVELNTH")
    }

    pub fn exptime(&self) -> Result<f64> {
        self.get_f64("EXPTIME")
    }

    /// Pixel scale along x in arcsec per pixel.
    pub fn cdelt1(&self) -> Result<f64> {
        self.get_f64("CDELT1")
    }

    pub fn cdelt2(&self) -> Result<f64> {
        self.get_f64("CDELT2")
    }

    pub fn quality(&self) -> Option<i64> {
        self.get("QUALITY").and_then(HeaderValue::as_i64)
    }

    /// Angular solar radius in arcsec.
    ///
    /// Falls back to `SOLAR_R`/`RADIUS`, then to the radius subtended by
    /// `RSUN_REF` at `DSUN_OBS`.
    pub fn rsun_obs(&self) -> Result<f64> {
        for key in ["RSUN_OBS", "SOLAR_R", "RADIUS"] {
            if self.contains(key) {
                return self.get_f64(key);
            }
        }
        let rsun_ref = self.get_f64_or("RSUN_REF", RSUN_REF_METERS)?;
        let dsun = self
            .get_f64("DSUN_OBS")
            .map_err(|_| EditorError::MissingKeyword("RSUN_OBS".to_string()))?;
        Ok((rsun_ref / dsun).asin() * ARCSEC_PER_RADIAN)
    }

    pub fn date_obs(&self) -> Result<NaiveDateTime> {
        let key = ["DATE-OBS", "DATE_OBS", "T_OBS"]
            .into_iter()
            .find(|k| self.contains(k))
            .ok_or_else(|| EditorError::MissingKeyword("DATE-OBS".to_string()))?;
        let raw = self.get(key).and_then(HeaderValue::as_str).ok_or_else(|| {
            EditorError::InvalidKeyword {
                key: key.to_string(),
                value: self.get(key).map(|v| v.to_string()).unwrap_or_default(),
            }
        })?;
        parse_observation_date(raw)
    }

    /// Reference pixel, zero-based `(x, y)`.
    pub fn reference_pixel(&self) -> Result<(f64, f64)> {
        Ok((self.get_f64("CRPIX1")? - 1.0, self.get_f64("CRPIX2")? - 1.0))
    }

    /// World coordinate of the reference pixel in arcsec, `(0, 0)` when absent.
    pub fn reference_value(&self) -> Result<(f64, f64)> {
        Ok((self.get_f64_or("CRVAL1", 0.0)?, self.get_f64_or("CRVAL2", 0.0)?))
    }

    /// Pixel-to-world rotation matrix, rows/columns ordered `(x, y)`.
    ///
    /// `PCi_j` cards take precedence, then `CDi_j`, then `CROTA2`.
    pub fn rotation_matrix(&self) -> Result<[[f64; 2]; 2]> {
        if self.contains("PC1_1") {
            return Ok([
                [self.get_f64_or("PC1_1", 1.0)?, self.get_f64_or("PC1_2", 0.0)?],
                [self.get_f64_or("PC2_1", 0.0)?, self.get_f64_or("PC2_2", 1.0)?],
            ]);
        }
        if self.contains("CD1_1") {
            let cdelt1 = self.cdelt1()?;
            let cdelt2 = self.cdelt2()?;
            return Ok([
                [
                    self.get_f64_or("CD1_1", 0.0)? / cdelt1,
                    self.get_f64_or("CD1_2", 0.0)? / cdelt1,
                ],
                [
                    self.get_f64_or("CD2_1", 0.0)? / cdelt2,
                    self.get_f64_or("CD2_2", 0.0)? / cdelt2,
                ],
            ]);
        }
        let crota = self.get_f64_or("CROTA2", 0.0)?.to_radians();
        let lam = self.get_f64_or("CDELT2", 1.0)? / self.get_f64_or("CDELT1", 1.0)?;
        let (sin, cos) = crota.sin_cos();
        Ok([[cos, -lam * sin], [sin / lam, cos]])
    }

    /// Replaces any rotation keywords with an identity `PCi_j` matrix.
    pub fn reset_rotation(&mut self) {
        for key in ["CROTA1", "CROTA2", "CD1_1", "CD1_2", "CD2_1", "CD2_2"] {
            self.remove(key);
        }
        self.set("PC1_1", 1.0);
        self.set("PC1_2", 0.0);
        self.set("PC2_1", 0.0);
        self.set("PC2_2", 1.0);
    }
}
