use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::map::parse_observation_date;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn required_column(headers: &StringRecord, name: &str) -> Result<usize> {
    column_index(headers, name)
        .ok_or_else(|| EditorError::CalibrationTable(format!("missing {name} column")))
}

fn parse_float(field: &str, column: &str) -> Result<f64> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    field.parse().map_err(|_| {
        EditorError::CalibrationTable(format!("invalid {column} value '{field}'"))
    })
}

fn parse_date(field: &str, column: &str) -> Result<NaiveDateTime> {
    parse_observation_date(field).map_err(|_| {
        EditorError::CalibrationTable(format!("invalid {column} value '{field}'"))
    })
}

/// Wavelength code used as column key, e.g. `0171`.
pub fn wavelength_key(wavelength: f64) -> String {
    format!("{:04}", wavelength.trunc() as i64)
}

/// Date-indexed table of per-wavelength calibration factors.
///
/// Rows are dates; columns are keyed by four-digit wavelength codes. The
/// first CSV column is a row index and is skipped.
#[derive(Debug, Clone)]
pub struct AutoCalibrationTable {
    dates: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl AutoCalibrationTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        let date_idx = required_column(&headers, "DATE")?;

        let value_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx && *i != 0)
            .map(|(i, name)| (i, name.trim().to_string()))
            .collect();

        let mut dates = Vec::new();
        let mut columns: BTreeMap<String, Vec<f64>> = value_columns
            .iter()
            .map(|(_, name)| (name.clone(), Vec::new()))
            .collect();

        for record in reader.records() {
            let record = record?;
            dates.push(parse_date(record.get(date_idx).unwrap_or(""), "DATE")?);
            for (i, name) in &value_columns {
                let value = parse_float(record.get(*i).unwrap_or(""), name)?;
                if let Some(column) = columns.get_mut(name) {
                    column.push(value);
                }
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            EditorError::InputReadError(format!("{}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Row whose date is closest to `date`; the earliest row wins ties.
    pub fn nearest_row(&self, date: NaiveDateTime) -> Option<usize> {
        self.dates
            .iter()
            .enumerate()
            .min_by_key(|(_, d)| (**d - date).abs())
            .map(|(i, _)| i)
    }

    /// Calibration factor for `wavelength` at the row nearest to `date`.
    pub fn factor(&self, wavelength: f64, date: NaiveDateTime) -> Result<f64> {
        let key = wavelength_key(wavelength);
        let column = self
            .columns
            .get(&key)
            .ok_or(EditorError::MissingCalibrationColumn(key))?;
        let row = self.nearest_row(date).ok_or_else(|| {
            EditorError::CalibrationTable("auto-calibration table is empty".to_string())
        })?;
        Ok(column[row])
    }
}

/// One effective-area calibration epoch of one wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionEpoch {
    pub t_start: NaiveDateTime,
    pub t_stop: Option<NaiveDateTime>,
    pub wavelength: i64,
    pub version: i64,
    pub eff_area: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

impl CorrectionEpoch {
    fn contains(&self, obstime: NaiveDateTime) -> bool {
        self.t_start <= obstime && self.t_stop.is_none_or(|stop| obstime < stop)
    }
}

/// Effective-area correction table, one row per epoch.
///
/// Read from whitespace-delimited text with a header row naming the columns
/// `T_START`, `WAVELNTH`, `VER_NUM`, `EFF_AREA`, `EFFA_P1..3` and optionally
/// `T_STOP`. Extra columns are ignored.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    epochs: Vec<CorrectionEpoch>,
}

impl CorrectionTable {
    pub fn new(epochs: Vec<CorrectionEpoch>) -> Self {
        Self { epochs }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b' ')
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let t_start = required_column(&headers, "T_START")?;
        let t_stop = column_index(&headers, "T_STOP");
        let wavelength = required_column(&headers, "WAVELNTH")?;
        let version = required_column(&headers, "VER_NUM")?;
        let eff_area = required_column(&headers, "EFF_AREA")?;
        let p1 = required_column(&headers, "EFFA_P1")?;
        let p2 = required_column(&headers, "EFFA_P2")?;
        let p3 = required_column(&headers, "EFFA_P3")?;

        let mut epochs = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("");
            epochs.push(CorrectionEpoch {
                t_start: parse_date(field(t_start), "T_START")?,
                t_stop: t_stop
                    .map(|i| parse_date(field(i), "T_STOP"))
                    .transpose()?,
                wavelength: parse_float(field(wavelength), "WAVELNTH")?.round() as i64,
                version: parse_float(field(version), "VER_NUM")?.round() as i64,
                eff_area: parse_float(field(eff_area), "EFF_AREA")?,
                p1: parse_float(field(p1), "EFFA_P1")?,
                p2: parse_float(field(p2), "EFFA_P2")?,
                p3: parse_float(field(p3), "EFFA_P3")?,
            });
        }
        Ok(Self { epochs })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            EditorError::InputReadError(format!("{}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn epochs(&self) -> &[CorrectionEpoch] {
        &self.epochs
    }

    /// Degradation factor of `wavelength` at `obstime`.
    ///
    /// Uses the latest calibration version of the wavelength. The factor is
    /// the epoch's polynomial in days since the epoch start times the ratio
    /// of the epoch's effective area to the first epoch's.
    pub fn degradation(&self, wavelength: f64, obstime: NaiveDateTime) -> Result<f64> {
        let wavelength = wavelength.round() as i64;
        let no_epoch = || EditorError::NoCalibrationEpoch {
            wavelength,
            date: obstime.to_string(),
        };

        let latest = self
            .epochs
            .iter()
            .filter(|e| e.wavelength == wavelength)
            .map(|e| e.version)
            .max()
            .ok_or_else(no_epoch)?;
        let epochs: Vec<&CorrectionEpoch> = self
            .epochs
            .iter()
            .filter(|e| e.wavelength == wavelength && e.version == latest)
            .collect();

        let current = epochs
            .iter()
            .rev()
            .find(|e| e.contains(obstime))
            .ok_or_else(no_epoch)?;
        let first = epochs[0];

        let dt = (obstime - current.t_start).num_milliseconds() as f64 / MILLIS_PER_DAY;
        let ratio = current.eff_area / first.eff_area;
        let poly = 1.0 + current.p1 * dt + current.p2 * dt * dt + current.p3 * dt * dt * dt;
        Ok(poly * ratio)
    }
}
