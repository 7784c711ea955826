//! Archive query and record types

use chrono::{NaiveDateTime, TimeDelta};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::map::Header;

/// SDO/AIA channels requested when none are given.
pub const DEFAULT_WAVELENGTHS: [i64; 4] = [171, 193, 211, 304];

/// A request for observations of one data series.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveQuery {
    /// Data series name, e.g. `aia.lev1_euv_12s`
    pub series: String,
    /// Start of the requested interval
    pub start: NaiveDateTime,
    /// Interval length; `None` requests the single record at `start`
    pub span: Option<TimeDelta>,
    /// Sampling step within the interval
    pub cadence: Option<TimeDelta>,
    /// Channels to request; empty for series without channels
    pub wavelengths: Vec<i64>,
    /// Data segment to fetch
    pub segment: String,
}

impl ArchiveQuery {
    /// Query for the record at exactly `time`.
    pub fn at(series: impl Into<String>, time: NaiveDateTime, segment: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            start: time,
            span: None,
            cadence: None,
            wavelengths: Vec::new(),
            segment: segment.into(),
        }
    }

    /// Query for every record within `span / 2` of `target`, sampled at `cadence`.
    pub fn around(
        series: impl Into<String>,
        target: NaiveDateTime,
        span: TimeDelta,
        cadence: TimeDelta,
        segment: impl Into<String>,
    ) -> Self {
        Self {
            start: target - span / 2,
            span: Some(span),
            cadence: Some(cadence),
            ..Self::at(series, target, segment)
        }
    }

    pub fn with_wavelengths(mut self, wavelengths: impl IntoIterator<Item = i64>) -> Self {
        self.wavelengths = wavelengths.into_iter().collect();
        self
    }

    /// Record-set expression, for example
    /// `aia.lev1_euv_12s[2022-03-01T00:00:00Z/12h@12s][171,193]{image}`.
    pub fn record_set(&self) -> String {
        let mut time = format!("{}Z", self.start.format("%Y-%m-%dT%H:%M:%S"));
        if let Some(span) = self.span {
            time.push('/');
            time.push_str(&format_duration(span));
        }
        if let Some(cadence) = self.cadence {
            time.push('@');
            time.push_str(&format_duration(cadence));
        }

        let mut expr = format!("{}[{}]", self.series, time);
        if !self.wavelengths.is_empty() {
            let channels: Vec<String> = self.wavelengths.iter().map(i64::to_string).collect();
            expr.push_str(&format!("[{}]", channels.join(",")));
        }
        expr.push_str(&format!("{{{}}}", self.segment));
        expr
    }
}

/// Largest whole unit of a duration: `2d`, `12h` or `720s`.
fn format_duration(duration: TimeDelta) -> String {
    let seconds = duration.num_seconds();
    if seconds != 0 && seconds % 86_400 == 0 {
        format!("{}d", seconds / 86_400)
    } else if seconds != 0 && seconds % 3_600 == 0 {
        format!("{}h", seconds / 3_600)
    } else {
        format!("{seconds}s")
    }
}

/// One observation returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord {
    /// Archive keywords of the observation
    pub header: Header,
    /// Where the data segment can be fetched from
    pub locator: String,
}

impl ArchiveRecord {
    pub fn new(header: Header, locator: impl Into<String>) -> Self {
        Self {
            header,
            locator: locator.into(),
        }
    }

    pub fn date(&self) -> Result<NaiveDateTime> {
        self.header.date_obs()
    }

    pub fn quality(&self) -> Option<i64> {
        self.header.quality()
    }

    pub fn is_valid(&self) -> bool {
        self.quality() == Some(0)
    }
}
