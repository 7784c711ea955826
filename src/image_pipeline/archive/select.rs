use chrono::NaiveDateTime;
use tracing::debug;

use crate::image_pipeline::archive::types::ArchiveRecord;
use crate::image_pipeline::common::error::{EditorError, Result};

/// Picks the quality-0 record closest in time to `target`.
///
/// Records are ordered by absolute time difference first, so of several
/// valid records the nearest one wins and equal distances keep query order.
pub fn select_nearest_valid(
    records: Vec<ArchiveRecord>,
    target: NaiveDateTime,
) -> Result<ArchiveRecord> {
    let total = records.len();
    let mut ranked = records
        .into_iter()
        .map(|record| Ok(((record.date()? - target).abs(), record)))
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by_key(|(diff, _)| *diff);

    let (diff, record) = ranked
        .into_iter()
        .find(|(_, record)| record.is_valid())
        .ok_or_else(|| EditorError::NoArchiveRecord(target.to_string()))?;
    debug!(
        total,
        offset_seconds = diff.num_seconds(),
        locator = %record.locator,
        "Selected archive record"
    );
    Ok(record)
}
