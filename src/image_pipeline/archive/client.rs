use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::image_pipeline::archive::select::select_nearest_valid;
use crate::image_pipeline::archive::types::{ArchiveQuery, ArchiveRecord};
use crate::image_pipeline::common::error::Result;

pub trait ArchiveClient: Send + Sync {
    fn query(&self, query: &ArchiveQuery) -> Result<Vec<ArchiveRecord>>;
    fn fetch(&self, record: &ArchiveRecord, dir: &Path) -> Result<PathBuf>;
}

/// Queries `client` and fetches the valid record nearest to `target` into `dir`.
#[instrument(skip(client, query, dir), fields(series = %query.series))]
pub fn fetch_nearest(
    client: &dyn ArchiveClient,
    query: &ArchiveQuery,
    target: NaiveDateTime,
    dir: &Path,
) -> Result<PathBuf> {
    let records = client.query(query)?;
    info!("Query {} returned {} records", query.record_set(), records.len());
    let record = select_nearest_valid(records, target)?;
    client.fetch(&record, dir)
}
