//! Archive boundary
//!
//! Querying and fetching observations is a trait; the crate only carries
//! the selection of the nearest usable record.

pub mod client;
pub mod select;
pub mod types;

pub use client::{ArchiveClient, fetch_nearest};
pub use select::select_nearest_valid;
pub use types::{ArchiveQuery, ArchiveRecord, DEFAULT_WAVELENGTHS};
