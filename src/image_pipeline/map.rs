//! Solar map module
//!
//! An image plus its header keywords, the unit most editors operate on.

pub mod header;
pub mod time;
pub mod types;

pub use header::{Header, HeaderValue, RSUN_REF_METERS};
pub use time::parse_observation_date;
pub use types::SolarMap;
