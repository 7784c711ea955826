//! Patch selection
//!
//! Cuts fixed-size windows out of multi-channel arrays, centered on the
//! brightest or darkest smoothed pixel or placed at random.

pub mod selector;
pub mod types;

pub use selector::select_patch;
pub use types::{Extremum, PatchConfig, PatchConfigBuilder};
