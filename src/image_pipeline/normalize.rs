//! Numeric normalizers
//!
//! Pure array-to-array functions. None of them fail; NaNs are skipped by the
//! statistics and otherwise propagate element-wise.

pub mod range;
pub mod smoothing;
pub mod standardize;
pub mod stats;

pub use range::{min_max_quantile, min_max_quantile_with, stretch_pixel};
pub use smoothing::gaussian_filter;
pub use standardize::{Scale, Shift, contrast_normalize, normalize_fn, shift_mean, whitening};
