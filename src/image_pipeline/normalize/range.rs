//! Range normalization to `[-1, 1]`.

use ndarray::{Array, ArrayBase, Data, Dimension};

use super::stats::{nan_min_max, quantile_sorted, sorted_non_nan};

/// Lower quantile used by [`min_max_quantile`].
pub const LOWER_QUANTILE: f64 = 0.001;
/// Upper quantile used by [`min_max_quantile`].
pub const UPPER_QUANTILE: f64 = 0.999;

fn rescale<S, D>(data: &ArrayBase<S, D>, vmin: f64, vmax: f64, clip: bool) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let span = vmax - vmin;
    if !(span.is_finite() && span > 0.0) {
        // Flat or empty input carries no contrast to stretch.
        return data.mapv(|v| if v.is_nan() { v } else { 0.0 });
    }
    data.mapv(|v| {
        let scaled = (v as f64 - vmin) / span * 2.0 - 1.0;
        let scaled = if clip { scaled.clamp(-1.0, 1.0) } else { scaled };
        scaled as f32
    })
}

/// Rescales so the 0.1st and 99.9th percentiles map to -1 and 1, clipping outliers.
///
/// NaNs are ignored when computing the percentiles and stay NaN in the output.
pub fn min_max_quantile<S, D>(data: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    min_max_quantile_with(data, LOWER_QUANTILE, UPPER_QUANTILE)
}

pub fn min_max_quantile_with<S, D>(data: &ArrayBase<S, D>, lower: f64, upper: f64) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let sorted = sorted_non_nan(data.iter());
    let vmin = quantile_sorted(&sorted, lower);
    let vmax = quantile_sorted(&sorted, upper);
    rescale(data, vmin, vmax, true)
}

/// Rescales the true minimum and maximum to -1 and 1. No clipping.
pub fn stretch_pixel<S, D>(data: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    match nan_min_max(data.iter()) {
        Some((vmin, vmax)) => rescale(data, vmin, vmax, false),
        None => data.to_owned(),
    }
}
