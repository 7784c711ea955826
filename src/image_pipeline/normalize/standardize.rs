//! Shift/scale standardization.

use ndarray::{Array, ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use super::stats::{nan_mean, nan_median, nan_std};

/// Added to the standard deviation by [`whitening`].
pub const WHITENING_EPSILON: f64 = 1e-6;
/// Added to the scale by [`contrast_normalize`].
pub const CONTRAST_EPSILON: f64 = 1e-7;

/// Value subtracted by [`contrast_normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    #[default]
    Mean,
    Median,
    Value(f64),
}

/// Value divided by in [`contrast_normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Std,
    Value(f64),
}

/// Zero mean, unit standard deviation. NaNs are skipped by the statistics and
/// propagate through unchanged.
pub fn whitening<S, D>(data: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let mean = nan_mean(data.iter());
    let std = nan_std(data.iter());
    let denom = std + WHITENING_EPSILON;
    data.mapv(|v| ((v as f64 - mean) / denom) as f32)
}

/// `(data - shift) / (scale + 1e-7)`.
pub fn contrast_normalize<S, D>(data: &ArrayBase<S, D>, shift: Shift, scale: Scale) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let shift = match shift {
        Shift::Mean => nan_mean(data.iter()),
        Shift::Median => nan_median(data.iter()),
        Shift::Value(v) => v,
    };
    let scale = match scale {
        Scale::Std => nan_std(data.iter()),
        Scale::Value(v) => v,
    };
    let denom = scale + CONTRAST_EPSILON;
    data.mapv(|v| ((v as f64 - shift) / denom) as f32)
}

/// Subtracts the mean and hard-clips to `[-1, 1]` without rescaling.
pub fn shift_mean<S, D>(data: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let mean = nan_mean(data.iter());
    data.mapv(|v| (v as f64 - mean).clamp(-1.0, 1.0) as f32)
}

/// `2 * f(data) - 1`, for an `f` that maps into `[0, 1]`.
pub fn normalize_fn<S, D, F>(data: &ArrayBase<S, D>, f: F) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
    F: Fn(f32) -> f32,
{
    data.mapv(|v| 2.0 * f(v) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::normalize::stats::{nan_mean, nan_std};
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};

    fn sample() -> Array2<f32> {
        Array2::from_shape_fn((16, 16), |(r, c)| ((r * 7 + c * 13) % 23) as f32 * 3.5 + 100.0)
    }

    #[test]
    fn test_whitening_statistics() {
        let out = whitening(&sample());
        assert_relative_eq!(nan_mean(out.iter()), 0.0, epsilon = 1e-5);
        assert_relative_eq!(nan_std(out.iter()), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_whitening_ignores_nan() {
        let data = Array1::from(vec![1.0f32, f32::NAN, 3.0]);
        let out = whitening(&data);
        assert!(out[1].is_nan());
        assert_relative_eq!(out[0], -1.0, epsilon = 1e-5);
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_contrast_normalize_round_trip() {
        let data = sample();
        let mean = nan_mean(data.iter());
        let std = nan_std(data.iter());
        let out = contrast_normalize(&data, Shift::Value(mean), Scale::Value(std));
        let restored = out.mapv(|v| (v as f64 * std + mean) as f32);
        for (a, b) in data.iter().zip(restored.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_contrast_normalize_median_shift() {
        let data = Array1::from(vec![1.0f32, 2.0, 100.0]);
        let out = contrast_normalize(&data, Shift::Median, Scale::Value(1.0));
        assert_relative_eq!(out[1], 0.0);
        assert_relative_eq!(out[2], 98.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shift_mean_clips() {
        let data = Array1::from(vec![0.0f32, 0.5, 1.0, 10.0]);
        let out = shift_mean(&data);
        assert!(out.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(out[3], 1.0);
        assert_eq!(out[0], -1.0);
    }

    #[test]
    fn test_normalize_fn() {
        let data = Array1::from(vec![0.0f32, 0.5, 1.0]);
        let out = normalize_fn(&data, |v| v);
        assert_eq!(out.to_vec(), vec![-1.0, 0.0, 1.0]);
    }
}
