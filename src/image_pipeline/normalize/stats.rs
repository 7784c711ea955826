//! NaN-aware summary statistics, accumulated in `f64`.

/// Values with NaNs dropped, widened to `f64`.
fn non_nan<'a>(values: impl IntoIterator<Item = &'a f32>) -> impl Iterator<Item = f64> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .map(|&v| v as f64)
}

pub fn nan_mean<'a>(values: impl IntoIterator<Item = &'a f32>) -> f64 {
    let (sum, count) = non_nan(values).fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Population standard deviation (`ddof = 0`) ignoring NaNs.
pub fn nan_std<'a>(values: impl IntoIterator<Item = &'a f32> + Clone) -> f64 {
    let mean = nan_mean(values.clone());
    let (sum_sq, count) = non_nan(values).fold((0.0, 0usize), |(s, c), v| {
        let d = v - mean;
        (s + d * d, c + 1)
    });
    if count == 0 {
        f64::NAN
    } else {
        (sum_sq / count as f64).sqrt()
    }
}

pub fn nan_min_max<'a>(values: impl IntoIterator<Item = &'a f32>) -> Option<(f64, f64)> {
    non_nan(values).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub fn sorted_non_nan<'a>(values: impl IntoIterator<Item = &'a f32>) -> Vec<f64> {
    let mut sorted: Vec<f64> = non_nan(values).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of an ascending slice with linear interpolation between ranks.
///
/// `q` is a fraction in `[0, 1]`. Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn nan_median<'a>(values: impl IntoIterator<Item = &'a f32>) -> f64 {
    quantile_sorted(&sorted_non_nan(values), 0.5)
}

/// NaN becomes zero, infinities the largest finite values.
pub fn nan_to_num(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else if v == f32::INFINITY {
        f32::MAX
    } else if v == f32::NEG_INFINITY {
        f32::MIN
    } else {
        v
    }
}
