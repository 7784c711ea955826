use ndarray::{Array3, Axis, s};
use rand::{Rng, RngCore};
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::normalize::gaussian_filter;
use crate::image_pipeline::normalize::stats::{nan_mean, nan_min_max, nan_std};
use crate::image_pipeline::patch::types::{Extremum, PatchConfig};

/// Smoothing applied before searching for the extremum.
const EXTREMUM_SIGMA: f64 = 5.0;

/// Picks the `(row, col)` center of the patch from the smoothed channel.
///
/// Every pixel equal to the extremum is a candidate; one is drawn uniformly.
fn extremum_center(
    data: &Array3<f32>,
    channel: usize,
    extremum: Extremum,
    rng: &mut dyn RngCore,
) -> Result<(usize, usize)> {
    let smoothed = gaussian_filter(&data.index_axis(Axis(0), channel), EXTREMUM_SIGMA);
    let (min, max) = nan_min_max(&smoothed).ok_or(EditorError::NoExtremum(channel))?;
    let target = match extremum {
        Extremum::Brightest => max,
        Extremum::Darkest => min,
    };

    let candidates: Vec<(usize, usize)> = smoothed
        .indexed_iter()
        .filter(|(_, v)| **v as f64 == target)
        .map(|(idx, _)| idx)
        .collect();
    let pick = rng.random_range(0..candidates.len());
    debug!(
        candidates = candidates.len(),
        value = target,
        "Located extremum"
    );
    Ok(candidates[pick])
}

/// Keeps a patch of `size` centered on `center` inside `0..dim`.
fn clamp_center(center: usize, size: usize, dim: usize) -> usize {
    let lo = size / 2;
    let hi = dim - size.div_ceil(2);
    center.clamp(lo, hi)
}

/// Cuts a `config.patch_shape` window across all channels of `data`.
///
/// With probability `config.random_selection` the window is placed uniformly
/// at random; otherwise it is centered on the extremum of the smoothed
/// `config.channel`, shifted inward where it would leave the array.
#[instrument(skip(data, config, rng), fields(shape = ?config.patch_shape))]
pub fn select_patch(
    data: &Array3<f32>,
    config: &PatchConfig,
    extremum: Extremum,
    rng: &mut dyn RngCore,
) -> Result<Array3<f32>> {
    let (channels, rows, cols) = data.dim();
    let (patch_rows, patch_cols) = config.patch_shape;
    if patch_rows == 0 || patch_cols == 0 {
        return Err(EditorError::InvalidArgument(format!(
            "patch shape must be non-empty, got {patch_rows}x{patch_cols}"
        )));
    }
    if rows < patch_rows || cols < patch_cols {
        return Err(EditorError::PatchTooLarge {
            rows,
            cols,
            patch_rows,
            patch_cols,
        });
    }
    if config.channel >= channels {
        return Err(EditorError::InvalidArgument(format!(
            "channel index {} out of range for {channels} channels",
            config.channel
        )));
    }

    let (row0, col0) = if rng.random::<f64>() <= config.random_selection {
        (
            rng.random_range(0..=rows - patch_rows),
            rng.random_range(0..=cols - patch_cols),
        )
    } else {
        let (row, col) = extremum_center(data, config.channel, extremum, rng)?;
        let row = clamp_center(row, patch_rows, rows);
        let col = clamp_center(col, patch_cols, cols);
        (row - patch_rows / 2, col - patch_cols / 2)
    };
    debug!(row0, col0, "Selected patch origin");

    let patch = data
        .slice(s![.., row0..row0 + patch_rows, col0..col0 + patch_cols])
        .to_owned();
    if nan_std(&patch) == 0.0 {
        return Err(EditorError::DegeneratePatch(nan_mean(&patch)));
    }
    Ok(patch)
}
