use ndarray::{Array2, s};
use tracing::debug;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::map::SolarMap;
use crate::image_pipeline::scale::spline::SplineImage;

/// Rounding slack so quarter turns do not pad by a pixel.
const EXTENT_TOLERANCE: f64 = 1e-9;

fn invert(m: [[f64; 2]; 2]) -> Result<[[f64; 2]; 2]> {
    let [[a, b], [c, d]] = m;
    let det = a * d - b * c;
    if det == 0.0 || !det.is_finite() {
        return Err(EditorError::InvalidKeyword {
            key: "PC".to_string(),
            value: format!("{m:?}"),
        });
    }
    Ok([[d / det, -b / det], [-c / det, a / det]])
}

/// Side length of the output grid holding `extent` input pixels at `scale`.
fn scaled_extent(extent: f64, scale: f64) -> usize {
    ((extent * scale - EXTENT_TOLERANCE).ceil() as usize).max(1)
}

/// Rotates a map to an identity pixel-to-world matrix (solar north up) and
/// rescales it by `scale`, moving the reference pixel to the array center.
///
/// The output grid holds the rotated image at the new scale, so a scale below
/// one shrinks the array. Samples that fall outside the input are set to
/// `missing`. `CDELT1/2` are divided by `scale`.
pub fn rotate_map(map: &SolarMap, scale: f64, order: usize, missing: f32) -> Result<SolarMap> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(EditorError::InvalidArgument(format!(
            "scale factor must be positive, got {scale}"
        )));
    }

    let header = &map.header;
    // Output pixel offsets map back to input offsets through the inverse of
    // the pixel-to-world rotation.
    let sampling = invert(header.rotation_matrix()?)?;
    let (rows, cols) = map.dim();

    let extent_x = sampling[0][0].abs() * cols as f64 + sampling[0][1].abs() * rows as f64;
    let extent_y = sampling[1][0].abs() * cols as f64 + sampling[1][1].abs() * rows as f64;
    let out_cols = scaled_extent(extent_x, scale);
    let out_rows = scaled_extent(extent_y, scale);

    // Input is padded with `missing` so the spline sees the same border the
    // rotated image has.
    let pad_x = (((extent_x - cols as f64) / 2.0 - EXTENT_TOLERANCE).ceil()).max(0.0) as usize;
    let pad_y = (((extent_y - rows as f64) / 2.0 - EXTENT_TOLERANCE).ceil()).max(0.0) as usize;
    let mut padded = Array2::<f32>::from_elem((rows + 2 * pad_y, cols + 2 * pad_x), missing);
    padded
        .slice_mut(s![pad_y..pad_y + rows, pad_x..pad_x + cols])
        .assign(&map.data);

    let (ref_x, ref_y) = header.reference_pixel()?;
    let image_center = (ref_x + pad_x as f64, ref_y + pad_y as f64);
    let array_center = ((out_cols as f64 - 1.0) / 2.0, (out_rows as f64 - 1.0) / 2.0);

    debug!(
        rows,
        cols, out_rows, out_cols, scale, order, "Resampling map about reference pixel"
    );

    let spline = SplineImage::new(&padded, order)?;
    let m = sampling.map(|row| row.map(|v| v / scale));
    let missing_wide = missing as f64;
    let mut rotated = Array2::<f32>::zeros((out_rows, out_cols));
    for ((r, c), out) in rotated.indexed_iter_mut() {
        let dx = c as f64 - array_center.0;
        let dy = r as f64 - array_center.1;
        let x = m[0][0] * dx + m[0][1] * dy + image_center.0;
        let y = m[1][0] * dx + m[1][1] * dy + image_center.1;
        *out = spline.sample(x, y, missing_wide) as f32;
    }

    let mut new_header = header.clone();
    new_header.reset_rotation();
    new_header.set("CRPIX1", array_center.0 + 1.0);
    new_header.set("CRPIX2", array_center.1 + 1.0);
    new_header.set("CDELT1", header.cdelt1()? / scale);
    new_header.set("CDELT2", header.cdelt2()? / scale);

    Ok(SolarMap::new(rotated, new_header))
}
