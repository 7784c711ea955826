use ndarray::s;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::map::SolarMap;

/// Cuts `rows × cols` pixels starting at zero-based `(col0, row0)`.
///
/// Fails rather than truncating when the window leaves the array.
pub fn submap_pixels(
    map: &SolarMap,
    col0: isize,
    row0: isize,
    cols: usize,
    rows: usize,
) -> Result<SolarMap> {
    let (n_rows, n_cols) = map.dim();
    let col1 = col0 + cols as isize;
    let row1 = row0 + rows as isize;
    if col0 < 0 || row0 < 0 || col1 > n_cols as isize || row1 > n_rows as isize {
        return Err(EditorError::CropOutOfBounds {
            row0,
            row1,
            col0,
            col1,
            rows: n_rows,
            cols: n_cols,
        });
    }

    let data = map
        .data
        .slice(s![row0..row1, col0..col1])
        .to_owned();
    let mut header = map.header.clone();
    if header.contains("CRPIX1") {
        header.set("CRPIX1", header.get_f64("CRPIX1")? - col0 as f64);
    }
    if header.contains("CRPIX2") {
        header.set("CRPIX2", header.get_f64("CRPIX2")? - row0 as f64);
    }
    Ok(SolarMap::new(data, header))
}

/// Cuts the pixels covering a world-coordinate box given in arcsec.
///
/// Corners are converted to pixels and rounded outward to whole pixels; the
/// box is clipped to the array. An empty map has nothing to clip to.
pub fn submap_world(
    map: &SolarMap,
    bottom_left: (f64, f64),
    top_right: (f64, f64),
) -> Result<SolarMap> {
    let (n_rows, n_cols) = map.dim();
    if n_rows == 0 || n_cols == 0 {
        return Err(EditorError::CropOutOfBounds {
            row0: 0,
            row1: 0,
            col0: 0,
            col1: 0,
            rows: n_rows,
            cols: n_cols,
        });
    }

    let corners = [
        bottom_left,
        top_right,
        (bottom_left.0, top_right.1),
        (top_right.0, bottom_left.1),
    ];
    let mut xs = Vec::with_capacity(4);
    let mut ys = Vec::with_capacity(4);
    for (wx, wy) in corners {
        let (px, py) = map.world_to_pixel(wx, wy)?;
        xs.push(px);
        ys.push(py);
    }
    let lo = |v: &[f64]| (v.iter().copied().fold(f64::INFINITY, f64::min) + 0.5).floor();
    let hi = |v: &[f64]| (v.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 0.5).floor();

    let clip = |v: f64, n: usize| v.clamp(0.0, n as f64 - 1.0) as isize;
    let col0 = clip(lo(&xs), n_cols);
    let col1 = clip(hi(&xs), n_cols);
    let row0 = clip(lo(&ys), n_rows);
    let row1 = clip(hi(&ys), n_rows);

    submap_pixels(
        map,
        col0,
        row0,
        (col1 - col0 + 1).max(0) as usize,
        (row1 - row0 + 1).max(0) as usize,
    )
}

/// Crops to exactly `resolution × resolution` pixels around disk center.
///
/// The first cut takes a box of `resolution / 2` pixels in each direction of
/// world origin; the second trims the rounding surplus symmetrically.
pub fn crop_resolution(map: &SolarMap, resolution: usize) -> Result<SolarMap> {
    let arcs_frame = (resolution as f64 / 2.0) * map.header.cdelt1()?;
    let framed = submap_world(map, (-arcs_frame, -arcs_frame), (arcs_frame, arcs_frame))?;

    let (rows, cols) = framed.dim();
    let pad_x = cols as isize - resolution as isize;
    let pad_y = rows as isize - resolution as isize;
    submap_pixels(
        &framed,
        pad_x.div_euclid(2),
        pad_y.div_euclid(2),
        resolution,
        resolution,
    )
}
