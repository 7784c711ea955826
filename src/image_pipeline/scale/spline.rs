//! B-spline image interpolation
//!
//! Orders 2 and above are prefiltered into spline coefficients with a
//! recursive filter and mirror boundaries; orders 0 and 1 sample the image
//! directly (nearest and bilinear).

use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

use crate::image_pipeline::common::error::{EditorError, Result};

/// Highest supported spline order.
pub const MAX_ORDER: usize = 4;

/// Sample positions this far outside the pixel grid still count as inside.
const EDGE_TOLERANCE: f64 = 1e-6;

fn poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8f64.sqrt() - 3.0],
        3 => vec![3f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438_976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0,
            (664.0 + 438_976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0,
        ],
        _ => Vec::new(),
    }
}

fn causal_init_mirror(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    let z_n_1 = z.powi(n as i32 - 1);
    let mut z_i = z;
    let mut sum = c[0] + z_n_1 * c[n - 1];
    for i in 1..n - 1 {
        sum += z_i * (c[i] + z_n_1 * c[n - 1 - i]);
        z_i *= z;
    }
    sum / (1.0 - z_n_1 * z_n_1)
}

fn anticausal_init_mirror(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    (z * c[n - 2] + c[n - 1]) * z / (z * z - 1.0)
}

fn prefilter_line(c: &mut [f64], poles: &[f64]) {
    let n = c.len();
    if n < 2 || poles.is_empty() {
        return;
    }
    let gain: f64 = poles.iter().map(|z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    c.iter_mut().for_each(|v| *v *= gain);

    for &z in poles {
        c[0] = causal_init_mirror(c, z);
        for i in 1..n {
            c[i] += z * c[i - 1];
        }
        c[n - 1] = anticausal_init_mirror(c, z);
        for i in (0..n - 1).rev() {
            c[i] = z * (c[i + 1] - c[i]);
        }
    }
}

/// Whole-sample symmetric extension (`c b | a b c | b a`).
fn mirror_index(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

/// First coefficient index and the `order + 1` weights for position `x`.
fn weights(x: f64, order: usize) -> (isize, [f64; MAX_ORDER + 1]) {
    let knot = if order % 2 == 1 { x.floor() } else { (x + 0.5).floor() };
    let t = x - knot;
    let mut w = [0.0; MAX_ORDER + 1];

    match order {
        0 => {}
        1 => {
            w[0] = 1.0 - t;
        }
        2 => {
            w[1] = 0.75 - t * t;
            let y = 0.5 - t;
            w[0] = 0.5 * y * y;
        }
        3 => {
            let z = 1.0 - t;
            w[1] = (t * t * (t - 2.0) * 3.0 + 4.0) / 6.0;
            w[2] = (z * z * (z - 2.0) * 3.0 + 4.0) / 6.0;
            w[0] = z * z * z / 6.0;
        }
        _ => {
            let tt = t * t;
            w[2] = tt * (tt * 0.25 - 0.625) + 115.0 / 192.0;
            let y = 1.0 + t;
            w[1] = y * (y * (y * (5.0 - y) / 6.0 - 1.25) + 5.0 / 24.0) + 55.0 / 96.0;
            let z = 1.0 - t;
            w[3] = z * (z * (z * (5.0 - z) / 6.0 - 1.25) + 5.0 / 24.0) + 55.0 / 96.0;
            let y = 0.5 - t;
            w[0] = y * y * y * y / 24.0;
        }
    }
    w[order] = 1.0 - w[..order].iter().sum::<f64>();

    (knot as isize - (order / 2) as isize, w)
}

/// An image prepared for sampling at fractional pixel positions.
pub struct SplineImage {
    coefficients: Array2<f64>,
    order: usize,
}

impl SplineImage {
    pub fn new<S>(image: &ArrayBase<S, Ix2>, order: usize) -> Result<Self>
    where
        S: Data<Elem = f32>,
    {
        if order > MAX_ORDER {
            return Err(EditorError::InvalidArgument(format!(
                "spline order must be between 0 and {MAX_ORDER}, got {order}"
            )));
        }

        let mut coefficients = image.mapv(|v| v as f64);
        let poles = poles(order);
        if !poles.is_empty() {
            for axis in [Axis(0), Axis(1)] {
                for mut lane in coefficients.lanes_mut(axis) {
                    let mut line = lane.to_vec();
                    prefilter_line(&mut line, &poles);
                    lane.iter_mut().zip(line).for_each(|(dst, src)| *dst = src);
                }
            }
        }

        Ok(Self {
            coefficients,
            order,
        })
    }

    /// `(rows, cols)` of the underlying image.
    pub fn dim(&self) -> (usize, usize) {
        self.coefficients.dim()
    }

    /// Interpolated value at zero-based column `x` and row `y`, or `missing`
    /// outside the image.
    pub fn sample(&self, x: f64, y: f64, missing: f64) -> f64 {
        let (rows, cols) = self.coefficients.dim();
        let inside = |v: f64, n: usize| {
            v >= -EDGE_TOLERANCE && v <= (n as f64 - 1.0) + EDGE_TOLERANCE
        };
        if rows == 0 || cols == 0 || !inside(x, cols) || !inside(y, rows) {
            return missing;
        }

        let (x0, wx) = weights(x, self.order);
        let (y0, wy) = weights(y, self.order);
        let mut acc = 0.0;
        for (ky, wy) in wy.iter().take(self.order + 1).enumerate() {
            let row = mirror_index(y0 + ky as isize, rows);
            let mut row_acc = 0.0;
            for (kx, wx) in wx.iter().take(self.order + 1).enumerate() {
                let col = mirror_index(x0 + kx as isize, cols);
                row_acc += wx * self.coefficients[[row, col]];
            }
            acc += wy * row_acc;
        }
        acc
    }
}
