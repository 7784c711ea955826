//! Gaussian smoothing.

use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

/// Kernel half-width in units of sigma.
pub const TRUNCATE: f64 = 4.0;

/// Normalized 1-D Gaussian weights for offsets `-radius..=radius`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Half-sample symmetric reflection (`d c b a | a b c d | d c b a`).
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

fn correlate_axis(input: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::<f64>::zeros(input.dim());
    for (lane_in, mut lane_out) in input
        .lanes(axis)
        .into_iter()
        .zip(output.lanes_mut(axis))
    {
        let n = lane_in.len();
        for i in 0..n {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let j = reflect_index(i as isize + k as isize - radius, n);
                acc += w * lane_in[j];
            }
            lane_out[i] = acc;
        }
    }
    output
}

/// Separable Gaussian filter over a 2-D image.
///
/// The kernel is truncated at four sigma and edges are reflected, so the
/// output has the input's shape. NaNs spread to every pixel they touch.
pub fn gaussian_filter<S>(image: &ArrayBase<S, Ix2>, sigma: f64) -> Array2<f32>
where
    S: Data<Elem = f32>,
{
    if image.is_empty() || sigma <= 0.0 {
        return image.to_owned();
    }
    let kernel = gaussian_kernel(sigma);
    let wide = image.mapv(|v| v as f64);
    let rows = correlate_axis(&wide, &kernel, Axis(0));
    let both = correlate_axis(&rows, &kernel, Axis(1));
    both.mapv(|v| v as f32)
}
