//! Solar map data types

use ndarray::Array2;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::map::header::Header;

/// A single solar image with its header.
///
/// `data` is indexed `[row, col]`, i.e. `[y, x]`; header pixel keywords use
/// FITS conventions (`CRPIX` is one-based, axis 1 is x).
#[derive(Debug, Clone, PartialEq)]
pub struct SolarMap {
    /// Pixel values
    pub data: Array2<f32>,
    /// Header keywords
    pub header: Header,
}

impl SolarMap {
    pub fn new(data: Array2<f32>, header: Header) -> Self {
        let mut map = Self { data, header };
        map.sync_dimensions();
        map
    }

    /// Replaces the pixel data, keeping the header.
    pub fn with_data(self, data: Array2<f32>) -> Self {
        Self::new(data, self.header)
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn sync_dimensions(&mut self) {
        let (rows, cols) = self.data.dim();
        self.header.set("NAXIS", 2i64);
        self.header.set("NAXIS1", cols as i64);
        self.header.set("NAXIS2", rows as i64);
    }

    /// Converts a world coordinate in arcsec to a zero-based `(x, y)` pixel position.
    pub fn world_to_pixel(&self, world_x: f64, world_y: f64) -> Result<(f64, f64)> {
        let (crpix_x, crpix_y) = self.header.reference_pixel()?;
        let (crval_x, crval_y) = self.header.reference_value()?;
        let u = (world_x - crval_x) / self.header.cdelt1()?;
        let v = (world_y - crval_y) / self.header.cdelt2()?;

        let [[a, b], [c, d]] = self.header.rotation_matrix()?;
        let det = a * d - b * c;
        let dx = (d * u - b * v) / det;
        let dy = (-c * u + a * v) / det;
        Ok((crpix_x + dx, crpix_y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_header() -> Header {
        Header::new()
            .with("CRPIX1", 5.0)
            .with("CRPIX2", 5.0)
            .with("CDELT1", 2.0)
            .with("CDELT2", 2.0)
    }

    #[test]
    fn test_new_records_dimensions() {
        let map = SolarMap::new(Array2::zeros((3, 7)), Header::new());
        assert_eq!(map.header.get_f64("NAXIS1").unwrap(), 7.0);
        assert_eq!(map.header.get_f64("NAXIS2").unwrap(), 3.0);
    }

    #[test]
    fn test_world_to_pixel_identity() {
        let map = SolarMap::new(Array2::zeros((9, 9)), sample_header());
        let (x, y) = map.world_to_pixel(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 4.0);
        assert_relative_eq!(y, 4.0);
        let (x, y) = map.world_to_pixel(4.0, -2.0).unwrap();
        assert_relative_eq!(x, 6.0);
        assert_relative_eq!(y, 3.0);
    }

    #[test]
    fn test_world_to_pixel_rotated() {
        let header = sample_header().with("CROTA2", 90.0);
        let map = SolarMap::new(Array2::zeros((9, 9)), header);
        // A 90 degree roll maps world +x onto pixel -y.
        let (x, y) = map.world_to_pixel(2.0, 0.0).unwrap();
        assert_relative_eq!(x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(y, 3.0, epsilon = 1e-9);
    }
}
