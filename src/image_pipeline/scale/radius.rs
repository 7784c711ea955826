use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::map::SolarMap;
use crate::image_pipeline::normalize::stats::nan_to_num;
use crate::image_pipeline::scale::crop::crop_resolution;
use crate::image_pipeline::scale::rotate::rotate_map;
use crate::image_pipeline::scale::spline::MAX_ORDER;
use crate::image_pipeline::scale::types::RadiusConfig;

fn validate(config: &RadiusConfig) -> Result<()> {
    if config.resolution == 0 {
        return Err(EditorError::InvalidArgument(
            "resolution must be positive".to_string(),
        ));
    }
    if !(config.padding_factor.is_finite() && config.padding_factor > -1.0) {
        return Err(EditorError::InvalidArgument(format!(
            "padding factor must be greater than -1, got {}",
            config.padding_factor
        )));
    }
    if config.order > MAX_ORDER {
        return Err(EditorError::InvalidArgument(format!(
            "spline order must be between 0 and {MAX_ORDER}, got {}",
            config.order
        )));
    }
    Ok(())
}

/// Resamples a map so the padded solar disk spans `config.resolution` pixels.
///
/// The map is derotated to solar north up about its reference pixel, scaled
/// so that `2 * (1 + padding_factor) * R_sun` covers the target resolution,
/// and optionally cropped to exactly `resolution × resolution`. `R_SUN`
/// records the solar radius in output pixels.
#[instrument(skip(map, config), fields(resolution = config.resolution))]
pub fn normalize_radius(map: &SolarMap, config: &RadiusConfig) -> Result<SolarMap> {
    validate(config)?;

    let rsun_obs = map.header.rsun_obs()?;
    let r_obs_pix = rsun_obs / map.header.cdelt1()?;
    let r_obs_pix = (1.0 + config.padding_factor) * r_obs_pix;
    let scale_factor = config.resolution as f64 / (2.0 * r_obs_pix);
    debug!(rsun_obs, r_obs_pix, scale_factor, "Computed radius scale factor");

    let cleaned = SolarMap::new(map.data.mapv(nan_to_num), map.header.clone());
    let mut normalized = rotate_map(&cleaned, scale_factor, config.order, 0.0)?;
    if config.crop {
        normalized = crop_resolution(&normalized, config.resolution)?;
    }

    let r_sun = rsun_obs / normalized.header.cdelt1()?;
    normalized.header.set("R_SUN", r_sun);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::map::Header;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    /// 200×200 disk of radius 75 pixels, 2 arcsec per pixel.
    fn disk_map() -> SolarMap {
        let data = Array2::from_shape_fn((200, 200), |(r, c)| {
            let (dx, dy) = (c as f64 - 99.5, r as f64 - 99.5);
            if (dx * dx + dy * dy).sqrt() <= 75.0 { 100.0 } else { f32::NAN }
        });
        let header = Header::new()
            .with("CRPIX1", 100.5)
            .with("CRPIX2", 100.5)
            .with("CDELT1", 2.0)
            .with("CDELT2", 2.0)
            .with("RSUN_OBS", 150.0)
            .with("CROTA2", 0.0);
        SolarMap::new(data, header)
    }

    #[test]
    fn test_crop_gives_exact_resolution() {
        for resolution in [32, 64, 65, 128] {
            let config = RadiusConfig::builder().resolution(resolution).build();
            let out = normalize_radius(&disk_map(), &config).unwrap();
            assert_eq!(out.dim(), (resolution, resolution));
        }
    }

    #[test]
    fn test_radius_matches_padding() {
        let config = RadiusConfig::builder().resolution(64).build();
        let out = normalize_radius(&disk_map(), &config).unwrap();
        let r_sun = out.header.get_f64("R_SUN").unwrap();
        assert_relative_eq!(r_sun, 64.0 / 2.2, epsilon = 1e-9);
        // Disk center is bright, the corners are padding.
        assert_relative_eq!(out.data[[32, 32]], 100.0, epsilon = 1e-2);
        assert!(out.data[[0, 0]].abs() < 1e-3);
        assert!(out.data.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_without_crop_scales_array_size() {
        let config = RadiusConfig::builder().resolution(64).crop(false).order(1).build();
        let out = normalize_radius(&disk_map(), &config).unwrap();
        // Padded disk of 2 * 1.1 * 75 pixels shrinks to 64.
        let expected = (200.0 * 64.0 / 165.0_f64).ceil() as usize;
        let (rows, cols) = out.dim();
        assert!(rows.abs_diff(expected) <= 1, "rows {rows}, expected {expected}");
        assert!(cols.abs_diff(expected) <= 1, "cols {cols}, expected {expected}");
        assert_relative_eq!(out.header.cdelt1().unwrap(), 2.0 * 165.0 / 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disk_center_off_frame_fails_crop() {
        let mut map = disk_map();
        map.header.set("CRVAL1", 400.0);
        let config = RadiusConfig::builder().resolution(64).build();
        assert!(matches!(
            normalize_radius(&map, &config),
            Err(EditorError::CropOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_empty_map_fails_crop() {
        let map = SolarMap::new(Array2::zeros((0, 0)), disk_map().header);
        let config = RadiusConfig::builder().resolution(4).build();
        assert!(matches!(
            normalize_radius(&map, &config),
            Err(EditorError::CropOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_missing_radius_fails() {
        let mut map = disk_map();
        map.header.remove("RSUN_OBS");
        let config = RadiusConfig::default();
        assert!(matches!(
            normalize_radius(&map, &config),
            Err(EditorError::MissingKeyword(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = RadiusConfig::builder().order(7).build();
        assert!(matches!(
            normalize_radius(&disk_map(), &config),
            Err(EditorError::InvalidArgument(_))
        ));
    }
}
