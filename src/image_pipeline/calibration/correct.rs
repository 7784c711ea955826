use tracing::{debug, instrument};

use crate::image_pipeline::calibration::cache::CalibrationCache;
use crate::image_pipeline::calibration::types::CalibrationMode;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::map::SolarMap;
use crate::image_pipeline::normalize::stats::nan_to_num;

/// Corrects instrument degradation and normalizes by exposure time.
///
/// The data is divided by the mode's degradation factor, NaNs are zeroed
/// and the result is divided by `EXPTIME`. Exposure normalization also runs
/// for [`CalibrationMode::None`], which touches no table.
#[instrument(skip(map, cache), fields(mode = %mode))]
pub fn correct_degradation(
    map: &SolarMap,
    mode: CalibrationMode,
    cache: &CalibrationCache,
) -> Result<SolarMap> {
    let header = &map.header;
    let factor = match mode {
        CalibrationMode::Auto => {
            let table = cache.auto_table()?;
            table.factor(header.wavelength()?, header.date_obs()?)?
        }
        CalibrationMode::Aiapy => {
            let table = cache.correction_table()?;
            table.degradation(header.wavelength()?, header.date_obs()?)?
        }
        CalibrationMode::None => 1.0,
    };
    let exptime = header.exptime()?;
    debug!(factor, exptime, "Applying degradation correction");

    let data = map
        .data
        .mapv(|v| (nan_to_num((v as f64 / factor) as f32) as f64 / exptime) as f32);
    Ok(SolarMap::new(data, map.header.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::calibration::cache::tests::MockSource;
    use crate::image_pipeline::common::error::EditorError;
    use crate::image_pipeline::map::Header;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::sync::atomic::Ordering;

    fn aia_map(wavelength: i64) -> SolarMap {
        let header = Header::new()
            .with("WAVELNTH", wavelength)
            .with("EXPTIME", 2.0)
            .with("DATE-OBS", "2014-06-01T00:00:00.000");
        SolarMap::new(array![[1.0, f32::NAN], [4.0, 8.0]], header)
    }

    #[test]
    fn test_mode_none_only_normalizes_exposure() {
        let source = MockSource::default();
        let auto_fetches = source.auto_fetches.clone();
        let correction_fetches = source.correction_fetches.clone();
        let cache = CalibrationCache::new(source);

        let out = correct_degradation(&aia_map(171), CalibrationMode::None, &cache).unwrap();
        assert_eq!(out.data, array![[0.5, 0.0], [2.0, 4.0]]);
        assert_eq!(auto_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(correction_fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_auto_mode_divides_by_nearest_factor() {
        let cache = CalibrationCache::new(MockSource::default());
        let out = correct_degradation(&aia_map(171), CalibrationMode::Auto, &cache).unwrap();
        // Factor 0.5 from the 2015 row, then exposure 2.0.
        assert_eq!(out.data, array![[1.0, 0.0], [4.0, 8.0]]);
        assert_eq!(out.header.exptime().unwrap(), 2.0);
    }

    #[test]
    fn test_aiapy_mode_uses_effective_area_ratio() {
        let cache = CalibrationCache::new(MockSource::default());
        let out = correct_degradation(&aia_map(171), CalibrationMode::Aiapy, &cache).unwrap();
        // Degradation 0.5 / 2.0.
        assert_relative_eq!(out.data[[0, 0]], 2.0);
        assert_relative_eq!(out.data[[1, 1]], 16.0);
        assert_eq!(out.data[[0, 1]], 0.0);
    }

    #[test]
    fn test_missing_wavelength_column() {
        let cache = CalibrationCache::new(MockSource::default());
        assert!(matches!(
            correct_degradation(&aia_map(304), CalibrationMode::Auto, &cache),
            Err(EditorError::MissingCalibrationColumn(_))
        ));
    }

    #[test]
    fn test_missing_exposure_time() {
        let cache = CalibrationCache::new(MockSource::default());
        let mut map = aia_map(171);
        map.header.remove("EXPTIME");
        assert!(matches!(
            correct_degradation(&map, CalibrationMode::None, &cache),
            Err(EditorError::MissingKeyword(_))
        ));
    }
}
