use std::path::Path;

use fitsio::FitsFile;
use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::images::{ImageDescription, ImageType};
use ndarray::Array2;
use tracing::debug;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::io::reader::ImageReader;
use crate::image_pipeline::io::writer::ImageWriter;
use crate::image_pipeline::map::{Header, HeaderValue, SolarMap};

/// Keywords carried as strings.
const STRING_KEYS: [&str; 12] = [
    "DATE-OBS", "DATE_OBS", "T_OBS", "TIMESYS", "TELESCOP", "INSTRUME", "DETECTOR", "CTYPE1",
    "CTYPE2", "CUNIT1", "CUNIT2", "WAVEUNIT",
];

/// Keywords that are integers for AIA and may be floats for other instruments.
const INTEGER_KEYS: [&str; 2] = ["WAVELNTH", "QUALITY"];

const FLOAT_KEYS: [&str; 24] = [
    "EXPTIME", "CDELT1", "CDELT2", "CRPIX1", "CRPIX2", "CRVAL1", "CRVAL2", "CROTA2", "PC1_1",
    "PC1_2", "PC2_1", "PC2_2", "CD1_1", "CD1_2", "CD2_1", "CD2_2", "RSUN_OBS", "RSUN_REF",
    "DSUN_OBS", "SOLAR_R", "RADIUS", "R_SUN", "HGLN_OBS", "HGLT_OBS",
];

/// Cards cfitsio writes itself from the image description.
const STRUCTURAL_KEYS: [&str; 11] = [
    "SIMPLE", "BITPIX", "NAXIS", "NAXIS1", "NAXIS2", "EXTEND", "BSCALE", "BZERO", "XTENSION",
    "PCOUNT", "GCOUNT",
];

fn read_key_optional<T: fitsio::headers::ReadsKey>(
    hdu: &FitsHdu,
    fptr: &mut FitsFile,
    key: &str,
) -> Option<T> {
    hdu.read_key(fptr, key).ok()
}

/// Collects the keywords the editors use from one HDU.
fn read_header(hdu: &FitsHdu, fptr: &mut FitsFile) -> Header {
    let mut header = Header::new();
    for key in STRING_KEYS {
        if let Some(value) = read_key_optional::<String>(hdu, fptr, key) {
            header.set(key, value.trim().to_string());
        }
    }
    for key in INTEGER_KEYS {
        if let Some(value) = read_key_optional::<i64>(hdu, fptr, key) {
            header.set(key, value);
        } else if let Some(value) = read_key_optional::<f64>(hdu, fptr, key) {
            header.set(key, value);
        }
    }
    for key in FLOAT_KEYS {
        if let Some(value) = read_key_optional::<f64>(hdu, fptr, key) {
            header.set(key, value);
        }
    }
    header
}

/// First HDU holding a non-empty 2-D image, as `(index, rows, cols)`.
///
/// SDO files keep the data in a compressed extension after an empty primary.
fn find_image_hdu(fptr: &mut FitsFile) -> Option<(usize, usize, usize)> {
    let mut index = 0;
    while let Ok(hdu) = fptr.hdu(index) {
        if let HduInfo::ImageInfo { shape, .. } = &hdu.info
            && let [rows, cols] = shape.as_slice()
            && *rows > 0
            && *cols > 0
        {
            return Some((index, *rows, *cols));
        }
        index += 1;
    }
    None
}

/// FITS reader and writer.
///
/// Reads the first 2-D image HDU as `f32` along with the keywords used for
/// calibration and radius normalization. Rows keep FITS order, so the row
/// index is the `y` pixel axis that `CRPIX2` refers to. Writes a single
/// float primary image.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitsMapStore;

impl FitsMapStore {
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for FitsMapStore {
    fn read_map(&self, path: &Path) -> Result<SolarMap> {
        let mut fptr = FitsFile::open(path)
            .map_err(|e| EditorError::InputReadError(format!("{}: {e}", path.display())))?;

        let (index, rows, cols) = find_image_hdu(&mut fptr).ok_or_else(|| {
            EditorError::UnsupportedFormat(format!("{}: no 2-D image HDU", path.display()))
        })?;
        let hdu = fptr.hdu(index)?;
        debug!(index, rows, cols, "Reading FITS image HDU");

        let pixels: Vec<f32> = hdu.read_image(&mut fptr)?;
        let data = Array2::from_shape_vec((rows, cols), pixels)
            .map_err(|e| EditorError::DecodeError(e.to_string()))?;
        let header = read_header(&hdu, &mut fptr);
        Ok(SolarMap::new(data, header))
    }
}

impl ImageWriter for FitsMapStore {
    fn write_map(&self, map: &SolarMap, path: &Path) -> Result<()> {
        let (rows, cols) = map.dim();
        let description = ImageDescription {
            data_type: ImageType::Float,
            dimensions: &[rows, cols],
        };
        let mut fptr = FitsFile::create(path)
            .with_custom_primary(&description)
            .overwrite()
            .open()
            .map_err(|e| EditorError::OutputWriteError(format!("{}: {e}", path.display())))?;
        let hdu = fptr.primary_hdu()?;

        let pixels: Vec<f32> = map.data.iter().copied().collect();
        hdu.write_image(&mut fptr, &pixels)?;

        for (key, value) in map.header.iter() {
            if STRUCTURAL_KEYS.contains(&key) {
                continue;
            }
            match value {
                HeaderValue::Int(v) => hdu.write_key(&mut fptr, key, *v)?,
                HeaderValue::Float(v) => hdu.write_key(&mut fptr, key, *v)?,
                HeaderValue::Str(v) => hdu.write_key(&mut fptr, key, v.clone())?,
                // Logical cards are stored as 0/1.
                HeaderValue::Bool(v) => hdu.write_key(&mut fptr, key, i64::from(*v))?,
            }
        }
        debug!(rows, cols, cards = map.header.len(), "Wrote FITS image");
        Ok(())
    }
}
