use std::ffi::OsString;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tracing::debug;

use crate::image_pipeline::common::error::{EditorError, Result};
use crate::image_pipeline::io::reader::ImageReader;
use crate::image_pipeline::io::types::{StoreConfig, TiffCompression};
use crate::image_pipeline::io::writer::ImageWriter;
use crate::image_pipeline::map::{Header, SolarMap};

/// Header sidecar location for an image file: the image path plus `.json`.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

fn widen<T: Copy + Into<f64>>(values: Vec<T>) -> Vec<f32> {
    values.into_iter().map(|v| v.into() as f32).collect()
}

/// Grayscale TIFF reader and writer with a JSON header sidecar.
#[derive(Debug, Clone, Default)]
pub struct TiffMapStore {
    config: StoreConfig,
}

impl TiffMapStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Encodes the map data as a `Gray32Float` TIFF.
    pub fn encode(&self, map: &SolarMap, output: &mut dyn Write) -> Result<()> {
        let (rows, cols) = map.dim();
        debug!("Encoding TIFF image: {}x{}", cols, rows);

        let mut buffer = Vec::new();

        let compression = match self.config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| EditorError::EncodeError(e.to_string()))?
            .with_compression(compression);

        let pixels: Vec<f32> = map.data.iter().copied().collect();
        encoder
            .write_image::<colortype::Gray32Float>(cols as u32, rows as u32, &pixels)
            .map_err(|e| EditorError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }

    /// Decodes a grayscale TIFF of any integer or float sample type to `f32`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Array2<f32>> {
        let mut decoder =
            Decoder::new(Cursor::new(bytes)).map_err(|e| EditorError::DecodeError(e.to_string()))?;

        let colortype = decoder
            .colortype()
            .map_err(|e| EditorError::DecodeError(e.to_string()))?;
        if !matches!(colortype, tiff::ColorType::Gray(_)) {
            return Err(EditorError::UnsupportedFormat(format!(
                "expected a grayscale TIFF, got {colortype:?}"
            )));
        }

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| EditorError::DecodeError(e.to_string()))?;
        let image = decoder
            .read_image()
            .map_err(|e| EditorError::DecodeError(e.to_string()))?;

        let pixels = match image {
            DecodingResult::U8(v) => widen(v),
            DecodingResult::U16(v) => widen(v),
            DecodingResult::U32(v) => widen(v),
            DecodingResult::I8(v) => widen(v),
            DecodingResult::I16(v) => widen(v),
            DecodingResult::I32(v) => widen(v),
            DecodingResult::F32(v) => v,
            DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
            DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
            DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(EditorError::UnsupportedFormat(
                    "unsupported TIFF sample type".to_string(),
                ));
            }
        };

        Array2::from_shape_vec((height as usize, width as usize), pixels)
            .map_err(|e| EditorError::DecodeError(e.to_string()))
    }
}

impl ImageReader for TiffMapStore {
    fn read_map(&self, path: &Path) -> Result<SolarMap> {
        let bytes = fs::read(path)
            .map_err(|e| EditorError::InputReadError(format!("{}: {e}", path.display())))?;
        let data = self.decode(&bytes)?;

        let sidecar = sidecar_path(path);
        let header = if sidecar.exists() {
            let text = fs::read_to_string(&sidecar)?;
            serde_json::from_str(&text)?
        } else {
            debug!("No header sidecar for {}", path.display());
            Header::new()
        };
        Ok(SolarMap::new(data, header))
    }
}

impl ImageWriter for TiffMapStore {
    fn write_map(&self, map: &SolarMap, path: &Path) -> Result<()> {
        let mut buffer = Vec::new();
        self.encode(map, &mut buffer)?;
        fs::write(path, &buffer)
            .map_err(|e| EditorError::OutputWriteError(format!("{}: {e}", path.display())))?;

        if self.config.write_header {
            let json = serde_json::to_string_pretty(&map.header)?;
            fs::write(sidecar_path(path), json).map_err(|e| {
                EditorError::OutputWriteError(format!("{}: {e}", path.display()))
            })?;
        }
        Ok(())
    }
}
