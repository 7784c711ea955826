use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::map::SolarMap;

pub trait ImageWriter: Send + Sync {
    fn write_map(&self, map: &SolarMap, path: &Path) -> Result<()>;
}
