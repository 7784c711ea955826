use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::map::SolarMap;

pub trait ImageReader: Send + Sync {
    fn read_map(&self, path: &Path) -> Result<SolarMap>;
}
