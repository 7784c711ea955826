//! Map reading and writing
//!
//! Load and save are traits so the pipeline does not depend on a file
//! format. [`FitsMapStore`] reads and writes archive FITS files;
//! [`TiffMapStore`] keeps the data as a 32-bit float TIFF and the header as
//! a JSON sidecar.

mod fits_store;
mod reader;
mod tiff_store;
pub mod types;
mod writer;

pub use fits_store::FitsMapStore;
pub use reader::ImageReader;
pub use tiff_store::{TiffMapStore, sidecar_path};
pub use types::{StoreConfig, StoreConfigBuilder, TiffCompression};
pub use writer::ImageWriter;
