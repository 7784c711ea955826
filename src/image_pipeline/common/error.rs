use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(
        "Invalid data shape: {rows}x{cols} is smaller than patch {patch_rows}x{patch_cols}"
    )]
    PatchTooLarge {
        rows: usize,
        cols: usize,
        patch_rows: usize,
        patch_cols: usize,
    },

    #[error("Crop [{row0}..{row1}, {col0}..{col1}] exceeds array bounds {rows}x{cols}")]
    CropOutOfBounds {
        row0: isize,
        row1: isize,
        col0: isize,
        col1: isize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid patch found (all values {0})")]
    DegeneratePatch(f64),

    #[error("No finite extremum in channel {0}")]
    NoExtremum(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing header keyword: {0}")]
    MissingKeyword(String),

    #[error("Invalid value for header keyword {key}: {value}")]
    InvalidKeyword { key: String, value: String },

    #[error("Editor {editor} expected {expected} data, got {found}")]
    UnexpectedData {
        editor: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Calibration table error: {0}")]
    CalibrationTable(String),

    #[error("Calibration table has no column for wavelength {0}")]
    MissingCalibrationColumn(String),

    #[error("No valid calibration epoch for wavelength {wavelength} at {date}")]
    NoCalibrationEpoch { wavelength: i64, date: String },

    #[error("No archive record with a valid quality flag near {0}")]
    NoArchiveRecord(String),

    #[error("Failed to fetch {url}: {reason}")]
    FetchError { url: String, reason: String },

    #[error("FITS I/O error: {0}")]
    FitsError(#[from] fitsio::errors::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
