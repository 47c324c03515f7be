use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataLoadError>;

/// Everything that can go wrong while obtaining and parsing the observation
/// dataset. All variants are fatal for the session.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Row {row}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Dataset contains no observations")]
    Empty,

    #[error("Could not download {url}: {message}")]
    Fetch { url: String, message: String },
}
