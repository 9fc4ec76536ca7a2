use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reading the wide PM2.5 source table.
///
/// Per-cell and per-row problems never surface here; the reshaper
/// recovers from those locally.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file could not be opened
    #[error("PM2.5 source '{0}' is unavailable")]
    SourceUnavailable(PathBuf, #[source] std::io::Error),

    /// The CSV could not be read at the record level
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// An identifying column is missing from the header
    #[error("Required column '{0}' not found in source header")]
    MissingColumn(String),
}

/// Type alias for Results using SourceError
pub type Result<T> = std::result::Result<T, SourceError>;
