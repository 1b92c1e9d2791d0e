//! Error types for the data-loader crate.
//!
//! Only structural problems with the table surface here. Per-record
//! anomalies (a malformed release date, empty keywords, a non-numeric
//! popularity) are absorbed by the parser and never become errors.

use thiserror::Error;

/// Errors that can occur while loading, editing or writing a catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader or writer rejected the data
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Line in the catalog file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A column the engine cannot run without is absent from the header
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// A column written back to the table has the wrong number of values
    #[error("Column {column} has {found} values but the catalog has {expected} rows")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Attempted to overwrite one of the input columns
    #[error("Refusing to overwrite input column: {column}")]
    ProtectedColumn { column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
