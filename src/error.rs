//! Error types for reading ingestion.

/// Rejection of a single inbound record.
///
/// Only structurally invalid input is an error. Sparse data (missing optional
/// fields, empty batches) degrades to neutral output instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadingError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Malformed reading: {0}")]
    MalformedRecord(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}
