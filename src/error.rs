use thiserror::Error;

/// Errors raised while reading the entries CSV.
///
/// Every variant surfaces at load time; aggregation never fails.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read
    #[error("failed to read entries: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV (bad quoting, ragged rows, invalid UTF-8)
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}: unknown degree `{value}` (expected Light, Medium or Heavy)")]
    UnknownDegree { row: usize, value: String },

    #[error("row {row}: unknown category `{value}`")]
    UnknownCategory { row: usize, value: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;
