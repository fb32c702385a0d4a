//! Error types for circos_mag

use thiserror::Error;

/// Result type alias for track generation
pub type Result<T> = std::result::Result<T, TrackError>;

/// Everything that can abort a run.
///
/// Parse and format errors are fatal for the whole run. Classification
/// problems (unknown rRNA product, missing `product=`) are not errors; they
/// are reported through [`crate::diagnostics::Diagnostics`] instead.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Input path does not exist
    #[error("Input file does not exist: {0}")]
    NotFound(String),

    /// Zero records where at least one is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// File extension is not a recognised sequence format
    #[error("Unrecognized extension for sequence file: {0}")]
    UnsupportedFormat(String),

    /// Structurally invalid line in a strict format
    #[error("Malformed record in {path} at line {line}: {msg}")]
    MalformedRecord {
        /// File being parsed
        path: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        msg: String,
    },

    /// Out-of-range configuration value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Degenerate numeric state, e.g. a zero mean used as a divisor
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Plot style file could not be parsed
    #[error("Invalid plot style: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON summary could not be serialised
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackError {
    pub fn malformed(path: &str, line: usize, msg: impl Into<String>) -> Self {
        TrackError::MalformedRecord {
            path: path.to_string(),
            line,
            msg: msg.into(),
        }
    }
}
