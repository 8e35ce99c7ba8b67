//! Error types for the scanner engine.

use thiserror::Error;

/// Top-level error for the warden engine.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Errors produced by individual scanners or the scan runner.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanner '{scanner}' failed: {message}")]
    ScannerFailed { scanner: String, message: String },
    #[error("scanner '{0}' not found")]
    ScannerNotFound(String),
    #[error("invalid rule '{rule_id}': {message}")]
    InvalidRule { rule_id: String, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}
