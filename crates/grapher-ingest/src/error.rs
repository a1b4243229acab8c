//! Error types for delimited text ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading delimited files.
///
/// Parsing text never fails; only getting the text off disk can.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// UTF-16 input is rejected rather than decoded as garbage.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
