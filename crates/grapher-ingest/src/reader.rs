//! Reading delimited files from disk.

use std::path::Path;

use tracing::{debug, warn};

use crate::delimited::{Matrix, parse_delimited};
use crate::error::{IngestError, Result};

/// Warn above this many columns.
pub const WIDE_TABLE_COLUMNS: usize = 500;

/// Reads a UTF-8 file and parses it with [`parse_delimited`].
pub fn read_delimited_file(path: &Path, delimiter: Option<u8>) -> Result<Matrix> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if let Some(encoding) = utf16_bom(&bytes) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding,
        });
    }

    let text = String::from_utf8(bytes).map_err(|_| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    let matrix = parse_delimited(&text, delimiter);

    let width = matrix.first().map_or(0, Vec::len);
    if width > WIDE_TABLE_COLUMNS {
        warn!(
            path = %path.display(),
            columns = width,
            "delimited file has more than {WIDE_TABLE_COLUMNS} columns"
        );
    }
    debug!(path = %path.display(), rows = matrix.len(), columns = width, "read delimited file");
    Ok(matrix)
}

fn utf16_bom(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xFE, ..] => Some("UTF-16 LE"),
        [0xFE, 0xFF, ..] => Some("UTF-16 BE"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = read_delimited_file(Path::new("/nonexistent/grapher.csv"), None).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_utf16_rejected() {
        assert_eq!(utf16_bom(&[0xFF, 0xFE, 0x41, 0x00]), Some("UTF-16 LE"));
        assert_eq!(utf16_bom(b"a,b"), None);
    }
}
