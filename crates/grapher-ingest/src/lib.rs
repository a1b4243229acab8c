//! Delimited text ingestion for grapher tables.
//!
//! - **Delimiter detection**: tab when the first line has one, comma otherwise
//! - **Lenient parsing**: uneven rows and stray quotes never abort a parse
//! - **Serialization**: [`matrix_to_delimited`] is the inverse of
//!   [`parse_delimited`] for rectangular input
//! - **File reading**: UTF-8 only, with a clear error for UTF-16 input
//!
//! # Example
//!
//! ```
//! use grapher_ingest::{COMMA, matrix_to_delimited, parse_delimited};
//!
//! let matrix = parse_delimited("entityName,year\nFrance,2000", None);
//! assert_eq!(matrix[1], vec!["France".to_string(), "2000".to_string()]);
//! assert_eq!(matrix_to_delimited(&matrix, COMMA), "entityName,year\nFrance,2000");
//! ```

mod delimited;
mod error;
mod header;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimited Text ===
pub use delimited::{COMMA, Matrix, TAB, detect_delimiter, matrix_to_delimited, parse_delimited};

// === Headers ===
pub use header::{normalize_header, normalize_headers};

// === Files ===
pub use reader::{WIDE_TABLE_COLUMNS, read_delimited_file};
