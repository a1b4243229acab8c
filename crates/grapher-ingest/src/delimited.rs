//! Lenient delimited text parsing and its inverse.

use csv::ReaderBuilder;
use tracing::{debug, warn};

/// Rows of raw cells; the first row is the header when there is one.
pub type Matrix = Vec<Vec<String>>;

pub const COMMA: u8 = b',';
pub const TAB: u8 = b'\t';

/// Tab when the first line contains a tab, comma otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.contains('\t') { TAB } else { COMMA }
}

/// Parses delimited text into a matrix without ever failing.
///
/// Quoted fields may contain delimiters, quotes (doubled) and newlines. Rows
/// keep their own length; callers pad or truncate against the header.
/// Blank lines are skipped. A record the reader cannot decode is dropped with
/// a warning and parsing continues.
pub fn parse_delimited(text: &str, delimiter: Option<u8>) -> Matrix {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(text));
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut matrix = Vec::new();
    let mut skipped = 0usize;
    for (idx, record) in reader.records().enumerate() {
        match record {
            Ok(record) => matrix.push(record.iter().map(str::to_string).collect()),
            Err(err) => {
                skipped += 1;
                warn!(record = idx, error = %err, "skipping unreadable delimited record");
            }
        }
    }
    debug!(
        rows = matrix.len(),
        skipped,
        delimiter = %char::from(delimiter).escape_default(),
        "parsed delimited text"
    );
    matrix
}

/// Serializes a matrix so that [`parse_delimited`] reads it back unchanged.
///
/// Fields containing the delimiter, a quote or a line break are quoted. A
/// row made of one empty field is written as `""` so it is not mistaken for
/// a blank line. Rows are joined by `\n` with no trailing newline.
pub fn matrix_to_delimited(matrix: &[Vec<String>], delimiter: u8) -> String {
    let delimiter = char::from(delimiter);
    let mut separator = [0u8; 4];
    let separator = delimiter.encode_utf8(&mut separator);
    matrix
        .iter()
        .map(|row| {
            if let [only] = row.as_slice()
                && only.is_empty()
            {
                return "\"\"".to_string();
            }
            row.iter()
                .map(|field| quote_field(field, delimiter))
                .collect::<Vec<_>>()
                .join(separator)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field
        .chars()
        .any(|ch| ch == delimiter || ch == '"' || ch == '\n' || ch == '\r');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
