//! Matrix serialization laws.

use grapher_ingest::{COMMA, TAB, matrix_to_delimited, parse_delimited, read_delimited_file};
use proptest::prelude::*;

fn rectangular() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..5, 1usize..6).prop_flat_map(|(columns, rows)| {
        prop::collection::vec(
            prop::collection::vec("[A-Za-z0-9 ._-]{0,8}", columns),
            rows,
        )
    })
}

/// Fields that need quoting: delimiters, quotes and line breaks.
fn awkward() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-z,\"\t\n]{1,6}", 3),
        1..5,
    )
}

proptest! {
    #[test]
    fn comma_round_trip(matrix in rectangular()) {
        let text = matrix_to_delimited(&matrix, COMMA);
        prop_assert_eq!(parse_delimited(&text, Some(COMMA)), matrix);
    }

    #[test]
    fn tab_round_trip(matrix in rectangular()) {
        let text = matrix_to_delimited(&matrix, TAB);
        prop_assert_eq!(parse_delimited(&text, Some(TAB)), matrix);
    }

    #[test]
    fn quoted_round_trip(matrix in awkward()) {
        let text = matrix_to_delimited(&matrix, COMMA);
        prop_assert_eq!(parse_delimited(&text, Some(COMMA)), matrix);
    }

    #[test]
    fn parsing_never_panics(text in "[a-z,\"\t\n\r ]{0,40}") {
        let _ = parse_delimited(&text, None);
    }
}

#[test]
fn reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("grapher-ingest-{}.csv", std::process::id()));
    std::fs::write(&path, "entityName\tyear\nFrance\t2000\n").expect("write fixture");
    let matrix = read_delimited_file(&path, None).expect("read fixture");
    std::fs::remove_file(&path).ok();
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix[1], vec!["France".to_string(), "2000".to_string()]);
}
