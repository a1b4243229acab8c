//! Catalog paths in indicator fields.
//!
//! Authors may reference indicators by a symbolic path such as
//! `grapher/gdp/2024-01-01/gdp#gdp` instead of a numeric id. The collaborator
//! looks the paths up and hands back a map; unresolved entries map to `None`
//! and the path is left in place so the mistake stays visible.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::matrix::DecisionRow;

/// Payload fields that hold indicator references.
pub const INDICATOR_FIELDS: [&str; 4] = [
    "yVariableIds",
    "xVariableId",
    "colorVariableId",
    "sizeVariableId",
];

/// Whether a token is a catalog path rather than a numeric id.
pub fn is_catalog_path(token: &str) -> bool {
    token.contains('/')
}

/// Distinct catalog paths used in `fields` across `rows`.
pub fn collect_catalog_paths<'a>(
    rows: impl IntoIterator<Item = &'a DecisionRow>,
    fields: &[&str],
) -> BTreeSet<String> {
    rows.into_iter()
        .flat_map(|row| fields.iter().filter_map(move |field| row.field(field)))
        .flat_map(str::split_whitespace)
        .filter(|token| is_catalog_path(token))
        .map(str::to_string)
        .collect()
}

/// Rewrites every resolvable path in a whitespace-separated token list.
///
/// Tokens missing from `ids` or mapped to `None` are kept as written. When
/// no token resolves, `value` is returned as it was, spacing included.
pub fn resolve_catalog_paths(value: &str, ids: &HashMap<String, Option<i64>>) -> String {
    let mut substituted = false;
    let tokens: Vec<String> = value
        .split_whitespace()
        .map(|token| match ids.get(token) {
            Some(Some(id)) => {
                substituted = true;
                id.to_string()
            }
            Some(None) => {
                warn!(path = token, "catalog path did not resolve");
                token.to_string()
            }
            None => token.to_string(),
        })
        .collect();
    if substituted {
        tokens.join(" ")
    } else {
        value.to_string()
    }
}

/// A copy of `row` with its indicator fields resolved.
pub fn resolve_row_catalog_paths(row: &DecisionRow, ids: &HashMap<String, Option<i64>>) -> DecisionRow {
    let mut resolved = row.clone();
    for field in INDICATOR_FIELDS {
        if let Some(value) = resolved.fields.get_mut(field) {
            *value = resolve_catalog_paths(value, ids);
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> HashMap<String, Option<i64>> {
        HashMap::from([
            ("grapher/gdp/111#d".to_string(), Some(5001)),
            ("grapher/population/222#d".to_string(), Some(5002)),
            ("grapher/missing/333#d".to_string(), None),
        ])
    }

    #[test]
    fn test_resolves_each_token() {
        assert_eq!(
            resolve_catalog_paths("grapher/gdp/111#d grapher/population/222#d", &ids()),
            "5001 5002"
        );
    }

    #[test]
    fn test_unresolved_path_is_kept() {
        assert_eq!(
            resolve_catalog_paths("grapher/missing/333#d 42", &ids()),
            "grapher/missing/333#d 42"
        );
    }

    #[test]
    fn test_spacing_kept_when_nothing_resolves() {
        let value = "  grapher/missing/333#d\t42  ";
        assert_eq!(resolve_catalog_paths(value, &ids()), value);
        assert_eq!(
            resolve_catalog_paths(" grapher/gdp/111#d\t42 ", &ids()),
            "5001 42"
        );
    }

    #[test]
    fn test_collect_skips_numeric_ids() {
        let rows = [
            DecisionRow::new(0).with_field("yVariableIds", "grapher/gdp/111#d 42"),
            DecisionRow::new(1)
                .with_field("xVariableId", "grapher/gdp/111#d")
                .with_field("title", "a/b"),
        ];
        let paths = collect_catalog_paths(&rows, &INDICATOR_FIELDS);
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), vec!["grapher/gdp/111#d"]);
    }

    #[test]
    fn test_row_fields_are_resolved() {
        let row = DecisionRow::new(0)
            .with_field("colorVariableId", "grapher/population/222#d")
            .with_field("title", "grapher/gdp/111#d");
        let resolved = resolve_row_catalog_paths(&row, &ids());
        assert_eq!(resolved.field("colorVariableId"), Some("5002"));
        assert_eq!(resolved.field("title"), Some("grapher/gdp/111#d"));
    }
}
