//! Header normalization.

use std::collections::HashSet;

use tracing::debug;

const BOM: char = '\u{feff}';

/// Trims whitespace and a stray byte order mark from a header cell.
pub fn normalize_header(value: &str) -> String {
    value.trim_matches(BOM).trim().to_string()
}

/// Normalizes every header cell and names blank headers by position
/// (`column1`, `column2`, ...) so every column keeps a usable slug.
///
/// A repeated name gets the first free `_2`, `_3`, ... suffix, so the
/// result never holds the same slug twice.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut slugs = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let mut slug = normalize_header(header);
        if slug.is_empty() {
            slug = format!("column{}", idx + 1);
        }
        if taken.contains(&slug) {
            let renamed = (2..)
                .map(|n| format!("{slug}_{n}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();
            debug!(header = %slug, renamed = %renamed, "renamed repeated header");
            slug = renamed;
        }
        taken.insert(slug.clone());
        slugs.push(slug);
    }
    slugs
}
