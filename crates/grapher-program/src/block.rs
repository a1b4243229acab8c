//! Indented blocks of a program.

use std::collections::BTreeMap;

use grapher_model::{ColumnDef, ColumnTypeName};
use tracing::warn;

/// What a block holds, by its keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Decision matrix rows.
    Graphers,
    /// Inline data, or a reference to remote data.
    Table,
    /// Column definitions for a table.
    Columns,
    /// Any other keyword. Kept as written.
    Opaque(String),
}

impl BlockKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "graphers" => BlockKind::Graphers,
            "table" => BlockKind::Table,
            "columns" => BlockKind::Columns,
            other => BlockKind::Opaque(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            BlockKind::Graphers => "graphers",
            BlockKind::Table => "table",
            BlockKind::Columns => "columns",
            BlockKind::Opaque(keyword) => keyword,
        }
    }

    /// Whether the keyword opens a block even with no indented rows.
    pub fn is_known(&self) -> bool {
        !matches!(self, BlockKind::Opaque(_))
    }
}

/// A keyword line and the indented rows under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Line index of the keyword line.
    pub line: usize,
    pub kind: BlockKind,
    /// Non-empty cells after the keyword.
    pub args: Vec<String>,
    /// Body rows with the leading indent cell removed. The first row is the
    /// header.
    pub rows: Vec<Vec<String>>,
}

impl Block {
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Header plus every row with at least one non-blank cell.
    pub fn matrix(&self) -> Vec<Vec<String>> {
        let mut rows = self.rows.iter();
        let Some(header) = rows.next() else {
            return Vec::new();
        };
        std::iter::once(header.clone())
            .chain(
                rows.filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
                    .cloned(),
            )
            .collect()
    }

    /// Non-header rows as header-keyed maps. Blank cells are left out.
    pub fn records(&self) -> Vec<BTreeMap<&str, &str>> {
        let Some(header) = self.header() else {
            return Vec::new();
        };
        self.rows[1..]
            .iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.trim(), cell.trim()))
                    .filter(|(name, cell)| !name.is_empty() && !cell.is_empty())
                    .collect::<BTreeMap<_, _>>()
            })
            .filter(|record| !record.is_empty())
            .collect()
    }

    /// Remote source of a `table` block.
    pub fn url(&self) -> Option<&str> {
        if self.kind != BlockKind::Table {
            return None;
        }
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| arg.contains("://"))
    }

    /// Table slug named by a `table` or `columns` block.
    pub fn table_slug(&self) -> Option<&str> {
        match self.kind {
            BlockKind::Table => self
                .args
                .iter()
                .map(String::as_str)
                .find(|arg| !arg.contains("://")),
            BlockKind::Columns => self.args.first().map(String::as_str),
            BlockKind::Graphers | BlockKind::Opaque(_) => None,
        }
    }

    /// Column definitions of a `columns` block. Rows without a slug are
    /// skipped.
    pub fn column_defs(&self) -> Vec<ColumnDef> {
        self.records()
            .into_iter()
            .filter_map(|record| {
                let Some(slug) = record.get("slug") else {
                    warn!(line = self.line, "column definition without slug");
                    return None;
                };
                Some(column_def(slug, &record, self.line))
            })
            .collect()
    }
}

fn column_def(slug: &str, record: &BTreeMap<&str, &str>, line: usize) -> ColumnDef {
    let text = |key: &str| record.get(key).map(|value| (*value).to_string());
    let column_type = record.get("type").and_then(|value| match value.parse::<ColumnTypeName>() {
        Ok(column_type) => Some(column_type),
        Err(message) => {
            warn!(slug, line, %message, "column type will be detected");
            None
        }
    });
    ColumnDef {
        slug: slug.to_string(),
        column_type,
        name: text("name"),
        unit: text("unit"),
        short_unit: text("shortUnit"),
        num_decimal_places: record.get("numDecimalPlaces").and_then(|value| value.parse().ok()),
        transform: text("transform"),
        tolerance: record.get("tolerance").and_then(|value| value.parse().ok()),
        source_slug: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: BlockKind, args: &[&str], rows: &[&[&str]]) -> Block {
        Block {
            line: 0,
            kind,
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_table_args() {
        let remote = block(BlockKind::Table, &["https://example.org/co2.csv", "co2"], &[]);
        assert_eq!(remote.url(), Some("https://example.org/co2.csv"));
        assert_eq!(remote.table_slug(), Some("co2"));
        let inline = block(BlockKind::Table, &[], &[]);
        assert_eq!(inline.url(), None);
        assert_eq!(inline.table_slug(), None);
    }

    #[test]
    fn test_column_defs() {
        let columns = block(
            BlockKind::Columns,
            &["co2"],
            &[
                &["slug", "type", "unit", "tolerance", "numDecimalPlaces"],
                &["gdp", "Currency", "dollars", "5", "0"],
                &["", "Numeric"],
                &["ratio", "NotAType"],
            ],
        );
        let defs = columns.column_defs();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].column_type, Some(ColumnTypeName::Currency));
        assert_eq!(defs[0].unit.as_deref(), Some("dollars"));
        assert_eq!(defs[0].tolerance, Some(5));
        assert_eq!(defs[0].num_decimal_places, Some(0));
        assert_eq!(defs[1].slug, "ratio");
        assert_eq!(defs[1].column_type, None);
    }

    #[test]
    fn test_matrix_drops_blank_rows() {
        let graphers = block(
            BlockKind::Graphers,
            &[],
            &[&["Gas Radio"], &["", ""], &["CO₂"]],
        );
        assert_eq!(graphers.matrix().len(), 2);
    }
}
