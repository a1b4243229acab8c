//! The immutable column-store table.

use std::collections::BTreeMap;
use std::sync::Arc;

use grapher_columns::{RawCell, detect_for_slug, format_for_csv, parse_cell};
use grapher_ingest::{matrix_to_delimited, normalize_headers, parse_delimited};
use grapher_model::{
    CellValue, ColumnDef, ColumnTypeName, ErrorValue, GrapherError, Result, TableOptions,
    TransformRecord,
};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::column::ColumnView;

/// One column of one generation: its definition and its parsed cells.
///
/// Cells sit behind an `Arc` so generations that leave a column untouched
/// share the store instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredColumn {
    pub(crate) def: ColumnDef,
    pub(crate) values: Arc<[CellValue]>,
}

impl StoredColumn {
    pub(crate) fn new(def: ColumnDef, values: Vec<CellValue>) -> Self {
        Self {
            def,
            values: values.into(),
        }
    }

    pub(crate) fn slug(&self) -> &str {
        &self.def.slug
    }
}

/// An immutable table of typed columns.
///
/// Every transform returns a new table and leaves the receiver untouched.
/// All column stores always have exactly [`CoreTable::row_count`] cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreTable {
    columns: Vec<StoredColumn>,
    row_count: usize,
    options: TableOptions,
    lineage: Vec<TransformRecord>,
}

impl CoreTable {
    /// A table with no columns and no rows.
    pub fn empty(options: TableOptions) -> Self {
        Self {
            columns: Vec::new(),
            row_count: 0,
            options,
            lineage: Vec::new(),
        }
    }

    /// Builds a table from already-parsed columns.
    ///
    /// Fails when slugs repeat or column lengths differ.
    pub fn from_columns(
        columns: Vec<(ColumnDef, Vec<CellValue>)>,
        options: TableOptions,
    ) -> Result<Self> {
        let row_count = columns.first().map_or(0, |(_, values)| values.len());
        let stored = columns
            .into_iter()
            .map(|(def, values)| StoredColumn::new(def, values))
            .collect();
        let record = TransformRecord::new("fromColumns", Vec::new(), row_count);
        Self::assemble(stored, row_count, options, vec![record])
    }

    /// Builds a table from a header row plus data rows.
    ///
    /// Short rows are padded with [`ErrorValue::MissingValuePlaceholder`]
    /// and long rows are truncated to the header width. Columns without a
    /// definition get a detected type. Definitions naming a slug the header
    /// lacks add a column: computed when the definition carries a transform,
    /// placeholder-filled otherwise.
    pub fn from_matrix(
        matrix: &[Vec<String>],
        defs: &[ColumnDef],
        options: TableOptions,
    ) -> Result<Self> {
        let Some((header, rows)) = matrix.split_first() else {
            return Self::with_defs_only(defs, 0, options);
        };
        let slugs = normalize_headers(header);
        let row_count = rows.len();

        let mut columns = Vec::with_capacity(slugs.len());
        for (idx, slug) in slugs.iter().enumerate() {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str))
                .collect();
            let def = resolve_def(slug, defs, || {
                detect_for_slug(slug, cells.iter().flatten().map(|text| RawCell::Text(text)), &options)
            });
            let column_type = def.resolved_type();
            let values = cells
                .iter()
                .map(|cell| match cell {
                    Some(text) => parse_cell(column_type, RawCell::Text(text)),
                    None => CellValue::Error(ErrorValue::MissingValuePlaceholder),
                })
                .collect();
            columns.push(StoredColumn::new(def, values));
        }

        let record = TransformRecord::new("fromMatrix", vec![slugs.len().to_string()], row_count);
        let table = Self::assemble(columns, row_count, options, vec![record])?;
        table.with_remaining_defs(defs)
    }

    /// Builds a table from JSON object rows.
    ///
    /// Slugs are taken in first-appearance order. A row lacking a key holds
    /// an `Undefined...` error for that column.
    pub fn from_rows(
        rows: &[Map<String, Value>],
        defs: &[ColumnDef],
        options: TableOptions,
    ) -> Result<Self> {
        let mut slugs: Vec<&str> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !slugs.contains(&key.as_str()) {
                    slugs.push(key);
                }
            }
        }

        let mut columns = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            let def = resolve_def(slug, defs, || {
                detect_for_slug(
                    slug,
                    rows.iter().filter_map(|row| row.get(*slug)).map(RawCell::from),
                    &options,
                )
            });
            let column_type = def.resolved_type();
            let undefined = if column_type.is_numeric() {
                ErrorValue::UndefinedButShouldBeNumber
            } else {
                ErrorValue::UndefinedButShouldBeString
            };
            let values = rows
                .iter()
                .map(|row| match row.get(*slug) {
                    Some(value) => parse_cell(column_type, RawCell::from(value)),
                    None => CellValue::Error(undefined),
                })
                .collect();
            columns.push(StoredColumn::new(def, values));
        }

        let record = TransformRecord::new("fromRows", vec![slugs.len().to_string()], rows.len());
        let table = Self::assemble(columns, rows.len(), options, vec![record])?;
        table.with_remaining_defs(defs)
    }

    /// Parses delimited text (comma or tab, detected) into a table.
    pub fn from_delimited(text: &str, defs: &[ColumnDef], options: TableOptions) -> Result<Self> {
        Self::from_matrix(&parse_delimited(text, None), defs, options)
    }

    fn with_defs_only(defs: &[ColumnDef], row_count: usize, options: TableOptions) -> Result<Self> {
        let record = TransformRecord::new("fromMatrix", vec!["0".to_string()], row_count);
        Self::assemble(Vec::new(), row_count, options, vec![record])?.with_remaining_defs(defs)
    }

    /// Adds columns for definitions the source data did not supply.
    fn with_remaining_defs(self, defs: &[ColumnDef]) -> Result<Self> {
        let mut table = self;
        for def in defs {
            if def.transform.is_some() {
                table = table.add_transform_column(def)?;
            } else if !table.has_column(&def.slug) {
                let values =
                    vec![CellValue::Error(ErrorValue::MissingValuePlaceholder); table.row_count];
                let mut columns = table.columns.clone();
                columns.push(StoredColumn::new(def.clone(), values));
                table = table.derive(
                    TransformRecord::new("addColumn", vec![def.slug.clone()], table.row_count),
                    columns,
                    table.row_count,
                )?;
            }
        }
        Ok(table)
    }

    /// The single constructor every generation goes through.
    fn assemble(
        columns: Vec<StoredColumn>,
        row_count: usize,
        options: TableOptions,
        lineage: Vec<TransformRecord>,
    ) -> Result<Self> {
        for (idx, column) in columns.iter().enumerate() {
            if column.values.len() != row_count {
                return Err(GrapherError::LengthMismatch {
                    slug: column.def.slug.clone(),
                    expected: row_count,
                    actual: column.values.len(),
                });
            }
            if columns[..idx].iter().any(|other| other.slug() == column.slug()) {
                return Err(GrapherError::DuplicateColumn(column.def.slug.clone()));
            }
        }
        Ok(Self {
            columns,
            row_count,
            options,
            lineage,
        })
    }

    /// Next generation: new columns, this table's options, lineage plus `record`.
    pub(crate) fn derive(
        &self,
        record: TransformRecord,
        columns: Vec<StoredColumn>,
        row_count: usize,
    ) -> Result<Self> {
        debug!(
            transform = %record.name,
            params = ?record.params,
            rows_before = self.row_count,
            rows_after = row_count,
            "table transform"
        );
        let mut lineage = self.lineage.clone();
        lineage.push(record);
        Self::assemble(columns, row_count, self.options.clone(), lineage)
    }

    /// Columns with `def` replacing the same-slug column, or appended.
    pub(crate) fn columns_with(&self, def: ColumnDef, values: Vec<CellValue>) -> Vec<StoredColumn> {
        let mut columns = self.columns.clone();
        let replacement = StoredColumn::new(def, values);
        match columns
            .iter_mut()
            .find(|column| column.slug() == replacement.slug())
        {
            Some(existing) => *existing = replacement,
            None => columns.push(replacement),
        }
        columns
    }

    /// Every column restricted to `indices`, in that order.
    pub(crate) fn columns_at(&self, indices: &[usize]) -> Vec<StoredColumn> {
        self.columns
            .iter()
            .map(|column| StoredColumn {
                def: column.def.clone(),
                values: indices.iter().map(|&idx| column.values[idx].clone()).collect(),
            })
            .collect()
    }

    pub(crate) fn stored_columns(&self) -> &[StoredColumn] {
        &self.columns
    }

    pub(crate) fn stored(&self, slug: &str) -> Result<&StoredColumn> {
        self.columns
            .iter()
            .find(|column| column.slug() == slug)
            .ok_or_else(|| GrapherError::UnknownColumn(slug.to_string()))
    }

    /// Applies a caller-supplied transform and records it in the lineage
    /// under `name`. The closure receives this table and must not rely on
    /// anything but its public API.
    pub fn transform<F>(&self, name: &str, params: Vec<String>, f: F) -> Result<Self>
    where
        F: FnOnce(&CoreTable) -> Result<CoreTable>,
    {
        let next = f(self)?;
        let record = TransformRecord::new(name, params, next.row_count);
        self.derive(record, next.columns, next.row_count)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_slugs(&self) -> Vec<&str> {
        self.columns.iter().map(StoredColumn::slug).collect()
    }

    pub fn defs(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().map(|column| &column.def)
    }

    pub fn has_column(&self, slug: &str) -> bool {
        self.columns.iter().any(|column| column.slug() == slug)
    }

    pub fn column_def(&self, slug: &str) -> Result<&ColumnDef> {
        self.stored(slug).map(|column| &column.def)
    }

    pub fn column(&self, slug: &str) -> Result<ColumnView<'_>> {
        self.stored(slug)
            .map(|column| ColumnView::new(&column.def, &column.values))
    }

    pub fn columns(&self) -> impl Iterator<Item = ColumnView<'_>> {
        self.columns
            .iter()
            .map(|column| ColumnView::new(&column.def, &column.values))
    }

    pub fn get(&self, slug: &str, row: usize) -> Result<&CellValue> {
        self.check_row(row)?;
        Ok(&self.stored(slug)?.values[row])
    }

    /// Row `index` as a slug to cell map.
    pub fn row(&self, index: usize) -> Result<BTreeMap<String, CellValue>> {
        self.check_row(index)?;
        Ok(self
            .columns
            .iter()
            .map(|column| (column.def.slug.clone(), column.values[index].clone()))
            .collect())
    }

    /// Borrowed view of row `index`, used by row predicates.
    pub fn row_ref(&self, index: usize) -> Result<RowRef<'_>> {
        self.check_row(index)?;
        Ok(RowRef { table: self, index })
    }

    pub(crate) fn check_row(&self, index: usize) -> Result<()> {
        if index < self.row_count {
            Ok(())
        } else {
            Err(GrapherError::RowOutOfRange {
                index,
                row_count: self.row_count,
            })
        }
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Transform records from construction to this generation.
    pub fn lineage(&self) -> &[TransformRecord] {
        &self.lineage
    }

    /// Header row plus CSV-formatted cells.
    pub fn to_matrix(&self) -> Vec<Vec<String>> {
        let mut matrix = Vec::with_capacity(self.row_count + 1);
        matrix.push(self.column_slugs().into_iter().map(str::to_string).collect());
        for row in 0..self.row_count {
            matrix.push(
                self.columns
                    .iter()
                    .map(|column| format_for_csv(column.def.resolved_type(), &column.values[row]))
                    .collect(),
            );
        }
        matrix
    }

    pub fn to_delimited(&self, delimiter: u8) -> String {
        matrix_to_delimited(&self.to_matrix(), delimiter)
    }
}

/// A row of a table, borrowed.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a CoreTable,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The cell in column `slug`, or `None` when the table has no such column.
    pub fn get(&self, slug: &str) -> Option<&'a CellValue> {
        self.table
            .stored(slug)
            .ok()
            .map(|column| &column.values[self.index])
    }

    pub fn get_f64(&self, slug: &str) -> Option<f64> {
        self.get(slug).and_then(CellValue::as_f64)
    }
}

/// The caller's definition when there is one; otherwise a detected type.
/// A caller definition without a type is completed by detection too.
fn resolve_def<F>(slug: &str, defs: &[ColumnDef], detect: F) -> ColumnDef
where
    F: FnOnce() -> ColumnTypeName,
{
    match defs.iter().find(|def| def.slug == slug && def.transform.is_none()) {
        Some(def) if def.column_type.is_some() => def.clone(),
        Some(def) => {
            let detected = detect();
            trace!(slug, detected = %detected, "typing defined column by detection");
            def.clone().with_type(detected)
        }
        None => ColumnDef::new(slug).with_type(detect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_truncated() {
        let table = CoreTable::from_matrix(
            &matrix(&[&["entityName", "year", "gdp"], &["France", "2000"], &["Chad", "2000", "3", "extra"]]),
            &[],
            TableOptions::default(),
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(
            table.get("gdp", 0).unwrap(),
            &CellValue::Error(ErrorValue::MissingValuePlaceholder)
        );
        assert_eq!(table.get("gdp", 1).unwrap(), &CellValue::Integer(3));
    }

    #[test]
    fn test_detection_and_known_slugs() {
        let table = CoreTable::from_delimited(
            "entityName,year,gdp,note\nFrance,2000,1.5,a\nChad,2001,2,b",
            &[],
            TableOptions::default(),
        )
        .unwrap();
        let types: Vec<ColumnTypeName> = table.defs().map(ColumnDef::resolved_type).collect();
        assert_eq!(
            types,
            vec![
                ColumnTypeName::EntityName,
                ColumnTypeName::Year,
                ColumnTypeName::Numeric,
                ColumnTypeName::String,
            ]
        );
    }

    #[test]
    fn test_explicit_defs_win_over_detection() {
        let defs = [ColumnDef::new("code").with_type(ColumnTypeName::String)];
        let table = CoreTable::from_delimited("code\n001\n002", &defs, TableOptions::default()).unwrap();
        assert_eq!(table.get("code", 0).unwrap(), &CellValue::Text("001".into()));
    }

    #[test]
    fn test_defs_without_data_add_placeholder_columns() {
        let defs = [ColumnDef::new("population").with_type(ColumnTypeName::Population)];
        let table = CoreTable::from_delimited("year\n2000", &defs, TableOptions::default()).unwrap();
        assert_eq!(
            table.get("population", 0).unwrap(),
            &CellValue::Error(ErrorValue::MissingValuePlaceholder)
        );
    }

    #[test]
    fn test_rows_missing_keys_are_undefined() {
        let rows: Vec<Map<String, Value>> = serde_json::from_str(
            r#"[{"entityName": "France", "gdp": 1.5}, {"entityName": "Chad"}]"#,
        )
        .unwrap();
        let table = CoreTable::from_rows(&rows, &[], TableOptions::default()).unwrap();
        assert_eq!(
            table.get("gdp", 1).unwrap(),
            &CellValue::Error(ErrorValue::UndefinedButShouldBeNumber)
        );
    }

    #[test]
    fn test_from_columns_rejects_ragged_input() {
        let err = CoreTable::from_columns(
            vec![
                (ColumnDef::new("a"), vec![CellValue::Integer(1)]),
                (ColumnDef::new("b"), vec![]),
            ],
            TableOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GrapherError::LengthMismatch { .. }));
    }

    #[test]
    fn test_row_out_of_range() {
        let table = CoreTable::from_delimited("a\n1", &[], TableOptions::default()).unwrap();
        assert!(matches!(
            table.row(5),
            Err(GrapherError::RowOutOfRange { index: 5, row_count: 1 })
        ));
    }

    #[test]
    fn test_to_delimited_uses_csv_formats() {
        let defs = [ColumnDef::new("q").with_type(ColumnTypeName::Quarter)];
        let table = CoreTable::from_delimited("q,v\n2020-Q3,1.25", &defs, TableOptions::default()).unwrap();
        assert_eq!(table.to_delimited(b','), "q,v\n2020-Q3,1.25");
    }
}
