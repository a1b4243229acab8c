//! Column selection and row transforms.

use std::cmp::Ordering;

use grapher_columns::{RawCell, format_for_csv, parse_cell};
use grapher_model::{CellValue, ColumnDef, GrapherError, Result, TransformRecord, compare_cells};
use serde::{Deserialize, Serialize};

use crate::table::{CoreTable, RowRef, StoredColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One key of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub slug: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn asc(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            order: SortOrder::Desc,
        }
    }
}

fn to_params(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|slug| (*slug).to_string()).collect()
}

impl CoreTable {
    /// Keeps only `slugs`, in the given order.
    pub fn select_columns(&self, slugs: &[&str]) -> Result<CoreTable> {
        let columns = slugs
            .iter()
            .map(|slug| self.stored(slug).cloned())
            .collect::<Result<Vec<_>>>()?;
        self.derive(
            TransformRecord::new("selectColumns", to_params(slugs), self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Removes `slugs`. Unknown slugs are ignored.
    pub fn drop_columns(&self, slugs: &[&str]) -> Result<CoreTable> {
        let columns = self
            .stored_columns()
            .iter()
            .filter(|column| !slugs.contains(&column.slug()))
            .cloned()
            .collect();
        self.derive(
            TransformRecord::new("dropColumns", to_params(slugs), self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Renames columns by `(from, to)` pairs.
    pub fn rename_columns(&self, renames: &[(&str, &str)]) -> Result<CoreTable> {
        for (from, _) in renames {
            self.stored(from)?;
        }
        let columns = self
            .stored_columns()
            .iter()
            .map(|column| {
                let mut column = column.clone();
                if let Some((_, to)) = renames.iter().find(|(from, _)| *from == column.slug()) {
                    column.def.slug = (*to).to_string();
                }
                column
            })
            .collect();
        let params = renames
            .iter()
            .map(|(from, to)| format!("{from}->{to}"))
            .collect();
        self.derive(
            TransformRecord::new("renameColumns", params, self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Adds a column. Its slug must be new and its length must match.
    pub fn append_column(&self, def: ColumnDef, values: Vec<CellValue>) -> Result<CoreTable> {
        if self.has_column(&def.slug) {
            return Err(GrapherError::DuplicateColumn(def.slug));
        }
        let record = TransformRecord::new("appendColumn", vec![def.slug.clone()], self.row_count());
        let mut columns = self.stored_columns().to_vec();
        columns.push(StoredColumn::new(def, values));
        self.derive(record, columns, self.row_count())
    }

    /// Replaces definitions by slug and re-parses each changed column from
    /// its CSV rendering under the new type. Error cells stay as they are.
    pub fn update_defs(&self, defs: &[ColumnDef]) -> Result<CoreTable> {
        let mut columns = self.stored_columns().to_vec();
        for def in defs {
            let column = columns
                .iter_mut()
                .find(|column| column.slug() == def.slug)
                .ok_or_else(|| GrapherError::UnknownColumn(def.slug.clone()))?;
            let old_type = column.def.resolved_type();
            let new_type = def.resolved_type();
            if old_type != new_type {
                let reparsed: Vec<CellValue> = column
                    .values
                    .iter()
                    .map(|value| match value {
                        CellValue::Error(_) => value.clone(),
                        _ => parse_cell(new_type, RawCell::Text(&format_for_csv(old_type, value))),
                    })
                    .collect();
                column.values = reparsed.into();
            }
            column.def = def.clone();
        }
        let params = defs.iter().map(|def| def.slug.clone()).collect();
        self.derive(
            TransformRecord::new("updateDefs", params, self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Rows at `indices`, in that order. Indices may repeat.
    pub fn rows_at(&self, indices: &[usize]) -> Result<CoreTable> {
        for &index in indices {
            self.check_row(index)?;
        }
        self.derive(
            TransformRecord::new("rowsAt", vec![indices.len().to_string()], indices.len()),
            self.columns_at(indices),
            indices.len(),
        )
    }

    /// Keeps rows for which `predicate` holds.
    pub fn filter<F>(&self, name: &str, predicate: F) -> Result<CoreTable>
    where
        F: Fn(&RowRef<'_>) -> bool,
    {
        let mut indices = Vec::new();
        for index in 0..self.row_count() {
            if predicate(&self.row_ref(index)?) {
                indices.push(index);
            }
        }
        self.derive(
            TransformRecord::new("filter", vec![name.to_string()], indices.len()),
            self.columns_at(&indices),
            indices.len(),
        )
    }

    /// Drops rows holding an error in any of `slugs`, or in any column when
    /// `slugs` is `None`.
    pub fn drop_rows_with_errors(&self, slugs: Option<&[&str]>) -> Result<CoreTable> {
        let checked: Vec<&StoredColumn> = match slugs {
            Some(slugs) => slugs
                .iter()
                .map(|slug| self.stored(slug))
                .collect::<Result<_>>()?,
            None => self.stored_columns().iter().collect(),
        };
        let indices: Vec<usize> = (0..self.row_count())
            .filter(|&row| checked.iter().all(|column| column.values[row].is_valid()))
            .collect();
        let params = slugs.map(to_params).unwrap_or_default();
        self.derive(
            TransformRecord::new("dropRowsWithErrors", params, indices.len()),
            self.columns_at(&indices),
            indices.len(),
        )
    }

    /// Stable multi-key sort. Error cells sort last in either direction.
    pub fn sort_by(&self, keys: &[SortKey]) -> Result<CoreTable> {
        let columns = keys
            .iter()
            .map(|key| self.stored(&key.slug).map(|column| (column, key.order)))
            .collect::<Result<Vec<_>>>()?;
        let mut indices: Vec<usize> = (0..self.row_count()).collect();
        indices.sort_by(|&a, &b| {
            columns
                .iter()
                .map(|(column, order)| compare_for_sort(&column.values[a], &column.values[b], *order))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        let params = keys
            .iter()
            .map(|key| match key.order {
                SortOrder::Asc => key.slug.clone(),
                SortOrder::Desc => format!("-{}", key.slug),
            })
            .collect();
        self.derive(
            TransformRecord::new("sortBy", params, self.row_count()),
            self.columns_at(&indices),
            self.row_count(),
        )
    }

    pub fn sort_by_slug(&self, slug: &str, order: SortOrder) -> Result<CoreTable> {
        self.sort_by(&[SortKey {
            slug: slug.to_string(),
            order,
        }])
    }
}

fn compare_for_sort(left: &CellValue, right: &CellValue, order: SortOrder) -> Ordering {
    match (left.is_error(), right.is_error(), order) {
        (false, false, SortOrder::Desc) => compare_cells(left, right).reverse(),
        _ => compare_cells(left, right),
    }
}

#[cfg(test)]
mod tests {
    use grapher_model::{ColumnTypeName, ErrorValue, TableOptions};

    use super::*;

    fn table() -> CoreTable {
        CoreTable::from_delimited(
            "entityName,year,gdp\nFrance,2001,3\nChad,2000,\nPeru,2000,5",
            &[ColumnDef::new("gdp").with_type(ColumnTypeName::Numeric)],
            TableOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_sort_keeps_errors_last() {
        let sorted = table().sort_by_slug("gdp", SortOrder::Desc).unwrap();
        let names = sorted.column("entityName").unwrap().unique_values();
        assert_eq!(names, vec!["Peru", "France", "Chad"]);
    }

    #[test]
    fn test_multi_key_sort_is_stable() {
        let sorted = table()
            .sort_by(&[SortKey::asc("year"), SortKey::asc("entityName")])
            .unwrap();
        assert_eq!(
            sorted.column("entityName").unwrap().unique_values(),
            vec!["Chad", "Peru", "France"]
        );
    }

    #[test]
    fn test_drop_rows_with_errors() {
        let cleaned = table().drop_rows_with_errors(Some(&["gdp"])).unwrap();
        assert_eq!(cleaned.row_count(), 2);
        assert!(!cleaned.column("gdp").unwrap().has_error(ErrorValue::BlankButShouldBeNumber));
    }

    #[test]
    fn test_rename_and_select() {
        let renamed = table().rename_columns(&[("gdp", "output")]).unwrap();
        let selected = renamed.select_columns(&["output", "year"]).unwrap();
        assert_eq!(selected.column_slugs(), vec!["output", "year"]);
        assert!(matches!(
            table().select_columns(&["missing"]),
            Err(GrapherError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_update_defs_reparses() {
        let updated = table()
            .update_defs(&[ColumnDef::new("year").with_type(ColumnTypeName::String)])
            .unwrap();
        assert_eq!(updated.get("year", 0).unwrap(), &CellValue::Text("2001".into()));
    }

    #[test]
    fn test_filter_by_predicate() {
        let rich = table()
            .filter("gdp>4", |row| row.get_f64("gdp").is_some_and(|gdp| gdp > 4.0))
            .unwrap();
        assert_eq!(rich.row_count(), 1);
        assert_eq!(rich.lineage().last().unwrap().params, vec!["gdp>4"]);
    }
}
