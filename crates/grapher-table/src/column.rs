//! Read-only views over one column of a table.

use std::collections::{BTreeMap, HashSet};

use grapher_columns::format_value;
use grapher_model::{CellValue, ColumnDef, ColumnTypeName, ErrorValue};

/// A borrowed column: its definition and its cells.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    def: &'a ColumnDef,
    values: &'a [CellValue],
}

impl<'a> ColumnView<'a> {
    pub(crate) fn new(def: &'a ColumnDef, values: &'a [CellValue]) -> Self {
        Self { def, values }
    }

    pub fn slug(&self) -> &'a str {
        &self.def.slug
    }

    pub fn def(&self) -> &'a ColumnDef {
        self.def
    }

    pub fn column_type(&self) -> ColumnTypeName {
        self.def.resolved_type()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }

    pub fn valid_values(&self) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.values.iter().filter(|value| value.is_valid())
    }

    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    pub fn valid_count(&self) -> usize {
        self.valid_values().count()
    }

    pub fn error_count(&self) -> usize {
        self.values.len() - self.valid_count()
    }

    /// Error cells grouped by kind.
    pub fn error_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for err in self.values.iter().filter_map(CellValue::error) {
            *counts.entry(err.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_error(&self, kind: ErrorValue) -> bool {
        self.values.iter().any(|value| value.error() == Some(kind))
    }

    pub fn min(&self) -> Option<f64> {
        self.numeric_values().into_iter().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.numeric_values().into_iter().reduce(f64::max)
    }

    /// Distinct valid values as key strings, in first-appearance order.
    pub fn unique_values(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for value in self.valid_values() {
            let key = value.to_key_string();
            if seen.insert(key.clone()) {
                unique.push(key);
            }
        }
        unique
    }

    /// Cells rendered for display with this column's units and decimals.
    pub fn display_values(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| format_value(self.def, value))
            .collect()
    }
}
