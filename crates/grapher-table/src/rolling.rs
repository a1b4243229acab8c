//! Rolling averages per entity.

use grapher_model::{CellValue, ColumnTypeName, Result, TransformRecord};
use serde::{Deserialize, Serialize};

use crate::owid::EntitySeries;
use crate::table::CoreTable;

/// Where the window sits relative to the point being averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingAlignment {
    /// The point and the `window - 1` points before it.
    #[default]
    Right,
    /// The point in the middle; an even window leans one point into the past.
    Center,
}

impl RollingAlignment {
    /// Inclusive `(start, end)` positions of the window around `position`
    /// in a series of `len` points, clipped to the series.
    fn bounds(self, position: usize, window: usize, len: usize) -> (usize, usize) {
        let window = window.max(1);
        let (back, ahead) = match self {
            RollingAlignment::Right => (window - 1, 0),
            RollingAlignment::Center => (window / 2, (window - 1) / 2),
        };
        (
            position.saturating_sub(back),
            (position + ahead).min(len.saturating_sub(1)),
        )
    }
}

/// Averages over the last `window` time-ordered points of each series.
///
/// Windows shrink at series edges. Error cells are skipped when averaging
/// and keep their own error. Rows outside every series are left unchanged.
pub(crate) fn rolling_values(
    values: &[CellValue],
    series: &[EntitySeries],
    window: usize,
    alignment: RollingAlignment,
) -> Vec<CellValue> {
    let mut out = values.to_vec();
    for entity in series {
        let rows: Vec<usize> = entity.rows.iter().map(|&(_, row)| row).collect();
        for (position, &row) in rows.iter().enumerate() {
            if values[row].is_error() {
                continue;
            }
            let (start, end) = alignment.bounds(position, window, rows.len());
            let in_window: Vec<f64> = rows[start..=end]
                .iter()
                .filter_map(|&other| values[other].as_f64())
                .collect();
            if !in_window.is_empty() {
                out[row] = CellValue::Number(in_window.iter().sum::<f64>() / in_window.len() as f64);
            }
        }
    }
    out
}

impl CoreTable {
    /// Replaces `slug` with its rolling average over `window` points per
    /// entity.
    pub fn rolling_average(
        &self,
        slug: &str,
        window: usize,
        alignment: RollingAlignment,
    ) -> Result<CoreTable> {
        let source = self.stored(slug)?;
        let values = rolling_values(&source.values, &self.entity_series()?, window, alignment);
        let mut def = source.def.clone();
        if def.resolved_type() == ColumnTypeName::Integer {
            def.column_type = Some(ColumnTypeName::Numeric);
        }
        let params = vec![slug.to_string(), window.to_string(), format!("{alignment:?}")];
        self.derive(
            TransformRecord::new("rollingAverage", params, self.row_count()),
            self.columns_with(def, values),
            self.row_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_shrink_at_edges() {
        assert_eq!(RollingAlignment::Right.bounds(0, 3, 5), (0, 0));
        assert_eq!(RollingAlignment::Right.bounds(4, 3, 5), (2, 4));
        assert_eq!(RollingAlignment::Center.bounds(0, 3, 5), (0, 1));
        assert_eq!(RollingAlignment::Center.bounds(4, 3, 5), (3, 4));
        assert_eq!(RollingAlignment::Center.bounds(2, 4, 5), (0, 3));
    }
}
