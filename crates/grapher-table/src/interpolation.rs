//! Per-entity interpolation over time.

use grapher_model::slugs::original_time_slug;
use grapher_model::{
    CellValue, ColumnDef, ColumnTypeName, ErrorValue, Result, ToleranceStrategy, TransformRecord,
};
use tracing::debug;

use crate::table::{CoreTable, StoredColumn};

/// How far a tolerance fill may look on each side of the target time.
/// `None` disables that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceWindow {
    pub before: Option<i64>,
    pub after: Option<i64>,
}

impl ToleranceWindow {
    pub fn new(tolerance: i64, strategy: ToleranceStrategy) -> Self {
        let tolerance = tolerance.max(0);
        match strategy {
            ToleranceStrategy::Closest => Self {
                before: Some(tolerance),
                after: Some(tolerance),
            },
            ToleranceStrategy::Backwards => Self {
                before: Some(tolerance),
                after: None,
            },
            ToleranceStrategy::Forwards => Self {
                before: None,
                after: Some(tolerance),
            },
        }
    }

    /// Nearest known time for `target` within the window. `known` must be
    /// sorted by time. An exact tie goes to the earlier time.
    fn pick(&self, known: &[(i64, usize)], target: i64) -> Option<(i64, usize)> {
        let split = known.partition_point(|&(time, _)| time <= target);
        let earlier = self.before.and_then(|limit| {
            known[..split]
                .last()
                .filter(|(time, _)| within(target.abs_diff(*time), limit))
        });
        let later = self.after.and_then(|limit| {
            known[split..]
                .first()
                .filter(|(time, _)| within(time.abs_diff(target), limit))
        });
        match (earlier, later) {
            (Some(earlier), Some(later))
                if later.0.abs_diff(target) < target.abs_diff(earlier.0) =>
            {
                Some(*later)
            }
            (Some(earlier), _) => Some(*earlier),
            (None, later) => later.copied(),
        }
    }
}

/// A negative limit reaches nothing.
fn within(distance: u64, limit: i64) -> bool {
    u64::try_from(limit).is_ok_and(|limit| distance <= limit)
}

impl CoreTable {
    /// Fills error cells of `slug` from the nearest valid value of the same
    /// entity within the tolerance.
    ///
    /// `tolerance` falls back to the column's own tolerance, then to the
    /// table options; `strategy` falls back to the table options. Cells with
    /// no value in reach hold [`ErrorValue::NoValueWithinTolerance`]. The
    /// result gains a `<slug>-originalTime` column with the time each value
    /// came from.
    pub fn interpolate_with_tolerance(
        &self,
        slug: &str,
        tolerance: Option<i64>,
        strategy: Option<ToleranceStrategy>,
    ) -> Result<CoreTable> {
        let def = self.column_def(slug)?;
        let tolerance = tolerance
            .or(def.tolerance)
            .unwrap_or(self.options().tolerance);
        let strategy = strategy.unwrap_or(self.options().tolerance_strategy);
        let window = ToleranceWindow::new(tolerance, strategy);
        let params = vec![slug.to_string(), tolerance.to_string(), format!("{strategy:?}")];
        self.fill_within_window(slug, window, params)
    }

    /// Like [`CoreTable::interpolate_with_tolerance`] with separate reach
    /// into the past and into the future.
    pub fn interpolate_with_tolerance_window(
        &self,
        slug: &str,
        window: ToleranceWindow,
    ) -> Result<CoreTable> {
        let params = vec![
            slug.to_string(),
            format!("{:?}", window.before),
            format!("{:?}", window.after),
        ];
        self.fill_within_window(slug, window, params)
    }

    fn fill_within_window(
        &self,
        slug: &str,
        window: ToleranceWindow,
        params: Vec<String>,
    ) -> Result<CoreTable> {
        let source = self.stored(slug)?;
        let time_slug = self.require_time_slug()?;
        let time_def = self.column_def(time_slug)?;
        let times = &self.stored(time_slug)?.values;

        let mut values: Vec<CellValue> = source.values.to_vec();
        let mut original_times: Vec<CellValue> = times
            .iter()
            .zip(source.values.iter())
            .map(|(time, value)| match value {
                CellValue::Error(_) => CellValue::Error(ErrorValue::NoValueWithinTolerance),
                _ => time.clone(),
            })
            .collect();

        let mut filled = 0usize;
        for series in self.entity_series()? {
            let known: Vec<(i64, usize)> = series
                .rows
                .iter()
                .copied()
                .filter(|&(_, row)| source.values[row].is_valid())
                .collect();
            for &(time, row) in &series.rows {
                if source.values[row].is_valid() {
                    continue;
                }
                match window.pick(&known, time) {
                    Some((found_time, found_row)) => {
                        values[row] = source.values[found_row].clone();
                        original_times[row] = CellValue::Integer(found_time);
                        filled += 1;
                    }
                    None => values[row] = CellValue::Error(ErrorValue::NoValueWithinTolerance),
                }
            }
        }
        debug!(slug, filled, ?window, "tolerance interpolation");

        let original_def = ColumnDef::new(original_time_slug(slug))
            .with_type(time_def.resolved_type())
            .with_source_slug(slug);
        let mut columns = self.columns_with(source.def.clone(), values);
        replace_or_push(&mut columns, StoredColumn::new(original_def, original_times));
        self.derive(
            TransformRecord::new("interpolateWithTolerance", params, self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Fills error cells strictly between two valid points of the same
    /// entity by linear interpolation over time.
    ///
    /// Never extrapolates: error cells before the first or after the last
    /// valid point hold [`ErrorValue::NoValueForInterpolation`].
    pub fn interpolate_linear(&self, slug: &str) -> Result<CoreTable> {
        let source = self.stored(slug)?;
        let mut values: Vec<CellValue> = source.values.to_vec();

        for series in self.entity_series()? {
            let known: Vec<(i64, f64)> = series
                .rows
                .iter()
                .filter_map(|&(time, row)| source.values[row].as_f64().map(|value| (time, value)))
                .collect();
            for &(time, row) in &series.rows {
                if source.values[row].is_valid() {
                    continue;
                }
                let split = known.partition_point(|&(known_time, _)| known_time <= time);
                values[row] = match (split.checked_sub(1).map(|idx| known[idx]), known.get(split)) {
                    (Some((t0, v0)), Some(&(t1, v1))) if t0 < time => {
                        let elapsed = time.abs_diff(t0) as f64;
                        CellValue::Number(v0 + (v1 - v0) * elapsed / t1.abs_diff(t0) as f64)
                    }
                    _ => CellValue::Error(ErrorValue::NoValueForInterpolation),
                };
            }
        }

        let mut def = source.def.clone();
        if def.resolved_type() == ColumnTypeName::Integer {
            def.column_type = Some(ColumnTypeName::Numeric);
        }
        self.derive(
            TransformRecord::new("interpolateLinear", vec![slug.to_string()], self.row_count()),
            self.columns_with(def, values),
            self.row_count(),
        )
    }
}

fn replace_or_push(columns: &mut Vec<StoredColumn>, column: StoredColumn) {
    match columns.iter_mut().find(|existing| existing.slug() == column.slug()) {
        Some(existing) => *existing = column,
        None => columns.push(column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_prefers_earlier_on_tie() {
        let known = [(2000, 0), (2010, 1)];
        let window = ToleranceWindow::new(5, ToleranceStrategy::Closest);
        assert_eq!(window.pick(&known, 2005), Some((2000, 0)));
        assert_eq!(window.pick(&known, 2006), Some((2010, 1)));
        let narrow = ToleranceWindow::new(3, ToleranceStrategy::Closest);
        assert_eq!(narrow.pick(&known, 2005), None);
    }

    #[test]
    fn test_pick_respects_direction() {
        let known = [(2000, 0), (2010, 1)];
        let backwards = ToleranceWindow::new(8, ToleranceStrategy::Backwards);
        assert_eq!(backwards.pick(&known, 2006), Some((2000, 0)));
        let forwards = ToleranceWindow::new(8, ToleranceStrategy::Forwards);
        assert_eq!(forwards.pick(&known, 2004), Some((2010, 1)));
        assert_eq!(forwards.pick(&known, 2011), None);
    }

    #[test]
    fn test_pick_handles_extreme_times() {
        let known = [(i64::MIN, 0), (i64::MAX, 1)];
        let window = ToleranceWindow::new(i64::MAX, ToleranceStrategy::Closest);
        assert_eq!(window.pick(&known, -1), Some((i64::MIN, 0)));
        assert_eq!(window.pick(&known, 1), Some((i64::MAX, 1)));
        let narrow = ToleranceWindow::new(5, ToleranceStrategy::Closest);
        assert_eq!(narrow.pick(&known, 0), None);
        let negative = ToleranceWindow {
            before: Some(-1),
            after: None,
        };
        assert_eq!(negative.pick(&[(2000, 0)], 2000), None);
    }
}
