//! Percentage derivations.

use std::collections::HashMap;

use grapher_model::{CellValue, ColumnTypeName, ErrorValue, Result, TransformRecord};

use crate::table::{CoreTable, StoredColumn};

fn share(value: f64, total: f64) -> CellValue {
    if total == 0.0 {
        CellValue::Error(ErrorValue::DivideByZeroError)
    } else {
        CellValue::Number(value / total * 100.0)
    }
}

impl CoreTable {
    /// Replaces each of `slugs` with its share of the row total across
    /// those columns, as a percentage. Error cells are left out of the
    /// total and keep their error.
    pub fn percent_of_total_across_columns(&self, slugs: &[&str]) -> Result<CoreTable> {
        let sources = slugs
            .iter()
            .map(|slug| self.stored(slug))
            .collect::<Result<Vec<_>>>()?;
        let totals: Vec<f64> = (0..self.row_count())
            .map(|row| {
                sources
                    .iter()
                    .filter_map(|column| column.values[row].as_f64())
                    .sum()
            })
            .collect();

        let mut columns = self.stored_columns().to_vec();
        for source in sources {
            let values = source
                .values
                .iter()
                .zip(&totals)
                .map(|(value, &total)| match value.as_f64() {
                    Some(number) => share(number, total),
                    None => value.clone(),
                })
                .collect();
            let def = source.def.clone().with_type(ColumnTypeName::Percentage);
            if let Some(existing) = columns.iter_mut().find(|column| column.slug() == def.slug) {
                *existing = StoredColumn::new(def, values);
            }
        }
        let params = slugs.iter().map(|slug| (*slug).to_string()).collect();
        self.derive(
            TransformRecord::new("percentOfTotalAcrossColumns", params, self.row_count()),
            columns,
            self.row_count(),
        )
    }

    /// Replaces `slug` with each entity's share of the total over all
    /// entities at the same time, as a percentage.
    pub fn percent_of_total_across_entities(&self, slug: &str) -> Result<CoreTable> {
        let source = self.stored(slug)?;
        let time_slug = self.require_time_slug()?;
        let times: Vec<Option<i64>> = self
            .stored(time_slug)?
            .values
            .iter()
            .map(CellValue::as_i64)
            .collect();

        let mut totals: HashMap<i64, f64> = HashMap::new();
        for (time, value) in times.iter().zip(source.values.iter()) {
            if let (Some(time), Some(number)) = (time, value.as_f64()) {
                *totals.entry(*time).or_insert(0.0) += number;
            }
        }

        let values = times
            .iter()
            .zip(source.values.iter())
            .map(|(time, value)| match (time, value.as_f64()) {
                (Some(time), Some(number)) => share(number, totals.get(time).copied().unwrap_or(0.0)),
                _ => value.clone(),
            })
            .collect();
        let def = source.def.clone().with_type(ColumnTypeName::Percentage);
        self.derive(
            TransformRecord::new("percentOfTotalAcrossEntities", vec![slug.to_string()], self.row_count()),
            self.columns_with(def, values),
            self.row_count(),
        )
    }

    /// Replaces `slug` with its percentage change from each entity's first
    /// valid value at or after `start_time`.
    ///
    /// Entities without such a value hold
    /// [`ErrorValue::NoValueToCompareAgainst`]; a zero base yields
    /// [`ErrorValue::DivideByZeroError`].
    pub fn relative_change_from_start(&self, slug: &str, start_time: i64) -> Result<CoreTable> {
        let source = self.stored(slug)?;
        let mut values = source.values.to_vec();
        for series in self.entity_series()? {
            let base = series
                .rows
                .iter()
                .filter(|&&(time, _)| time >= start_time)
                .find_map(|&(_, row)| source.values[row].as_f64());
            for &(_, row) in &series.rows {
                let Some(number) = source.values[row].as_f64() else {
                    continue;
                };
                values[row] = match base {
                    None => CellValue::Error(ErrorValue::NoValueToCompareAgainst),
                    Some(base) if base == 0.0 => CellValue::Error(ErrorValue::DivideByZeroError),
                    Some(base) => CellValue::Number((number - base) / base * 100.0),
                };
            }
        }
        let def = source.def.clone().with_type(ColumnTypeName::RelativePercentage);
        self.derive(
            TransformRecord::new(
                "relativeChangeFromStart",
                vec![slug.to_string(), start_time.to_string()],
                self.row_count(),
            ),
            self.columns_with(def, values),
            self.row_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use grapher_model::TableOptions;

    use super::*;

    fn table(text: &str) -> CoreTable {
        CoreTable::from_delimited(text, &[], TableOptions::default()).unwrap()
    }

    #[test]
    fn test_across_columns() {
        let shares = table("coal,gas\n1,3\n0,0")
            .percent_of_total_across_columns(&["coal", "gas"])
            .unwrap();
        assert_eq!(shares.get("coal", 0).unwrap(), &CellValue::Number(25.0));
        assert_eq!(
            shares.get("gas", 1).unwrap(),
            &CellValue::Error(ErrorValue::DivideByZeroError)
        );
        assert_eq!(shares.column_def("gas").unwrap().resolved_type(), ColumnTypeName::Percentage);
    }

    #[test]
    fn test_across_entities() {
        let shares = table("entityName,year,v\nA,2000,1\nB,2000,3\nA,2001,2")
            .percent_of_total_across_entities("v")
            .unwrap();
        assert_eq!(shares.get("v", 1).unwrap(), &CellValue::Number(75.0));
        assert_eq!(shares.get("v", 2).unwrap(), &CellValue::Number(100.0));
    }

    #[test]
    fn test_relative_change() {
        let change = table("entityName,year,v\nA,2000,2\nA,2001,3\nB,2000,0\nB,2001,1\nC,1990,5")
            .relative_change_from_start("v", 2000)
            .unwrap();
        assert_eq!(change.get("v", 1).unwrap(), &CellValue::Number(50.0));
        assert_eq!(
            change.get("v", 3).unwrap(),
            &CellValue::Error(ErrorValue::DivideByZeroError)
        );
        assert_eq!(
            change.get("v", 4).unwrap(),
            &CellValue::Error(ErrorValue::NoValueToCompareAgainst)
        );
    }
}
