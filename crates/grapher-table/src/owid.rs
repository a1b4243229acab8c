//! Entity and time aware operations.
//!
//! An OWID table is a [`CoreTable`] with an `entityName` column and a time
//! column (`day`, `year` or `time`, preferred in that order). Rows are keyed
//! by `(entity, time)`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use grapher_model::slugs::{ENTITY_NAME, TIME_SLUGS};
use grapher_model::{CellValue, ErrorValue, GrapherError, Result, TransformRecord};
use tracing::debug;

use crate::table::{CoreTable, StoredColumn};

/// `(time, row)` pairs of one entity, ordered by time. Rows with an
/// unusable time are left out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EntitySeries {
    pub(crate) rows: Vec<(i64, usize)>,
}

/// Groups rows by entity key, each group sorted by time.
pub(crate) fn series_from(entities: &[CellValue], times: &[CellValue]) -> Vec<EntitySeries> {
    let mut series: Vec<EntitySeries> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (row, (entity, time)) in entities.iter().zip(times).enumerate() {
        let Some(time) = time.as_i64() else { continue };
        let key = entity.to_key_string();
        let position = match positions.get(&key) {
            Some(&position) => position,
            None => {
                positions.insert(key, series.len());
                series.push(EntitySeries { rows: Vec::new() });
                series.len() - 1
            }
        };
        series[position].rows.push((time, row));
    }
    for entity in &mut series {
        entity.rows.sort_unstable();
    }
    series
}

impl CoreTable {
    pub fn entity_slug(&self) -> Option<&'static str> {
        self.has_column(ENTITY_NAME).then_some(ENTITY_NAME)
    }

    pub fn time_slug(&self) -> Option<&'static str> {
        TIME_SLUGS.into_iter().find(|slug| self.has_column(slug))
    }

    pub(crate) fn require_entity_slug(&self) -> Result<&'static str> {
        self.entity_slug().ok_or(GrapherError::MissingEntityColumn)
    }

    pub(crate) fn require_time_slug(&self) -> Result<&'static str> {
        self.time_slug().ok_or(GrapherError::MissingTimeColumn)
    }

    /// Distinct entity names in first-appearance order.
    pub fn entity_names(&self) -> Result<Vec<String>> {
        Ok(self.column(self.require_entity_slug()?)?.unique_values())
    }

    /// Distinct valid times, ascending.
    pub fn times(&self) -> Result<Vec<i64>> {
        let times: BTreeSet<i64> = self
            .column(self.require_time_slug()?)?
            .values()
            .iter()
            .filter_map(CellValue::as_i64)
            .collect();
        Ok(times.into_iter().collect())
    }

    /// `(entity, time)` of every row; `None` time for unusable time cells.
    pub(crate) fn entity_time_keys(&self) -> Result<Vec<(String, Option<i64>)>> {
        let entities = self.column(self.require_entity_slug()?)?.values();
        let times = self.column(self.require_time_slug()?)?.values();
        Ok(entities
            .iter()
            .zip(times)
            .map(|(entity, time)| (entity.to_key_string(), time.as_i64()))
            .collect())
    }

    /// Per-entity series in entity first-appearance order.
    pub(crate) fn entity_series(&self) -> Result<Vec<EntitySeries>> {
        let entities = self.column(self.require_entity_slug()?)?.values();
        let times = self.column(self.require_time_slug()?)?.values();
        Ok(series_from(entities, times))
    }

    pub fn filter_by_entity_names(&self, names: &[&str]) -> Result<CoreTable> {
        let entity_slug = self.require_entity_slug()?;
        let label = names.join(",");
        self.filter(&format!("entityName in [{label}]"), |row| {
            row.get(entity_slug)
                .is_some_and(|entity| names.contains(&entity.to_key_string().as_str()))
        })
    }

    /// Rows whose time lies in `start..=end`.
    pub fn filter_by_time_range(&self, start: i64, end: i64) -> Result<CoreTable> {
        let time_slug = self.require_time_slug()?;
        self.filter(&format!("{time_slug} in {start}..={end}"), |row| {
            row.get(time_slug)
                .and_then(CellValue::as_i64)
                .is_some_and(|time| (start..=end).contains(&time))
        })
    }

    /// Keeps the first row of every `(entity, time)` pair.
    pub fn dedupe_entity_time(&self) -> Result<CoreTable> {
        let mut seen = BTreeSet::new();
        let indices: Vec<usize> = self
            .entity_time_keys()?
            .into_iter()
            .enumerate()
            .filter(|(_, key)| seen.insert(key.clone()))
            .map(|(row, _)| row)
            .collect();
        let dropped = self.row_count() - indices.len();
        if dropped > 0 {
            debug!(dropped, "dropped duplicate entity/time rows");
        }
        self.derive(
            TransformRecord::new("dedupeEntityTime", Vec::new(), indices.len()),
            self.columns_at(&indices),
            indices.len(),
        )
    }

    /// Ensures every entity has a row at every time of the table.
    pub fn complete_entity_time(&self) -> Result<CoreTable> {
        self.complete_entity_time_with(&[])
    }

    /// Ensures every entity has a row at every time of the table and at
    /// every time in `extra_times`. Inserted rows hold
    /// [`ErrorValue::MissingValuePlaceholder`] outside the key columns.
    /// The result is sorted by entity (first appearance), then time.
    pub fn complete_entity_time_with(&self, extra_times: &[i64]) -> Result<CoreTable> {
        let entity_slug = self.require_entity_slug()?;
        let time_slug = self.require_time_slug()?;
        let mut all_times: BTreeSet<i64> = self.times()?.into_iter().collect();
        all_times.extend(extra_times.iter().copied());

        let existing: BTreeMap<(String, i64), usize> = self
            .entity_time_keys()?
            .into_iter()
            .enumerate()
            .filter_map(|(row, (entity, time))| time.map(|time| ((entity, time), row)))
            .rev()
            .collect();

        // Some(row) copies an existing row, None inserts a placeholder row.
        let mut plan: Vec<(String, i64, Option<usize>)> = Vec::new();
        for entity in self.entity_names()? {
            for &time in &all_times {
                let source = existing.get(&(entity.clone(), time)).copied();
                plan.push((entity.clone(), time, source));
            }
        }

        let columns = self
            .stored_columns()
            .iter()
            .map(|column| {
                let values: Vec<CellValue> = plan
                    .iter()
                    .map(|(entity, time, source)| match source {
                        Some(row) => column.values[*row].clone(),
                        None if column.slug() == entity_slug => CellValue::Text(entity.clone()),
                        None if column.slug() == time_slug => CellValue::Integer(*time),
                        None => CellValue::Error(ErrorValue::MissingValuePlaceholder),
                    })
                    .collect();
                StoredColumn::new(column.def.clone(), values)
            })
            .collect();

        let inserted = plan.iter().filter(|(_, _, source)| source.is_none()).count();
        debug!(inserted, rows = plan.len(), "completed entity/time grid");
        self.derive(
            TransformRecord::new("completeEntityTime", vec![extra_times.len().to_string()], plan.len()),
            columns,
            plan.len(),
        )
    }

    /// Adds `other`'s non-key columns, matched on `(entity, time)`.
    ///
    /// Rows of `self` with no match hold
    /// [`ErrorValue::NoMatchingValueAfterJoin`]. When `other` has several
    /// rows for a key the first one wins. `columns` restricts which of
    /// `other`'s columns are joined.
    pub fn left_join(&self, other: &CoreTable, columns: Option<&[&str]>) -> Result<CoreTable> {
        let other_entity = other.require_entity_slug()?;
        let other_time = other.require_time_slug()?;
        let mut lookup: HashMap<(String, i64), usize> = HashMap::new();
        for (row, (entity, time)) in other.entity_time_keys()?.into_iter().enumerate() {
            if let Some(time) = time {
                lookup.entry((entity, time)).or_insert(row);
            }
        }

        let joined_slugs: Vec<&str> = match columns {
            Some(slugs) => {
                for slug in slugs {
                    other.stored(slug)?;
                }
                slugs.to_vec()
            }
            None => other
                .column_slugs()
                .into_iter()
                .filter(|slug| *slug != other_entity && *slug != other_time)
                .collect(),
        };

        let matches: Vec<Option<usize>> = self
            .entity_time_keys()?
            .into_iter()
            .map(|(entity, time)| time.and_then(|time| lookup.get(&(entity, time)).copied()))
            .collect();

        let mut result = self.stored_columns().to_vec();
        for slug in &joined_slugs {
            if self.has_column(slug) {
                return Err(GrapherError::DuplicateColumn((*slug).to_string()));
            }
            let source = other.stored(slug)?;
            let values = matches
                .iter()
                .map(|matched| match matched {
                    Some(row) => source.values[*row].clone(),
                    None => CellValue::Error(ErrorValue::NoMatchingValueAfterJoin),
                })
                .collect();
            result.push(StoredColumn::new(source.def.clone(), values));
        }

        let unmatched = matches.iter().filter(|matched| matched.is_none()).count();
        debug!(unmatched, joined = joined_slugs.len(), "left join");
        let params = joined_slugs.iter().map(|slug| (*slug).to_string()).collect();
        self.derive(
            TransformRecord::new("leftJoin", params, self.row_count()),
            result,
            self.row_count(),
        )
    }
}
