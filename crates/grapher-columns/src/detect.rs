//! Column type detection from sampled values.

use grapher_model::slugs::type_for_known_slug;
use grapher_model::{ColumnTypeName, TableOptions};
use tracing::debug;

use crate::raw::RawCell;
use crate::registry::column_type;

/// Types tried in order. String is the fallback and never sampled.
pub const DETECTION_ORDER: [ColumnTypeName; 3] = [
    ColumnTypeName::Integer,
    ColumnTypeName::Numeric,
    ColumnTypeName::Date,
];

/// Per-candidate sampling result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionScore {
    pub column_type: ColumnTypeName,
    pub accepted: usize,
    pub sampled: usize,
}

impl DetectionScore {
    pub fn rate(&self) -> f64 {
        if self.sampled == 0 {
            0.0
        } else {
            self.accepted as f64 / self.sampled as f64
        }
    }
}

/// Picks a type for an undefined column.
///
/// Samples up to `options.sample_size` non-empty cells and returns the first
/// candidate whose acceptance rate is strictly above the threshold. Integer
/// only wins when it accepts every sample Numeric accepts, so one fractional
/// value keeps the column numeric. Columns with no non-empty cells are
/// strings.
pub fn detect_column_type<'a, I>(values: I, options: &TableOptions) -> ColumnTypeName
where
    I: IntoIterator<Item = RawCell<'a>>,
{
    let samples: Vec<RawCell<'a>> = values
        .into_iter()
        .filter(|raw| !raw.is_empty())
        .take(options.sample_size.max(1))
        .collect();
    if samples.is_empty() {
        return ColumnTypeName::String;
    }

    let scores: Vec<DetectionScore> = DETECTION_ORDER
        .iter()
        .map(|&candidate| {
            let implementation = column_type(candidate);
            DetectionScore {
                column_type: candidate,
                accepted: samples.iter().filter(|raw| implementation.accepts(**raw)).count(),
                sampled: samples.len(),
            }
        })
        .collect();

    let numeric_accepted = scores
        .iter()
        .find(|score| score.column_type == ColumnTypeName::Numeric)
        .map_or(0, |score| score.accepted);

    let detected = scores
        .iter()
        .find(|score| {
            score.rate() > options.detection_threshold
                && (score.column_type != ColumnTypeName::Integer
                    || score.accepted >= numeric_accepted)
        })
        .map_or(ColumnTypeName::String, |score| score.column_type);

    debug!(
        detected = %detected,
        sampled = samples.len(),
        ?scores,
        "column type detected"
    );
    detected
}

/// Known slugs are typed by name; everything else is sampled.
pub fn detect_for_slug<'a, I>(slug: &str, values: I, options: &TableOptions) -> ColumnTypeName
where
    I: IntoIterator<Item = RawCell<'a>>,
{
    match type_for_known_slug(slug) {
        Some(known) => known,
        None => detect_column_type(values, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(values: &[&str]) -> ColumnTypeName {
        detect_column_type(values.iter().map(|value| RawCell::Text(value)), &TableOptions::default())
    }

    #[test]
    fn whole_numbers_are_integers() {
        assert_eq!(detect(&["1", "2", "", "30"]), ColumnTypeName::Integer);
    }

    #[test]
    fn one_fraction_makes_the_column_numeric() {
        assert_eq!(detect(&["1", "2", "2.5"]), ColumnTypeName::Numeric);
    }

    #[test]
    fn iso_dates_are_detected() {
        assert_eq!(detect(&["2020-01-01", "2020-02-01"]), ColumnTypeName::Date);
    }

    #[test]
    fn majority_must_be_strict() {
        assert_eq!(detect(&["1", "a"]), ColumnTypeName::String);
        assert_eq!(detect(&["1", "2", "a"]), ColumnTypeName::Integer);
    }

    #[test]
    fn empty_columns_are_strings() {
        assert_eq!(detect(&["", "  "]), ColumnTypeName::String);
    }

    #[test]
    fn known_slugs_skip_sampling() {
        let options = TableOptions::default();
        assert_eq!(
            detect_for_slug("year", [RawCell::Text("abc")], &options),
            ColumnTypeName::Year
        );
        assert_eq!(
            detect_for_slug("gdp", [RawCell::Text("1.5")], &options),
            ColumnTypeName::Numeric
        );
    }
}
