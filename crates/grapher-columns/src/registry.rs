//! The column type registry.
//!
//! Every semantic column type maps to one static [`ColumnType`]
//! implementation. Parsing is total: malformed input becomes a typed
//! [`ErrorValue`](grapher_model::ErrorValue) cell, so parsing a whole column
//! never stops at a bad row.

use grapher_model::{CellValue, ColumnDef, ColumnTypeName};

use crate::format::FormatOptions;
use crate::numeric::{IntegerColumn, NumberOrStringColumn, NumericColumn};
use crate::raw::RawCell;
use crate::text::{BooleanColumn, TextColumn};
use crate::time::{DayColumn, QuarterColumn, YearColumn};

/// Parse and format rules for one semantic column type.
pub trait ColumnType: Sync {
    fn name(&self) -> ColumnTypeName;

    /// Parses one raw cell. Never panics; bad input yields an error cell.
    fn parse(&self, raw: RawCell<'_>) -> CellValue;

    /// Whether type detection should count `raw` as evidence for this type.
    fn accepts(&self, raw: RawCell<'_>) -> bool {
        self.parse(raw).is_valid()
    }

    /// Human-facing rendering. Error cells render empty.
    fn format_value(&self, value: &CellValue, options: &FormatOptions<'_>) -> String;

    /// Lossless rendering that [`ColumnType::parse`] reads back.
    fn format_for_csv(&self, value: &CellValue) -> String;
}

static STRING: TextColumn = TextColumn::new(ColumnTypeName::String);
static CATEGORICAL: TextColumn = TextColumn::new(ColumnTypeName::Categorical);
static REGION: TextColumn = TextColumn::new(ColumnTypeName::Region);
static CONTINENT: TextColumn = TextColumn::new(ColumnTypeName::Continent);
static SERIES_ANNOTATION: TextColumn = TextColumn::new(ColumnTypeName::SeriesAnnotation);
static ENTITY_NAME: TextColumn = TextColumn::new(ColumnTypeName::EntityName);
static ENTITY_CODE: TextColumn = TextColumn::new(ColumnTypeName::EntityCode);
static COLOR: TextColumn = TextColumn::new(ColumnTypeName::Color);
static BOOLEAN: BooleanColumn = BooleanColumn;
static NUMBER_OR_STRING: NumberOrStringColumn = NumberOrStringColumn;
static NUMERIC: NumericColumn = NumericColumn::new(ColumnTypeName::Numeric);
static CURRENCY: NumericColumn = NumericColumn::new(ColumnTypeName::Currency);
static PERCENTAGE: NumericColumn = NumericColumn::new(ColumnTypeName::Percentage);
static DECIMAL_PERCENTAGE: NumericColumn = NumericColumn::new(ColumnTypeName::DecimalPercentage);
static RELATIVE_PERCENTAGE: NumericColumn =
    NumericColumn::new(ColumnTypeName::RelativePercentage);
static PERCENT_CHANGE_OVER_TIME: NumericColumn =
    NumericColumn::new(ColumnTypeName::PercentChangeOverTime);
static POPULATION: NumericColumn = NumericColumn::new(ColumnTypeName::Population);
static POPULATION_DENSITY: NumericColumn = NumericColumn::new(ColumnTypeName::PopulationDensity);
static AGE: NumericColumn = NumericColumn::new(ColumnTypeName::Age);
static RATIO: NumericColumn = NumericColumn::new(ColumnTypeName::Ratio);
static INTEGER: IntegerColumn = IntegerColumn::new(ColumnTypeName::Integer);
static ENTITY_ID: IntegerColumn = IntegerColumn::new(ColumnTypeName::EntityId);
static TIME: IntegerColumn = IntegerColumn::new(ColumnTypeName::Time);
static YEAR: YearColumn = YearColumn;
static DAY: DayColumn = DayColumn::new(ColumnTypeName::Day);
static DATE: DayColumn = DayColumn::new(ColumnTypeName::Date);
static QUARTER: QuarterColumn = QuarterColumn;

/// Looks up the implementation for a column type.
pub fn column_type(name: ColumnTypeName) -> &'static dyn ColumnType {
    match name {
        ColumnTypeName::String => &STRING,
        ColumnTypeName::Categorical => &CATEGORICAL,
        ColumnTypeName::Region => &REGION,
        ColumnTypeName::Continent => &CONTINENT,
        ColumnTypeName::SeriesAnnotation => &SERIES_ANNOTATION,
        ColumnTypeName::EntityName => &ENTITY_NAME,
        ColumnTypeName::EntityCode => &ENTITY_CODE,
        ColumnTypeName::EntityId => &ENTITY_ID,
        ColumnTypeName::Color => &COLOR,
        ColumnTypeName::Boolean => &BOOLEAN,
        ColumnTypeName::NumberOrString => &NUMBER_OR_STRING,
        ColumnTypeName::Numeric => &NUMERIC,
        ColumnTypeName::Integer => &INTEGER,
        ColumnTypeName::Currency => &CURRENCY,
        ColumnTypeName::Percentage => &PERCENTAGE,
        ColumnTypeName::DecimalPercentage => &DECIMAL_PERCENTAGE,
        ColumnTypeName::RelativePercentage => &RELATIVE_PERCENTAGE,
        ColumnTypeName::PercentChangeOverTime => &PERCENT_CHANGE_OVER_TIME,
        ColumnTypeName::Population => &POPULATION,
        ColumnTypeName::PopulationDensity => &POPULATION_DENSITY,
        ColumnTypeName::Age => &AGE,
        ColumnTypeName::Ratio => &RATIO,
        ColumnTypeName::Year => &YEAR,
        ColumnTypeName::Day => &DAY,
        ColumnTypeName::Date => &DATE,
        ColumnTypeName::Quarter => &QUARTER,
        ColumnTypeName::Time => &TIME,
    }
}

pub fn parse_cell(name: ColumnTypeName, raw: RawCell<'_>) -> CellValue {
    column_type(name).parse(raw)
}

/// Display rendering using the definition's type, unit and decimal places.
pub fn format_value(def: &ColumnDef, value: &CellValue) -> String {
    column_type(def.resolved_type()).format_value(value, &FormatOptions::from_def(def))
}

pub fn format_for_csv(name: ColumnTypeName, value: &CellValue) -> String {
    column_type(name).format_for_csv(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_registered_under_its_own_name() {
        for name in ColumnTypeName::ALL {
            assert_eq!(column_type(name).name(), name);
        }
    }

    #[test]
    fn parse_is_total_for_odd_input() {
        let odd = [
            RawCell::Null,
            RawCell::Text(""),
            RawCell::Text("  "),
            RawCell::Text("NaN"),
            RawCell::Text("inf"),
            RawCell::Text("Q9/abc"),
            RawCell::Number(f64::NAN),
            RawCell::Number(-1.5),
            RawCell::Boolean(true),
        ];
        for name in ColumnTypeName::ALL {
            for raw in odd {
                let parsed = parse_cell(name, raw);
                if let CellValue::Number(value) = parsed {
                    assert!(value.is_finite(), "{name} produced {value} from {raw:?}");
                }
            }
        }
    }
}
