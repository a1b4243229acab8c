//! Time coordinate types. Every variant stores an integer ordinal so that
//! interpolation and sorting can treat time uniformly.

use chrono::{NaiveDate, TimeDelta};
use grapher_model::{CellValue, ColumnTypeName, ErrorValue};

use crate::format::{FormatOptions, format_number};
use crate::numeric::{fallback_display, parse_number};
use crate::raw::RawCell;
use crate::registry::ColumnType;

const ISO_DATE: &str = "%Y-%m-%d";

/// Day offsets count from this date.
pub fn zero_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 21).unwrap_or_default()
}

/// Day offset of `date` relative to [`zero_day`].
pub fn day_offset(date: NaiveDate) -> i64 {
    date.signed_duration_since(zero_day()).num_days()
}

/// Inverse of [`day_offset`]. `None` when the date is outside chrono's range.
pub fn date_for_offset(offset: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(offset).and_then(|delta| zero_day().checked_add_signed(delta))
}

/// Ordinal of `(year, quarter)`. `None` for a quarter outside 1..=4 or a
/// year whose ordinal does not fit in an `i64`.
pub fn encode_quarter(year: i64, quarter: u8) -> Option<i64> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    year.checked_mul(4)?.checked_add(i64::from(quarter) - 1)
}

/// Splits an ordinal back into `(year, quarter)`.
pub fn decode_quarter(ordinal: i64) -> (i64, u8) {
    // rem_euclid(4) is always in 0..4
    (ordinal.div_euclid(4), ordinal.rem_euclid(4) as u8 + 1)
}

/// Accepts the data form `2020-Q3` and the display form `Q3/2020`.
pub fn parse_quarter(text: &str) -> Option<i64> {
    let text = text.trim();
    let (year, quarter) = match text.strip_prefix('Q') {
        Some(rest) => {
            let (quarter, year) = rest.split_once('/')?;
            (year, quarter)
        }
        None => text.rsplit_once("-Q")?,
    };
    let year: i64 = year.trim().parse().ok()?;
    let quarter: u8 = quarter.trim().parse().ok()?;
    encode_quarter(year, quarter)
}

pub fn format_quarter(ordinal: i64) -> String {
    let (year, quarter) = decode_quarter(ordinal);
    format!("Q{quarter}/{year}")
}

pub struct YearColumn;

impl ColumnType for YearColumn {
    fn name(&self) -> ColumnTypeName {
        ColumnTypeName::Year
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match parse_number(raw) {
            Ok(value) => CellValue::Integer(value.round() as i64),
            Err(err) => CellValue::Error(err),
        }
    }

    fn accepts(&self, raw: RawCell<'_>) -> bool {
        parse_number(raw).is_ok_and(|value| value.fract() == 0.0)
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        match value.as_i64() {
            Some(year) if year < 0 => format!("{} BCE", year.unsigned_abs()),
            Some(year) => year.to_string(),
            None => fallback_display(value),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        match value.as_i64() {
            Some(year) => year.to_string(),
            None => fallback_display(value),
        }
    }
}

/// `Day` stores offsets directly; `Date` reads ISO dates into the same
/// offsets. Both accept either form and display ISO dates.
pub struct DayColumn {
    name: ColumnTypeName,
}

impl DayColumn {
    pub const fn new(name: ColumnTypeName) -> Self {
        Self { name }
    }
}

impl ColumnType for DayColumn {
    fn name(&self) -> ColumnTypeName {
        self.name
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        if let RawCell::Text(text) = raw {
            if let Ok(date) = NaiveDate::parse_from_str(text.trim(), ISO_DATE) {
                return CellValue::Integer(day_offset(date));
            }
        }
        match parse_number(raw) {
            Ok(value) => CellValue::Integer(value.trunc() as i64),
            Err(err) => CellValue::Error(err),
        }
    }

    fn accepts(&self, raw: RawCell<'_>) -> bool {
        match (self.name, raw) {
            (ColumnTypeName::Date, RawCell::Text(text)) => {
                NaiveDate::parse_from_str(text.trim(), ISO_DATE).is_ok()
            }
            (ColumnTypeName::Date, _) => false,
            _ => self.parse(raw).is_valid(),
        }
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        match value.as_i64() {
            Some(offset) => date_for_offset(offset)
                .map(|date| date.format(ISO_DATE).to_string())
                .unwrap_or_else(|| format_number(offset as f64, 0, false)),
            None => fallback_display(value),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        self.format_value(value, &FormatOptions::default())
    }
}

pub struct QuarterColumn;

impl ColumnType for QuarterColumn {
    fn name(&self) -> ColumnTypeName {
        ColumnTypeName::Quarter
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match raw {
            RawCell::Text(text) if text.trim().is_empty() => {
                CellValue::Error(ErrorValue::BlankButShouldBeNumber)
            }
            RawCell::Text(text) => match parse_quarter(text) {
                Some(ordinal) => CellValue::Integer(ordinal),
                None => match text.trim().parse::<i64>() {
                    // already an ordinal
                    Ok(ordinal) => CellValue::Integer(ordinal),
                    Err(_) => CellValue::Error(ErrorValue::InvalidQuarterValue),
                },
            },
            RawCell::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                CellValue::Integer(value as i64)
            }
            RawCell::Null => CellValue::Error(ErrorValue::NullButShouldBeNumber),
            RawCell::Number(_) | RawCell::Boolean(_) => {
                CellValue::Error(ErrorValue::InvalidQuarterValue)
            }
        }
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        match value.as_i64() {
            Some(ordinal) => format_quarter(ordinal),
            None => fallback_display(value),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        match value.as_i64() {
            Some(ordinal) => {
                let (year, quarter) = decode_quarter(ordinal);
                format!("{year}-Q{quarter}")
            }
            None => fallback_display(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_years_render_as_bce() {
        let options = FormatOptions::default();
        assert_eq!(YearColumn.format_value(&CellValue::Integer(-500), &options), "500 BCE");
        assert_eq!(YearColumn.format_value(&CellValue::Integer(1990), &options), "1990");
        assert_eq!(YearColumn.format_for_csv(&CellValue::Integer(-500)), "-500");
    }

    #[test]
    fn day_offsets_count_from_zero_day() {
        let day = DayColumn::new(ColumnTypeName::Day);
        assert_eq!(day.parse(RawCell::Text("2020-01-21")), CellValue::Integer(0));
        assert_eq!(day.parse(RawCell::Text("2020-01-31")), CellValue::Integer(10));
        assert_eq!(day.parse(RawCell::Text("-3")), CellValue::Integer(-3));
        assert_eq!(
            day.format_value(&CellValue::Integer(10), &FormatOptions::default()),
            "2020-01-31"
        );
    }

    #[test]
    fn date_detection_needs_iso_text() {
        let date = DayColumn::new(ColumnTypeName::Date);
        assert!(date.accepts(RawCell::Text("2021-03-04")));
        assert!(!date.accepts(RawCell::Text("42")));
        assert!(!date.accepts(RawCell::Number(42.0)));
    }

    #[test]
    fn quarter_accepts_both_spellings() {
        assert_eq!(parse_quarter("2020-Q3"), Some(8082));
        assert_eq!(parse_quarter("Q3/2020"), Some(8082));
        assert_eq!(parse_quarter("-1-Q3"), Some(-2));
        assert_eq!(parse_quarter("Q3/-1"), Some(-2));
        assert_eq!(parse_quarter("2020-Q"), None);
        assert_eq!(parse_quarter("9223372036854775807-Q1"), None);
        assert_eq!(parse_quarter("Q4/-2305843009213693953"), None);
    }

    #[test]
    fn encode_quarter_checks_range() {
        assert_eq!(encode_quarter(2020, 3), Some(8082));
        assert_eq!(encode_quarter(2020, 0), None);
        assert_eq!(encode_quarter(i64::MAX / 4, 4), Some(i64::MAX / 4 * 4 + 3));
        assert_eq!(encode_quarter(i64::MAX / 4 + 1, 1), None);
    }
}
