use grapher_model::{CellValue, ColumnTypeName, ErrorValue};

use crate::format::{FormatOptions, format_number, with_short_unit};
use crate::raw::RawCell;
use crate::registry::ColumnType;

/// Shared numeric coercion. Blank, null and non-finite input each get their
/// own error so the reason survives into the column store.
pub(crate) fn parse_number(raw: RawCell<'_>) -> Result<f64, ErrorValue> {
    match raw {
        RawCell::Null => Err(ErrorValue::NullButShouldBeNumber),
        RawCell::Boolean(_) => Err(ErrorValue::NaNButShouldBeNumber),
        RawCell::Number(value) if value.is_finite() => Ok(value),
        RawCell::Number(_) => Err(ErrorValue::NaNButShouldBeNumber),
        RawCell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ErrorValue::BlankButShouldBeNumber);
            }
            match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(ErrorValue::NaNButShouldBeNumber),
            }
        }
    }
}

/// Renders non-numeric cells that ended up in a numeric column.
pub(crate) fn fallback_display(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) => text.clone(),
        CellValue::Boolean(flag) => flag.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn csv_number(value: &CellValue) -> String {
    match value {
        CellValue::Number(number) => number.to_string(),
        CellValue::Integer(number) => number.to_string(),
        other => fallback_display(other),
    }
}

/// Floating point measures: plain numbers, currency, the percentage family
/// and non-negative quantities.
pub struct NumericColumn {
    name: ColumnTypeName,
}

impl NumericColumn {
    pub const fn new(name: ColumnTypeName) -> Self {
        Self { name }
    }

    fn rejects_negative(&self) -> bool {
        matches!(
            self.name,
            ColumnTypeName::Population | ColumnTypeName::PopulationDensity | ColumnTypeName::Age
        )
    }
}

impl ColumnType for NumericColumn {
    fn name(&self) -> ColumnTypeName {
        self.name
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match parse_number(raw) {
            Ok(value) if value < 0.0 && self.rejects_negative() => {
                CellValue::Error(ErrorValue::InvalidNegativeValue)
            }
            Ok(value) => CellValue::Number(value),
            Err(err) => CellValue::Error(err),
        }
    }

    fn format_value(&self, value: &CellValue, options: &FormatOptions<'_>) -> String {
        let Some(number) = value.as_f64() else {
            return fallback_display(value);
        };
        let decimals = options.decimal_places();
        match self.name {
            ColumnTypeName::Percentage => format!("{}%", format_number(number, decimals, true)),
            ColumnTypeName::DecimalPercentage => {
                format!("{}%", format_number(number * 100.0, decimals, true))
            }
            ColumnTypeName::RelativePercentage | ColumnTypeName::PercentChangeOverTime => {
                let body = format_number(number, decimals, true);
                if number > 0.0 && body != "0" {
                    format!("+{body}%")
                } else {
                    format!("{body}%")
                }
            }
            ColumnTypeName::Currency => with_short_unit(
                format_number(number, decimals, true),
                Some(options.short_unit.unwrap_or("$")),
            ),
            _ => with_short_unit(format_number(number, decimals, true), options.short_unit),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        csv_number(value)
    }
}

/// Whole numbers. Fractional input is truncated toward zero.
pub struct IntegerColumn {
    name: ColumnTypeName,
}

impl IntegerColumn {
    pub const fn new(name: ColumnTypeName) -> Self {
        Self { name }
    }
}

impl ColumnType for IntegerColumn {
    fn name(&self) -> ColumnTypeName {
        self.name
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match parse_number(raw) {
            Ok(value) => CellValue::Integer(value.trunc() as i64),
            Err(err) => CellValue::Error(err),
        }
    }

    fn accepts(&self, raw: RawCell<'_>) -> bool {
        parse_number(raw).is_ok_and(|value| value.fract() == 0.0)
    }

    fn format_value(&self, value: &CellValue, options: &FormatOptions<'_>) -> String {
        match value.as_f64() {
            Some(number) => with_short_unit(format_number(number, 0, true), options.short_unit),
            None => fallback_display(value),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        csv_number(value)
    }
}

/// Mixed columns: numbers where the text is numeric, text otherwise.
pub struct NumberOrStringColumn;

impl ColumnType for NumberOrStringColumn {
    fn name(&self) -> ColumnTypeName {
        ColumnTypeName::NumberOrString
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match raw {
            RawCell::Null => CellValue::Error(ErrorValue::NullButShouldBeString),
            RawCell::Boolean(flag) => CellValue::Text(flag.to_string()),
            RawCell::Number(value) if value.is_finite() => CellValue::Number(value),
            RawCell::Number(_) => CellValue::Error(ErrorValue::NaNButShouldBeNumber),
            RawCell::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && !text.trim().is_empty() => {
                    CellValue::Number(value)
                }
                _ => CellValue::Text(text.to_string()),
            },
        }
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        match value.as_f64() {
            Some(number) => format_number(number, 2, false),
            None => fallback_display(value),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        csv_number(value)
    }
}
