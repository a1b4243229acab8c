use grapher_model::{CellValue, ColumnTypeName, ErrorValue};

use crate::format::FormatOptions;
use crate::numeric::fallback_display;
use crate::raw::RawCell;
use crate::registry::ColumnType;

/// String-valued columns: labels, categories, entity names and codes, colors.
pub struct TextColumn {
    name: ColumnTypeName,
}

impl TextColumn {
    pub const fn new(name: ColumnTypeName) -> Self {
        Self { name }
    }
}

impl ColumnType for TextColumn {
    fn name(&self) -> ColumnTypeName {
        self.name
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match raw {
            RawCell::Null => CellValue::Error(ErrorValue::NullButShouldBeString),
            RawCell::Text(text) => CellValue::Text(text.to_string()),
            RawCell::Number(value) => CellValue::Text(value.to_string()),
            RawCell::Boolean(flag) => CellValue::Text(flag.to_string()),
        }
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        match value {
            CellValue::Number(number) => number.to_string(),
            CellValue::Integer(number) => number.to_string(),
            other => fallback_display(other),
        }
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        self.format_value(value, &FormatOptions::default())
    }
}

pub struct BooleanColumn;

impl ColumnType for BooleanColumn {
    fn name(&self) -> ColumnTypeName {
        ColumnTypeName::Boolean
    }

    fn parse(&self, raw: RawCell<'_>) -> CellValue {
        match raw {
            RawCell::Boolean(flag) => CellValue::Boolean(flag),
            RawCell::Number(value) if value == 0.0 => CellValue::Boolean(false),
            RawCell::Number(value) if value == 1.0 => CellValue::Boolean(true),
            RawCell::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => CellValue::Boolean(true),
                "false" | "no" | "0" => CellValue::Boolean(false),
                // Booleans arrive as strings in delimited input.
                _ => CellValue::Error(ErrorValue::UndefinedButShouldBeString),
            },
            RawCell::Null => CellValue::Error(ErrorValue::NullButShouldBeString),
            RawCell::Number(_) => CellValue::Error(ErrorValue::UndefinedButShouldBeString),
        }
    }

    fn format_value(&self, value: &CellValue, _options: &FormatOptions<'_>) -> String {
        fallback_display(value)
    }

    fn format_for_csv(&self, value: &CellValue) -> String {
        fallback_display(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_keeps_input_verbatim() {
        let column = TextColumn::new(ColumnTypeName::String);
        assert_eq!(column.parse(RawCell::Text(" a b ")), CellValue::Text(" a b ".into()));
        assert_eq!(
            column.parse(RawCell::Null),
            CellValue::Error(ErrorValue::NullButShouldBeString)
        );
        assert_eq!(column.parse(RawCell::Number(3.0)), CellValue::Text("3".into()));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        let column = BooleanColumn;
        assert_eq!(column.parse(RawCell::Text("Yes")), CellValue::Boolean(true));
        assert_eq!(column.parse(RawCell::Text("0")), CellValue::Boolean(false));
        assert!(column.parse(RawCell::Text("maybe")).is_error());
        assert_eq!(column.format_for_csv(&CellValue::Boolean(true)), "true");
    }
}
