//! Integration tests for the column type registry.

use grapher_columns::{
    RawCell, column_type, encode_quarter, format_for_csv, format_value, parse_cell,
};
use grapher_model::{CellValue, ColumnDef, ColumnTypeName, ErrorValue};
use proptest::prelude::*;

#[test]
fn quarter_cases() {
    let quarter = column_type(ColumnTypeName::Quarter);
    let q3 = quarter.parse(RawCell::Text("2020-Q3"));
    assert_eq!(q3, CellValue::Integer(8082));
    let def = ColumnDef::new("q").with_type(ColumnTypeName::Quarter);
    assert_eq!(format_value(&def, &q3), "Q3/2020");
    assert_eq!(quarter.parse(RawCell::Text("0-Q1")), CellValue::Integer(0));
    assert_eq!(quarter.parse(RawCell::Text("-1-Q3")), CellValue::Integer(-2));
    for bad in [
        "1999-Q0",
        "2018-Q5",
        "9223372036854775807-Q1",
        "-9223372036854775808-Q4",
        "Q2/4611686018427387904",
    ] {
        assert_eq!(
            quarter.parse(RawCell::Text(bad)),
            CellValue::Error(ErrorValue::InvalidQuarterValue),
            "{bad}"
        );
    }
}

#[test]
fn error_cells_render_empty_everywhere() {
    let err = CellValue::Error(ErrorValue::DivideByZeroError);
    for name in ColumnTypeName::ALL {
        let def = ColumnDef::new("x").with_type(name);
        assert_eq!(format_value(&def, &err), "", "{name}");
        assert_eq!(format_for_csv(name, &err), "", "{name}");
    }
}

#[test]
fn display_uses_definition_units() {
    let def = ColumnDef::new("gdp")
        .with_type(ColumnTypeName::Numeric)
        .with_short_unit("t");
    assert_eq!(format_value(&def, &CellValue::Number(12345.678)), "12,345.68 t");

    let mut precise = ColumnDef::new("share").with_type(ColumnTypeName::Percentage);
    precise.num_decimal_places = Some(0);
    assert_eq!(format_value(&precise, &CellValue::Number(12.6)), "13%");
}

#[test]
fn json_cells_parse_by_kind() {
    let value: serde_json::Value = serde_json::json!([1.5, "x", null, true]);
    let items = value.as_array().cloned().unwrap_or_default();
    let parsed: Vec<CellValue> = items
        .iter()
        .map(|item| parse_cell(ColumnTypeName::Numeric, RawCell::from(item)))
        .collect();
    assert_eq!(
        parsed,
        vec![
            CellValue::Number(1.5),
            CellValue::Error(ErrorValue::NaNButShouldBeNumber),
            CellValue::Error(ErrorValue::NullButShouldBeNumber),
            CellValue::Error(ErrorValue::NaNButShouldBeNumber),
        ]
    );
}

proptest! {
    #[test]
    fn quarter_round_trips_through_display(year in -5000i64..5000, quarter in 1u8..=4) {
        let ordinal = encode_quarter(year, quarter).unwrap();
        let def = ColumnDef::new("q").with_type(ColumnTypeName::Quarter);
        let shown = format_value(&def, &CellValue::Integer(ordinal));
        prop_assert_eq!(
            parse_cell(ColumnTypeName::Quarter, RawCell::Text(&shown)),
            CellValue::Integer(ordinal)
        );
        let csv = format_for_csv(ColumnTypeName::Quarter, &CellValue::Integer(ordinal));
        prop_assert_eq!(
            parse_cell(ColumnTypeName::Quarter, RawCell::Text(&csv)),
            CellValue::Integer(ordinal)
        );
    }

    #[test]
    fn csv_output_parses_back(value in -1.0e9f64..1.0e9) {
        for name in [ColumnTypeName::Numeric, ColumnTypeName::Ratio, ColumnTypeName::Currency] {
            let cell = CellValue::Number(value);
            let text = format_for_csv(name, &cell);
            prop_assert_eq!(parse_cell(name, RawCell::Text(&text)), cell.clone());
        }
    }

    #[test]
    fn day_offsets_round_trip(offset in -100_000i64..100_000) {
        let text = format_for_csv(ColumnTypeName::Day, &CellValue::Integer(offset));
        prop_assert_eq!(
            parse_cell(ColumnTypeName::Day, RawCell::Text(&text)),
            CellValue::Integer(offset)
        );
    }
}
