//! Integration tests for table transforms.

use grapher_model::{
    CellValue, ColumnDef, ColumnTypeName, ErrorValue, TableOptions, ToleranceStrategy,
};
use grapher_table::{CoreTable, RollingAlignment, SortOrder, ToleranceWindow};
use proptest::prelude::*;

fn owid(text: &str) -> CoreTable {
    CoreTable::from_delimited(text, &[], TableOptions::default()).expect("valid table")
}

fn sparse() -> CoreTable {
    owid("entityName,year,value\nA,2000,10\nA,2010,20")
        .complete_entity_time_with(&[2005])
        .expect("grid")
}

#[test]
fn tolerance_outside_window_is_an_error() {
    let filled = sparse()
        .interpolate_with_tolerance("value", Some(3), None)
        .expect("interpolate");
    assert_eq!(
        filled.get("value", 1).expect("cell"),
        &CellValue::Error(ErrorValue::NoValueWithinTolerance)
    );
    assert_eq!(
        filled.get("value-originalTime", 1).expect("cell"),
        &CellValue::Error(ErrorValue::NoValueWithinTolerance)
    );
}

#[test]
fn tolerance_tie_prefers_earlier_time() {
    let filled = sparse()
        .interpolate_with_tolerance("value", Some(5), None)
        .expect("interpolate");
    assert_eq!(filled.get("value", 1).expect("cell"), &CellValue::Integer(10));
    assert_eq!(
        filled.get("value-originalTime", 1).expect("cell"),
        &CellValue::Integer(2000)
    );
    assert_eq!(
        filled.get("value-originalTime", 2).expect("cell"),
        &CellValue::Integer(2010)
    );
}

#[test]
fn tolerance_falls_back_to_column_definition() {
    let defs = [ColumnDef::new("value")
        .with_type(ColumnTypeName::Numeric)
        .with_tolerance(5)];
    let table = CoreTable::from_delimited(
        "entityName,year,value\nA,2000,10\nA,2005,\nA,2010,20",
        &defs,
        TableOptions::default(),
    )
    .expect("table");
    let filled = table
        .interpolate_with_tolerance("value", None, Some(ToleranceStrategy::Forwards))
        .expect("interpolate");
    assert_eq!(filled.get("value", 1).expect("cell"), &CellValue::Number(20.0));
}

#[test]
fn asymmetric_window() {
    let window = ToleranceWindow {
        before: Some(1),
        after: Some(6),
    };
    let filled = sparse()
        .interpolate_with_tolerance_window("value", window)
        .expect("interpolate");
    assert_eq!(filled.get("value", 1).expect("cell"), &CellValue::Integer(20));
}

#[test]
fn linear_interpolation_never_extrapolates() {
    let table = owid("entityName,year,value\nA,1999,\nA,2000,10\nA,2001,\nA,2002,\nA,2003,40\nA,2004,");
    let filled = table.interpolate_linear("value").expect("interpolate");
    let cells: Vec<CellValue> = filled.column("value").expect("column").values().to_vec();
    assert_eq!(
        cells,
        vec![
            CellValue::Error(ErrorValue::NoValueForInterpolation),
            CellValue::Integer(10),
            CellValue::Number(20.0),
            CellValue::Number(30.0),
            CellValue::Integer(40),
            CellValue::Error(ErrorValue::NoValueForInterpolation),
        ]
    );
}

#[test]
fn rolling_average_shrinks_at_edges_and_keeps_errors() {
    let table = owid("entityName,year,v\nA,2000,1\nA,2001,3\nA,2002,\nA,2003,5\nB,2000,10");
    let rolled = table
        .rolling_average("v", 3, RollingAlignment::Right)
        .expect("rolling");
    let cells: Vec<CellValue> = rolled.column("v").expect("column").values().to_vec();
    assert_eq!(
        cells,
        vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Error(ErrorValue::BlankButShouldBeNumber),
            CellValue::Number(4.0),
            CellValue::Number(10.0),
        ]
    );
}

#[test]
fn column_transforms_run_at_construction() {
    let defs = [
        ColumnDef::new("gdpPerCapita").with_transform("divideBy gdp population"),
        ColumnDef::new("share").with_transform("asPercentageOf gdp world"),
        ColumnDef::new("broken").with_transform("divideBy gdp missingSlug"),
        ColumnDef::new("cumulative").with_transform("runningTotal gdp"),
        ColumnDef::new("big").with_transform("where gdp isGreaterThan 50"),
    ];
    let table = CoreTable::from_delimited(
        "entityName,year,gdp,population,world\nA,2000,100,4,400\nA,2001,40,0,400",
        &defs,
        TableOptions::default(),
    )
    .expect("table");

    assert_eq!(table.get("gdpPerCapita", 0).expect("cell"), &CellValue::Number(25.0));
    assert_eq!(
        table.get("gdpPerCapita", 1).expect("cell"),
        &CellValue::Error(ErrorValue::DivideByZeroError)
    );
    assert_eq!(table.get("share", 0).expect("cell"), &CellValue::Number(25.0));
    assert_eq!(
        table.column_def("share").expect("def").resolved_type(),
        ColumnTypeName::Percentage
    );
    assert!(
        table
            .column("broken")
            .expect("column")
            .values()
            .iter()
            .all(|cell| cell == &CellValue::Error(ErrorValue::MissingValuePlaceholder))
    );
    assert_eq!(table.get("cumulative", 1).expect("cell"), &CellValue::Number(140.0));
    assert_eq!(
        table.get("big", 1).expect("cell"),
        &CellValue::Error(ErrorValue::FilteredValue)
    );
}

#[test]
fn lineage_records_each_generation() {
    let table = owid("entityName,year,v\nA,2000,1\nA,2001,2");
    let sorted = table
        .sort_by_slug("v", SortOrder::Desc)
        .and_then(|t| t.filter_by_time_range(2001, 2001))
        .expect("transforms");
    let names: Vec<&str> = sorted.lineage().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["fromMatrix", "sortBy", "filter"]);
    assert_eq!(sorted.lineage()[2].row_count, 1);
}

#[test]
fn custom_transforms_are_recorded() {
    let table = owid("entityName,year,v\nA,2000,1\nA,2001,2");
    let dropped = table
        .transform("keepLatest", vec![], |t| t.rows_at(&[1]))
        .expect("transform");
    assert_eq!(dropped.row_count(), 1);
    assert_eq!(dropped.lineage().last().map(|r| r.name.as_str()), Some("keepLatest"));
}

#[test]
fn repeated_header_slugs_are_kept_apart() {
    let table = owid("a,a\n1,2\n");
    assert_eq!(table.column_slugs(), vec!["a", "a_2"]);
    assert_eq!(table.get("a", 0).expect("cell"), &CellValue::Integer(1));
    assert_eq!(table.get("a_2", 0).expect("cell"), &CellValue::Integer(2));
}

fn table_strategy() -> impl Strategy<Value = CoreTable> {
    prop::collection::vec((0usize..4, 1990i64..2000, prop::option::of(-100i64..100)), 0..30)
        .prop_map(|rows| {
            let mut text = String::from("entityName,year,value");
            for (entity, year, value) in rows {
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                text.push_str(&format!("\nE{entity},{year},{value}"));
            }
            owid(&text)
        })
}

fn aligned(table: &CoreTable) -> bool {
    table.columns().all(|column| column.len() == table.row_count())
}

proptest! {
    #[test]
    fn every_transform_keeps_columns_aligned(table in table_strategy()) {
        let results = [
            table.sort_by_slug("value", SortOrder::Asc),
            table.dedupe_entity_time(),
            table.complete_entity_time(),
            table.interpolate_linear("value"),
            table.interpolate_with_tolerance("value", Some(2), None),
            table.rolling_average("value", 3, RollingAlignment::Center),
            table.percent_of_total_across_entities("value"),
            table.relative_change_from_start("value", 1995),
            table.drop_rows_with_errors(None),
        ];
        for result in results {
            let next = result.expect("transform succeeds");
            prop_assert!(aligned(&next));
        }
    }

    #[test]
    fn extreme_times_never_panic(
        rows in prop::collection::vec(
            (
                0usize..3,
                prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(0i64), any::<i64>()],
                prop::option::of(-100i64..100),
            ),
            1..20,
        ),
        window in prop_oneof![Just(1i64), Just(i64::MIN), Just(i64::MAX), any::<i64>()],
    ) {
        let mut text = String::from("entityName,year,value");
        for (entity, year, value) in rows {
            let value = value.map(|v| v.to_string()).unwrap_or_default();
            text.push_str(&format!("\nE{entity},{year},{value}"));
        }
        let defs = [ColumnDef::new("value").with_type(ColumnTypeName::Numeric)];
        let table = CoreTable::from_delimited(&text, &defs, TableOptions::default())
            .expect("valid table");
        let change = ColumnDef::new("change")
            .with_transform(format!("percentChange year entityName value {window}"));
        let results = [
            table.interpolate_linear("value"),
            table.interpolate_with_tolerance("value", Some(i64::MAX), None),
            table.interpolate_with_tolerance("value", Some(3), Some(ToleranceStrategy::Forwards)),
            table.add_transform_column(&change),
        ];
        for result in results {
            prop_assert!(aligned(&result.expect("transform succeeds")));
        }
    }

    #[test]
    fn transforms_leave_the_receiver_unchanged(table in table_strategy()) {
        let before = table.clone();
        let _ = table.interpolate_with_tolerance("value", Some(3), None);
        let _ = table.complete_entity_time();
        let _ = table.rolling_average("value", 2, RollingAlignment::Right);
        let _ = table.percent_of_total_across_entities("value");
        let _ = table.sort_by_slug("year", SortOrder::Desc);
        prop_assert_eq!(table, before);
    }
}
