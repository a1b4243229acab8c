use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use grapher_decision::{ChoiceAvailability, DecisionRow};
use grapher_model::TransformRecord;
use grapher_table::CoreTable;

pub fn print_column_summary(table: &CoreTable) {
    println!("Rows: {}", table.row_count());
    let mut summary = Table::new();
    summary.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Valid"),
        header_cell("Errors"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Error kinds"),
    ]);
    apply_table_style(&mut summary);
    for index in 2..=5 {
        align_column(&mut summary, index, CellAlignment::Right);
    }
    for column in table.columns() {
        let kinds = column
            .error_counts()
            .into_iter()
            .map(|(kind, count)| format!("{kind} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        summary.add_row(vec![
            Cell::new(column.slug()).add_attribute(Attribute::Bold),
            Cell::new(column.column_type()),
            Cell::new(column.valid_count()),
            count_cell(column.error_count()),
            number_cell(column.min()),
            number_cell(column.max()),
            Cell::new(if kinds.is_empty() { "-".to_string() } else { kinds }),
        ]);
    }
    println!("{summary}");
}

pub fn print_lineage(lineage: &[TransformRecord]) {
    println!();
    println!("Lineage:");
    for (step, record) in lineage.iter().enumerate() {
        println!("  {}. {record}", step + 1);
    }
}

pub fn print_choices(choices: &[ChoiceAvailability]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Choice"),
        header_cell("Kind"),
        header_cell("Selected"),
        header_cell("Options"),
    ]);
    apply_table_style(&mut table);
    for choice in choices {
        let options = choice
            .options
            .iter()
            .map(|option| {
                if option.available {
                    option.value.clone()
                } else {
                    format!("({})", option.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        let name = if choice.hidden {
            dim_cell(&choice.name)
        } else {
            Cell::new(&choice.name).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            name,
            Cell::new(choice.kind),
            Cell::new(choice.selected.as_deref().unwrap_or("-")),
            Cell::new(options),
        ]);
    }
    println!("{table}");
}

pub fn print_row(row: &DecisionRow) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (name, value) in &row.fields {
        if value.trim().is_empty() {
            continue;
        }
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("Row: {}", row.index + 1);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}
