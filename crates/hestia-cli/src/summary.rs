use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hestia_cli::types::{CompareResult, ConvertResult};

pub fn print_convert_summary(result: &ConvertResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Columns"),
        header_cell("Records"),
        header_cell("Dropped"),
    ]);
    apply_table_style(&mut table, 100);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for group in &result.groups {
        table.add_row(vec![
            Cell::new(&group.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(group.columns),
            Cell::new(group.records),
            count_cell(group.dropped_rows, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("OUTPUT")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.columns).add_attribute(Attribute::Bold),
        Cell::new(result.output_rows).add_attribute(Attribute::Bold),
        dim_cell(format!("{} in", result.input_rows)),
    ]);
    println!("{table}");
}

pub fn print_compare_summary(result: &CompareResult) {
    let comparison = &result.comparison;
    println!("Actual: {}", result.actual.display());
    println!("Expected: {}", result.expected.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Actual"),
        header_cell("Expected"),
    ]);
    apply_table_style(&mut table, 100);
    table.add_row(vec![
        status_cell("Rows", comparison.rows_match()),
        Cell::new(comparison.actual_rows),
        Cell::new(comparison.expected_rows),
    ]);
    table.add_row(vec![
        status_cell("Columns", comparison.columns_match()),
        Cell::new(comparison.actual_columns.len()),
        Cell::new(comparison.expected_columns.len()),
    ]);
    println!("{table}");

    let unexpected = comparison.unexpected_columns();
    if !unexpected.is_empty() {
        println!("Unexpected columns: {}", unexpected.join(", "));
    }
    let missing = comparison.missing_columns();
    if !missing.is_empty() {
        println!("Missing columns: {}", missing.join(", "));
    }
    if comparison.is_equal() {
        println!("Result: EQUAL");
        return;
    }
    if comparison.mismatches.is_empty() {
        println!("Result: DIFFERENT");
        return;
    }

    let mut cells = Table::new();
    cells.set_header(vec![
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Actual"),
        header_cell("Expected"),
    ]);
    apply_table_style(&mut cells, 160);
    align_column(&mut cells, 0, CellAlignment::Right);
    for mismatch in &comparison.mismatches {
        cells.add_row(vec![
            Cell::new(mismatch.row),
            Cell::new(&mismatch.column),
            Cell::new(&mismatch.actual).fg(Color::Red),
            Cell::new(&mismatch.expected).fg(Color::Green),
        ]);
    }
    println!();
    println!("Mismatched cells:");
    println!("{cells}");
    let hidden = comparison.mismatch_count - comparison.mismatches.len();
    if hidden > 0 {
        println!("... and {hidden} more");
    }
    println!("Result: DIFFERENT");
}

fn apply_table_style(table: &mut Table, width: u16) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
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

fn status_cell(label: &str, ok: bool) -> Cell {
    if ok {
        Cell::new(label).fg(Color::Green)
    } else {
        Cell::new(label).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
