use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use catalog_cli::types::{ArchiveStatus, CacheBustStatus, RunReport};
use catalog_core::CacheBustOutcome;
use catalog_model::{ChangeKind, ChangeSet, PriceDirection};

pub fn print_run_summary(report: &RunReport) {
    println!("Source: {}", report.source.path.display());
    match &report.publication {
        Some(path) => println!("Published: {}", path.display()),
        None => println!("Dry run: nothing written"),
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Result")]);
    apply_summary_table_style(&mut table);
    table.add_row(vec![
        Cell::new("Products"),
        Cell::new(report.total_products).add_attribute(Attribute::Bold),
    ]);
    match &report.changes {
        Some(changes) => {
            table.add_row(vec![
                Cell::new("New products"),
                count_cell(changes.new_product_count(), Color::Green),
            ]);
            table.add_row(vec![
                Cell::new("New variants"),
                count_cell(changes.new_variant_count(), Color::Green),
            ]);
            table.add_row(vec![
                Cell::new("Price increases"),
                count_cell(changes.price_count(PriceDirection::Up), Color::Red),
            ]);
            table.add_row(vec![
                Cell::new("Price decreases"),
                count_cell(changes.price_count(PriceDirection::Down), Color::Blue),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Changes"), dim_cell("none")]);
        }
    }
    table.add_row(vec![Cell::new("Archive"), archive_cell(&report.archive)]);
    table.add_row(vec![
        Cell::new("Cache-bust"),
        cache_bust_cell(&report.cache_bust),
    ]);
    table.add_row(vec![
        Cell::new("Timestamp"),
        Cell::new(report.timestamp.to_rfc3339()),
    ]);
    table.add_row(vec![Cell::new("SHA-256"), dim_cell(&report.digest)]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        dim_cell(format!("{} ms", report.elapsed.as_millis())),
    ]);
    println!("{table}");

    if let Some(changes) = &report.changes {
        print_changes(changes);
    }
}

pub fn print_changes(changes: &ChangeSet) {
    if !changes.new_items.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Code"),
            header_cell("Unit"),
            header_cell("Description"),
            header_cell("Price"),
            header_cell("Kind"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 3, CellAlignment::Right);
        for item in &changes.new_items {
            table.add_row(vec![
                code_cell(&item.code),
                Cell::new(&item.unit),
                Cell::new(&item.description),
                Cell::new(&item.price),
                kind_cell(item.kind),
            ]);
        }
        println!();
        println!("New items:");
        println!("{table}");
    }

    if !changes.price_changes.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Code"),
            header_cell("Unit"),
            header_cell("Description"),
            header_cell("Old"),
            header_cell("New"),
            header_cell(""),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 3, CellAlignment::Right);
        align_column(&mut table, 4, CellAlignment::Right);
        align_column(&mut table, 5, CellAlignment::Center);
        for change in &changes.price_changes {
            table.add_row(vec![
                code_cell(&change.code),
                Cell::new(&change.unit),
                Cell::new(&change.description),
                dim_cell(&change.price_old),
                Cell::new(&change.price_new).add_attribute(Attribute::Bold),
                direction_cell(change.direction),
            ]);
        }
        println!();
        println!("Price changes:");
        println!("{table}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn archive_cell(status: &ArchiveStatus) -> Cell {
    match status {
        ArchiveStatus::Archived(path) => Cell::new(format!("✓ {}", path.display())).fg(Color::Green),
        ArchiveStatus::Failed(reason) => Cell::new(format!("failed: {reason}")).fg(Color::Yellow),
        ArchiveStatus::NotRun => dim_cell("-"),
    }
}

fn cache_bust_cell(status: &CacheBustStatus) -> Cell {
    match status {
        CacheBustStatus::Done(outcome @ CacheBustOutcome::Rewritten { .. }) => {
            Cell::new(outcome).fg(Color::Green)
        }
        CacheBustStatus::Done(outcome @ (CacheBustOutcome::Missing | CacheBustOutcome::NoMarker)) => {
            Cell::new(outcome).fg(Color::Yellow)
        }
        CacheBustStatus::Done(outcome) => dim_cell(outcome),
        CacheBustStatus::Failed(reason) => Cell::new(format!("failed: {reason}")).fg(Color::Yellow),
        CacheBustStatus::NotRun => dim_cell("-"),
    }
}

fn kind_cell(kind: ChangeKind) -> Cell {
    match kind {
        ChangeKind::NewProduct => Cell::new("new product")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        ChangeKind::NewVariant => Cell::new("new variant").fg(Color::Green),
    }
}

fn direction_cell(direction: PriceDirection) -> Cell {
    match direction {
        PriceDirection::Up => Cell::new("▲").fg(Color::Red),
        PriceDirection::Down => Cell::new("▼").fg(Color::Blue),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn code_cell(code: &str) -> Cell {
    Cell::new(code)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
