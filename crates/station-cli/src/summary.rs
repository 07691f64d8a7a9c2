use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use station_model::{AggregationMode, month_name};

use station_cli::types::{MonthSummary, PlotResult};

pub fn print_summary(result: &PlotResult) {
    println!("Source: {} ({} layout)", result.source.display(), result.layout);
    println!("Mode: {}", mode_label(result.mode));
    println!(
        "Rows: {}  Loaded: {}  Sentinels removed: {}",
        result.rows, result.loaded, result.sentinels_removed
    );
    match &result.artifacts {
        Some(paths) => {
            println!("Chart: {}", paths.html.display());
            if let Some(snapshot) = &paths.snapshot {
                println!("Snapshot: {}", snapshot.display());
            }
        }
        None => println!("Chart: dry run, nothing written"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Month"),
        header_cell("Observations"),
        header_cell("Buckets"),
        header_cell(mean_label(result.mode)),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in &result.months {
        table.add_row(month_row(summary, result.mode));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.observations()).add_attribute(Attribute::Bold),
        match result.total_buckets() {
            Some(total) => Cell::new(total).add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        },
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn month_row(summary: &MonthSummary, mode: AggregationMode) -> Vec<Cell> {
    let observations = if summary.observations == 0 {
        dim_cell(0)
    } else {
        Cell::new(summary.observations)
    };
    vec![
        Cell::new(month_name(summary.month)),
        observations,
        match summary.buckets {
            Some(0) => dim_cell(0),
            Some(count) => Cell::new(count),
            None => dim_cell("-"),
        },
        match summary.overall_mean {
            Some(mean) => Cell::new(format_mean(mean, mode)),
            None => dim_cell("-"),
        },
    ]
}

fn mode_label(mode: AggregationMode) -> &'static str {
    match mode {
        AggregationMode::RawSeries => "raw observations",
        AggregationMode::RateWithBand => "rain probability ±1σ",
        AggregationMode::MeanWithBand => "mean measurement ±1σ",
    }
}

fn mean_label(mode: AggregationMode) -> &'static str {
    match mode {
        AggregationMode::RateWithBand => "Rain rate",
        AggregationMode::RawSeries | AggregationMode::MeanWithBand => "Mean",
    }
}

fn format_mean(mean: f64, mode: AggregationMode) -> String {
    match mode {
        AggregationMode::RateWithBand => format!("{:.1}%", mean * 100.0),
        AggregationMode::RawSeries | AggregationMode::MeanWithBand => format!("{mean:.3}"),
    }
}

pub fn apply_table_style(table: &mut Table) {
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
