//! Reshaping raw rows into observations.
//!
//! Emission order is row order, then column order within a wide row.
//! Any malformed cell fails the whole load; nothing is skipped here.

use std::path::Path;

use chrono::NaiveTime;
use station_model::{ColumnOptions, Observation};
use station_transform::DatetimeNormalizer;
use tracing::debug;

use crate::csv_table::{CsvTable, RawRow};
use crate::error::{LoadError, Result};
use crate::layout::{SourceLayout, WideColumn};

/// Observations read from one source, plus what was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSource {
    pub layout: SourceLayout,
    pub rows: usize,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone)]
pub struct RecordLoader {
    normalizer: DatetimeNormalizer,
    columns: ColumnOptions,
}

impl RecordLoader {
    pub fn new(normalizer: DatetimeNormalizer, columns: ColumnOptions) -> Self {
        Self {
            normalizer,
            columns,
        }
    }

    pub fn load_path(&self, path: &Path) -> Result<LoadedSource> {
        let table = CsvTable::from_path(path, self.columns.delimiter)?;
        self.load_table(&table)
    }

    pub fn load_table(&self, table: &CsvTable) -> Result<LoadedSource> {
        let date = table.require_column(&self.columns.date_column)?;
        let layout = SourceLayout::detect(table, &self.columns)?;
        debug!(
            layout = layout.name(),
            value_columns = layout.value_columns(),
            rows = table.rows.len(),
            "source layout detected"
        );

        let observations = match &layout {
            SourceLayout::Narrow { value } => load_narrow(table, date, *value, &self.normalizer)?,
            SourceLayout::Wide(columns) => load_wide(table, date, columns, &self.normalizer)?,
        };

        Ok(LoadedSource {
            layout,
            rows: table.rows.len(),
            observations,
        })
    }
}

fn load_narrow(
    table: &CsvTable,
    date: usize,
    value: usize,
    normalizer: &DatetimeNormalizer,
) -> Result<Vec<Observation>> {
    let date_column = table.header(date);
    let value_column = table.header(value);
    table
        .rows
        .iter()
        .map(|row| {
            let wall_clock = normalizer
                .parse_wall_clock(row.cell(date))
                .map_err(|source| LoadError::InvalidTimestamp {
                    line: row.line,
                    column: date_column.to_string(),
                    source,
                })?;
            let value = parse_value(row, value, value_column)?;
            Ok(Observation::recorded(
                normalizer.localize(wall_clock),
                wall_clock,
                value,
            ))
        })
        .collect()
}

fn load_wide(
    table: &CsvTable,
    date: usize,
    columns: &[WideColumn],
    normalizer: &DatetimeNormalizer,
) -> Result<Vec<Observation>> {
    let date_column = table.header(date);
    let mut observations = Vec::with_capacity(table.rows.len() * columns.len());
    for row in &table.rows {
        let day = normalizer
            .parse_date(row.cell(date))
            .map_err(|source| LoadError::InvalidTimestamp {
                line: row.line,
                column: date_column.to_string(),
                source,
            })?;
        let midnight = day.and_time(NaiveTime::MIN);
        for column in columns {
            let value = parse_value(row, column.index, &column.name)?;
            let wall_clock = midnight + column.offset();
            observations.push(Observation::recorded(
                normalizer.localize(wall_clock),
                wall_clock,
                value,
            ));
        }
    }
    Ok(observations)
}

/// Values must be present, numeric and finite.
fn parse_value(row: &RawRow, index: usize, column: &str) -> Result<f64> {
    let raw = row.cell(index);
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            line: row.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
