//! Source layout detection.
//!
//! Narrow exports carry one timestamp and one value per row. Wide exports
//! carry a date plus one value column per time window, each named with an
//! embedded `HHMM` token (`0015Val`, `0030Val`, ...). A source is wide when
//! any header contains the value marker.

use chrono::TimeDelta;
use station_model::ColumnOptions;

use crate::csv_table::CsvTable;
use crate::error::{LoadError, Result};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A per-window value column of a wide export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideColumn {
    pub index: usize,
    pub name: String,
    /// Minutes after midnight, `0..=1440`. `2400` is the end of the day.
    pub minutes: u32,
}

impl WideColumn {
    /// Offset from the row's midnight.
    pub fn offset(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLayout {
    /// One value column; the date column holds the full timestamp.
    Narrow { value: usize },
    /// Value columns in header order.
    Wide(Vec<WideColumn>),
}

impl SourceLayout {
    pub fn detect(table: &CsvTable, columns: &ColumnOptions) -> Result<Self> {
        let marked: Vec<(usize, &String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.contains(columns.value_marker.as_str()))
            .collect();

        if marked.is_empty() {
            let value = table.require_column(&columns.value_column)?;
            return Ok(Self::Narrow { value });
        }

        marked
            .into_iter()
            .map(|(index, name)| {
                let minutes = time_token_minutes(name).ok_or_else(|| LoadError::InvalidTimeToken {
                    column: name.clone(),
                })?;
                Ok(WideColumn {
                    index,
                    name: name.clone(),
                    minutes,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::Wide)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Narrow { .. } => "narrow",
            Self::Wide(_) => "wide",
        }
    }

    /// Number of value columns read per row.
    pub fn value_columns(&self) -> usize {
        match self {
            Self::Narrow { .. } => 1,
            Self::Wide(columns) => columns.len(),
        }
    }
}

/// First run of exactly four digits in `name`, read as `HHMM`.
fn time_token_minutes(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|byte| !byte.is_ascii_digit())
            .map_or(bytes.len(), |offset| start + offset);
        if end - start == 4 {
            return parse_hhmm(&name[start..end]);
        }
        start = end;
    }
    None
}

fn parse_hhmm(token: &str) -> Option<u32> {
    let hours: u32 = token.get(..2)?.parse().ok()?;
    let minutes: u32 = token.get(2..)?.parse().ok()?;
    let total = hours * 60 + minutes;
    (minutes < 60 && total <= MINUTES_PER_DAY).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn narrow_when_no_marker() {
        let layout = SourceLayout::detect(&table(&["STATION", "DATE", "QPCP"]), &ColumnOptions::default())
            .unwrap();
        assert_eq!(layout, SourceLayout::Narrow { value: 2 });
    }

    #[test]
    fn narrow_requires_value_column() {
        let err = SourceLayout::detect(&table(&["DATE", "PRCP"]), &ColumnOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column } if column == "QPCP"));
    }

    #[test]
    fn wide_columns_carry_their_time() {
        let layout = SourceLayout::detect(
            &table(&["DATE", "0000Val", "0000Flag", "0015Val", "2400Val"]),
            &ColumnOptions::default(),
        )
        .unwrap();
        let SourceLayout::Wide(columns) = layout else {
            panic!("expected wide layout");
        };
        let found: Vec<(usize, u32)> = columns.iter().map(|c| (c.index, c.minutes)).collect();
        assert_eq!(found, vec![(1, 0), (3, 15), (4, 1440)]);
    }

    #[test]
    fn marker_without_token_is_rejected() {
        let err = SourceLayout::detect(&table(&["DATE", "Val"]), &ColumnOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTimeToken { .. }));
        assert_eq!(time_token_minutes("2461Val"), None);
        assert_eq!(time_token_minutes("HR12345Val"), None);
        assert_eq!(time_token_minutes("Val_1330"), Some(13 * 60 + 30));
    }
}
