use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{LoadError, Result};

/// One data line of the source, cells aligned to the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Physical line numbers for record offsets.
///
/// The csv reader reports where it started scanning for a record, which is
/// before any empty lines it skipped, and its own line count ignores those
/// lines. Offsets are resolved against the raw bytes instead.
struct LineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    /// 1-based line of the first content byte at or after `byte`.
    /// Offsets must not decrease between calls.
    fn line_at(&mut self, byte: u64) -> u64 {
        let mut start = usize::try_from(byte)
            .unwrap_or(self.bytes.len())
            .min(self.bytes.len());
        while self
            .bytes
            .get(start)
            .is_some_and(|&b| matches!(b, b'\n' | b'\r'))
        {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.bytes[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line
    }
}

impl CsvTable {
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|source| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, delimiter)
    }

    /// The first non-blank line is the header. Blank lines are skipped and
    /// short rows are padded with empty cells.
    pub fn from_reader<R: Read>(mut reader: R, delimiter: u8) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(csv::Error::from)?;
        let mut lines = LineCounter::new(&bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(bytes.as_slice());

        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            let line = record
                .position()
                .map_or(0, |position| lines.line_at(position.byte()));
            match &headers {
                None => headers = Some(record.iter().map(normalize_header).collect()),
                Some(headers) => {
                    let cells = (0..headers.len())
                        .map(|idx| normalize_cell(record.get(idx).unwrap_or("")))
                        .collect();
                    rows.push(RawRow { line, cells });
                }
            }
        }

        let headers = headers.ok_or(LoadError::EmptySource)?;
        Ok(Self { headers, rows })
    }

    /// Exact match first, then case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|header| header.eq_ignore_ascii_case(name))
            })
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn header(&self, index: usize) -> &str {
        self.headers.get(index).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_normalized_and_rows_padded() {
        let source = "\u{feff}STATION ,  DATE,QPCP\n\nX,20100101 00:15\n";
        let table = CsvTable::from_reader(source.as_bytes(), b',').unwrap();
        assert_eq!(table.headers, vec!["STATION", "DATE", "QPCP"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].line, 3);
        assert_eq!(table.rows[0].cell(2), "");
        assert_eq!(table.column_index("qpcp"), Some(2));
    }

    #[test]
    fn line_numbers_count_skipped_lines() {
        let source = "\nDATE,QPCP\n2020-01-01,0.1\n\n\n2020-01-02,0.2\r\n\r\n2020-01-03,0.3";
        let table = CsvTable::from_reader(source.as_bytes(), b',').unwrap();
        let lines: Vec<u64> = table.rows.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![3, 6, 8]);
    }

    #[test]
    fn whitespace_only_lines_keep_later_numbering() {
        let source = "DATE,QPCP\n  ,  \n2020-01-01,0.1\n";
        let table = CsvTable::from_reader(source.as_bytes(), b',').unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].line, 3);
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = CsvTable::from_reader("\n\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, LoadError::EmptySource));
    }

    #[test]
    fn alternate_delimiter() {
        let table = CsvTable::from_reader("DATE;QPCP\n2020-01-01;0.1\n".as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0].cells, vec!["2020-01-01", "0.1"]);
    }
}
