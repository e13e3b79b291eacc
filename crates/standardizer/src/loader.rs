//! Raw telemetry CSV loading
//!
//! Numeric cells that are empty, `NaN` or unparseable are coerced to missing.
//! Only unparseable cells count as coerced; empty and `NaN` cells already mean
//! missing.
//! Rows are never rejected here; row validation happens downstream.

use crate::error::StandardizeError;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use data_contract::REQUIRED_COLUMNS;
use std::io::Read;
use tracing::debug;

/// One input row restricted to the engine columns, in contract order
pub type RawRow = [Option<f64>; REQUIRED_COLUMNS.len()];

/// Rows read from one input file
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Engine columns per row
    pub rows: Vec<RawRow>,
    /// Non-empty cells that failed numeric parsing
    pub coerced_values: usize,
}

/// Streaming reader for one telemetry CSV
pub struct TableLoader<'a> {
    required_columns: &'a [String],
}

impl<'a> TableLoader<'a> {
    /// Create a loader enforcing `required_columns`
    pub fn new(required_columns: &'a [String]) -> Self {
        Self { required_columns }
    }

    /// Required columns not present in `headers`, in contract order
    pub fn missing_columns(&self, headers: &StringRecord) -> Vec<String> {
        self.required_columns
            .iter()
            .filter(|col| !headers.iter().any(|h| h == col.as_str()))
            .cloned()
            .collect()
    }

    /// Read all rows; fails with `MissingColumns` before reading any record
    pub fn load<R: Read>(&self, reader: R) -> Result<RawTable, StandardizeError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let missing = self.missing_columns(&headers);
        if !missing.is_empty() {
            return Err(StandardizeError::MissingColumns(missing));
        }

        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| StandardizeError::MissingColumns(vec![column.to_string()]))?;
        }

        let mut table = RawTable::default();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            let mut row: RawRow = [None; REQUIRED_COLUMNS.len()];
            for (value, &index) in row.iter_mut().zip(&indices) {
                *value = match record.get(index) {
                    Some(cell) => match parse_cell(cell) {
                        Cell::Value(v) => Some(v),
                        Cell::Missing => None,
                        Cell::Unparseable => {
                            table.coerced_values += 1;
                            None
                        }
                    },
                    None => None,
                };
            }
            table.rows.push(row);
        }

        debug!(
            "Loaded {} rows ({} non-numeric values coerced to missing)",
            table.rows.len(),
            table.coerced_values
        );
        Ok(table)
    }
}

enum Cell {
    Value(f64),
    Missing,
    Unparseable,
}

fn parse_cell(cell: &[u8]) -> Cell {
    let Ok(text) = std::str::from_utf8(cell) else {
        return Cell::Unparseable;
    };
    let text = text.trim();
    if text.is_empty() {
        return Cell::Missing;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_nan() => Cell::Missing,
        Ok(v) => Cell::Value(v),
        Err(_) => Cell::Unparseable,
    }
}
