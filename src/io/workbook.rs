//! Turn an uploaded byte blob into rows of [`Cell`]s.
//!
//! - `.xlsx` containers (zip signature) are read with `calamine`; only the
//!   first worksheet is used.
//! - Anything else is read as CSV text, where every cell is textual.
//!
//! Rows keep their absolute sheet index so errors can point at the row the
//! user sees in their spreadsheet tool.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::DssError;
use crate::io::cells::Cell;

/// Columns read from every row: key, date, sales units, ad spend, revenue.
pub const COLUMN_COUNT: usize = 5;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// One physical sheet row, padded/truncated to [`COLUMN_COUNT`] cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Zero-based row index in the sheet.
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl SheetRow {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Cell at `col`, or [`Cell::Empty`] when the row is short.
    pub fn cell(&self, col: usize) -> &Cell {
        self.cells.get(col).unwrap_or(&Cell::Empty)
    }

    /// 1-based row number, as spreadsheet tools display it.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Read all rows of the first sheet.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, DssError> {
    if bytes.is_empty() {
        return Err(DssError::EmptyInput);
    }
    if bytes.starts_with(ZIP_SIGNATURE) {
        read_xlsx(bytes)
    } else {
        read_csv(bytes)
    }
}

fn read_xlsx(bytes: &[u8]) -> Result<Vec<SheetRow>, DssError> {
    let mut workbook: Xlsx<Cursor<&[u8]>> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsxError| DssError::UnreadableWorkbook {
            reason: e.to_string(),
        })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| DssError::UnreadableWorkbook {
            reason: e.to_string(),
        })?,
        None => return Err(DssError::EmptyInput),
    };

    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };

    let rows = (start.0..=end.0)
        .map(|r| {
            let cells = (0..COLUMN_COUNT as u32)
                .map(|c| range.get_value((r, c)).map(cell_from_data).unwrap_or(Cell::Empty))
                .collect();
            SheetRow::new(r as usize, cells)
        })
        .collect();

    Ok(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok()?.and_hms_opt(0, 0, 0))
}

fn read_csv(bytes: &[u8]) -> Result<Vec<SheetRow>, DssError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DssError::UnreadableWorkbook {
            reason: format!("CSV parse error: {e}"),
        })?;
        // Blank lines are skipped by the reader, so prefer the source line.
        let index = record
            .position()
            .map(|p| p.line().saturating_sub(1) as usize)
            .unwrap_or(idx);
        let cells = record
            .iter()
            .take(COLUMN_COUNT)
            .map(|field| Cell::from(field.trim_start_matches('\u{feff}')))
            .collect();
        rows.push(SheetRow::new(index, cells));
    }

    Ok(rows)
}
