//! Loosely-typed spreadsheet cells and their coercions.
//!
//! Uploads come from many tools: some store numbers as numbers, others as
//! text with thousands separators; dates may be native date cells, bare
//! serial numbers, or free text. Every reader normalizes into [`Cell`] and the
//! ingest code only ever looks at that.

use chrono::NaiveDateTime;

use crate::error::DssError;
use crate::io::dates::datetime_to_serial;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the spreadsheet itself formats as a date/time.
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Render the cell as a trimmed string, the way a business key is read.
    ///
    /// Numeric cells lose their fractional part (`123.0` -> `"123"`), since
    /// product codes typed into a numeric column come back as floats.
    pub fn as_key(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(v) => format!("{}", v.trunc() as i64),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => format!("{}", datetime_to_serial(*dt).trunc() as i64),
        }
    }

    /// Best-effort raw text for error messages.
    pub fn raw_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

/// Coerce a cell to a number.
///
/// - numeric cells yield their value
/// - date cells yield their serial day number
/// - text has `,` thousands separators stripped; empty text is `0.0`
/// - blank and boolean cells are `0.0`
///
/// Text that does not parse to a finite number fails with
/// [`DssError::NonNumericValue`] for `row` (1-based).
pub fn coerce_number(cell: &Cell, row: usize) -> Result<f64, DssError> {
    match cell {
        Cell::Number(v) => Ok(*v),
        Cell::DateTime(dt) => Ok(datetime_to_serial(*dt)),
        Cell::Text(s) => {
            let cleaned = s.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return Ok(0.0);
            }
            match cleaned.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(DssError::NonNumericValue {
                    row,
                    raw: s.trim().to_string(),
                }),
            }
        }
        Cell::Empty | Cell::Bool(_) => Ok(0.0),
    }
}
