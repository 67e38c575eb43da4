//! Date parsing for uploaded history rows.
//!
//! A date cell is resolved by trying, in order:
//!
//! 1. a native date/time cell
//! 2. a numeric cell, read as a serial day number
//! 3. text, against [`TEXT_PATTERNS`] (first match wins)
//! 4. purely numeric text, read as a serial day number
//!
//! Serial day numbers use the 1900 date system of common spreadsheet tools,
//! including its fictitious 1900-02-29 (serial 60).

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use crate::error::DssError;
use crate::io::cells::Cell;

/// `NaiveDate::num_days_from_ce` of 1899-12-30, day zero for serials >= 61.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// First serial that sits after the fictitious 1900-02-29.
const FIRST_SERIAL_AFTER_LEAP_BUG: i64 = 61;

const SECONDS_PER_DAY: f64 = 86_400.0;

static SERIAL_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("serial pattern is valid"));

/// A text date layout: its display name and a pure parser.
pub type DatePattern = (&'static str, fn(&str) -> Option<NaiveDate>);

/// Accepted text layouts, in the order they are tried.
pub const TEXT_PATTERNS: [DatePattern; 5] = [
    ("yyyy-MM-dd", parse_iso),
    ("dd/MM/yyyy", parse_dmy_slash),
    ("M/d/yyyy", parse_mdy_slash),
    ("dd-MM-yyyy", parse_dmy_dash),
    ("yyyy/MM/dd", parse_ymd_slash),
];

/// Resolve the date column of one row (`row` is 1-based, for errors).
pub fn parse_date_cell(cell: &Cell, row: usize) -> Result<NaiveDate, DssError> {
    let unrecognized = || DssError::UnrecognizedDate {
        row,
        raw: cell.raw_text(),
    };

    match cell {
        Cell::DateTime(dt) => Ok(dt.date()),
        Cell::Number(serial) => serial_to_date(*serial).ok_or_else(unrecognized),
        Cell::Text(_) | Cell::Bool(_) => {
            let text = cell.as_key();
            if text.is_empty() {
                return Err(unrecognized());
            }
            parse_date_text(&text).ok_or_else(unrecognized)
        }
        Cell::Empty => Err(unrecognized()),
    }
}

/// Parse trimmed text against the known layouts, then as a serial number.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    TEXT_PATTERNS
        .iter()
        .find_map(|(_, parse)| parse(text))
        .or_else(|| {
            if !SERIAL_TEXT.is_match(text) {
                return None;
            }
            text.parse::<f64>().ok().and_then(serial_to_date)
        })
}

/// Convert a serial day number to a calendar day.
///
/// The fractional (time-of-day) part is discarded. Negative and non-finite
/// serials have no date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let whole = serial.floor() as i64;
    // Before the fictitious leap day everything sits one day later.
    let offset = if whole < FIRST_SERIAL_AFTER_LEAP_BUG {
        whole + 1
    } else {
        whole
    };
    let days = i64::from(SERIAL_EPOCH_DAYS_FROM_CE).checked_add(offset)?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
}

/// Inverse of [`serial_to_date`], keeping the time of day as a fraction.
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let days = i64::from(dt.date().num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE);
    let whole = if days < FIRST_SERIAL_AFTER_LEAP_BUG {
        days - 1
    } else {
        days
    };
    whole as f64 + f64::from(dt.time().num_seconds_from_midnight()) / SECONDS_PER_DAY
}

// Field widths are checked with these regexes rather than chrono format
// strings: `%d` and `%m` accept a single digit where `dd`/`MM` require two,
// and chrono rejects an overflowing day that should clamp to month end.
static ISO: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})$"));
static DMY_SLASH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<d>[0-9]{2})/(?P<m>[0-9]{2})/(?P<y>[0-9]{4})$"));
static MDY_SLASH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<m>[0-9]{1,2})/(?P<d>[0-9]{1,2})/(?P<y>[0-9]{4})$"));
static DMY_DASH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<d>[0-9]{2})-(?P<m>[0-9]{2})-(?P<y>[0-9]{4})$"));
static YMD_SLASH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<y>[0-9]{4})/(?P<m>[0-9]{2})/(?P<d>[0-9]{2})$"));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("date pattern is valid")
}

/// Match `s` against a layout and resolve its `y`/`m`/`d` groups.
fn match_layout(re: &Regex, s: &str) -> Option<NaiveDate> {
    let caps = re.captures(s)?;
    let field = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
    resolve(field("y")?, field("m")?, field("d")?)
}

/// Build a date from fields, clamping a day past month end to the last day
/// (`2024-02-30` -> 2024-02-29). Months outside 1..=12 and days outside
/// 1..=31 are never valid.
fn resolve(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?.day();
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    match_layout(&ISO, s)
}

fn parse_dmy_slash(s: &str) -> Option<NaiveDate> {
    match_layout(&DMY_SLASH, s)
}

fn parse_mdy_slash(s: &str) -> Option<NaiveDate> {
    match_layout(&MDY_SLASH, s)
}

fn parse_dmy_dash(s: &str) -> Option<NaiveDate> {
    match_layout(&DMY_DASH, s)
}

fn parse_ymd_slash(s: &str) -> Option<NaiveDate> {
    match_layout(&YMD_SLASH, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn every_text_layout_is_accepted() {
        let jan31 = date(2024, 1, 31);
        for text in ["2024-01-31", "31/01/2024", "1/31/2024", "31-01-2024", "2024/01/31"] {
            assert_eq!(parse_date_text(text), Some(jan31), "{text}");
        }
    }

    #[test]
    fn short_fields_fall_through_to_month_first() {
        // Not dd/MM/yyyy (fields are not two digits wide), so M/d/yyyy wins.
        assert_eq!(parse_date_text("1/2/2024"), Some(date(2024, 1, 2)));
        // Two-digit fields match dd/MM/yyyy first.
        assert_eq!(parse_date_text("01/02/2024"), Some(date(2024, 2, 1)));
        // Day 13 cannot be a month, dd/MM/yyyy still wins.
        assert_eq!(parse_date_text("13/02/2024"), Some(date(2024, 2, 13)));
    }

    #[test]
    fn day_past_month_end_clamps_to_last_day() {
        assert_eq!(parse_date_text("2024-02-30"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date_text("2023-02-31"), Some(date(2023, 2, 28)));
        assert_eq!(parse_date_text("31/04/2024"), Some(date(2024, 4, 30)));
        assert_eq!(parse_date_text("2024/12/31"), Some(date(2024, 12, 31)));
    }

    #[test]
    fn out_of_range_fields_do_not_match() {
        assert_eq!(parse_date_text("2024-02-32"), None);
        assert_eq!(parse_date_text("2024-13-01"), None);
        assert_eq!(parse_date_text("2024-00-10"), None);
        assert_eq!(parse_date_text("2024-1-5"), None);
        assert_eq!(parse_date_text("yesterday"), None);
    }

    #[test]
    fn serial_numbers_follow_1900_system() {
        assert_eq!(serial_to_date(45292.0), Some(date(2024, 1, 1)));
        assert_eq!(serial_to_date(45322.75), Some(date(2024, 1, 31)));
        assert_eq!(serial_to_date(1.0), Some(date(1900, 1, 1)));
        assert_eq!(serial_to_date(59.0), Some(date(1900, 2, 28)));
        assert_eq!(serial_to_date(61.0), Some(date(1900, 3, 1)));
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[test]
    fn serial_text_is_last_resort() {
        assert_eq!(parse_date_text("45322"), Some(date(2024, 1, 31)));
        assert_eq!(parse_date_text("45322.5"), Some(date(2024, 1, 31)));
        assert_eq!(parse_date_text("-3"), None);
        assert_eq!(parse_date_text("45,322"), None);
    }

    #[test]
    fn datetime_round_trips_through_serial() {
        let dt = date(2024, 1, 31).and_hms_opt(12, 0, 0).unwrap();
        assert!((datetime_to_serial(dt) - 45322.5).abs() < 1e-9);
        let early = date(1900, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(datetime_to_serial(early), 1.0);
    }

    #[test]
    fn cells_resolve_in_order() {
        let jan31 = date(2024, 1, 31);
        let native = Cell::DateTime(jan31.and_hms_opt(8, 30, 0).unwrap());
        assert_eq!(parse_date_cell(&native, 2).unwrap(), jan31);
        assert_eq!(parse_date_cell(&Cell::Number(45322.0), 2).unwrap(), jan31);
        assert_eq!(parse_date_cell(&Cell::Text(" 31/01/2024 ".into()), 2).unwrap(), jan31);
    }

    #[test]
    fn unparseable_cells_carry_row_and_text() {
        let err = parse_date_cell(&Cell::Text("31.01.2024".into()), 5).unwrap_err();
        assert_eq!(
            err,
            DssError::UnrecognizedDate {
                row: 5,
                raw: "31.01.2024".to_string()
            }
        );
        assert!(matches!(
            parse_date_cell(&Cell::Empty, 5),
            Err(DssError::UnrecognizedDate { row: 5, .. })
        ));
    }
}
