//! Spreadsheet ingest and normalization.
//!
//! This module turns an uploaded spreadsheet of loosely formatted history rows
//! into validated `(asin, HistoryRecord)` pairs and hands them to a history
//! store as one batch.
//!
//! Design goals:
//! - **Fixed schema**: key, date, sales units, ad spend, revenue (row 0 is a header)
//! - **All-or-nothing**: the first defective row aborts the upload; only rows
//!   with a blank key are skipped
//! - **Deterministic behavior**: a pure function of (bytes, catalog)
//! - **Separation of concerns**: no analytics here

use tracing::{debug, info};

use crate::domain::{HistoryRecord, IngestSummary, KeyedRecord, ProductCatalog};
use crate::error::DssError;
use crate::io::cells::coerce_number;
use crate::io::dates::parse_date_cell;
use crate::io::workbook::{SheetRow, read_rows};
use crate::store::HistoryStore;

/// Sheet row holding column titles.
pub const HEADER_ROW: usize = 0;

const COL_KEY: usize = 0;
const COL_DATE: usize = 1;
const COL_SALES_UNITS: usize = 2;
const COL_AD_SPEND: usize = 3;
const COL_REVENUE: usize = 4;

/// Parse an upload and store the result as a single batch.
///
/// Nothing is written unless every row parses.
pub fn parse_and_ingest<S: HistoryStore + ?Sized>(
    bytes: &[u8],
    catalog: &ProductCatalog,
    store: &mut S,
) -> Result<IngestSummary, DssError> {
    info!(products = catalog.len(), "product catalog loaded");

    let records = parse_records(bytes, catalog)?;
    let records_processed = records.len();
    if records_processed > 0 {
        store.insert_batch(records)?;
    }

    info!(records = records_processed, "history batch stored");
    Ok(IngestSummary {
        records_processed,
        products_available: catalog.len(),
    })
}

/// Parse an upload into keyed records without touching any store.
pub fn parse_records(bytes: &[u8], catalog: &ProductCatalog) -> Result<Vec<KeyedRecord>, DssError> {
    let rows = read_rows(bytes)?;
    parse_rows(&rows, catalog)
}

/// Parse already-decoded sheet rows.
pub fn parse_rows(
    rows: &[SheetRow],
    catalog: &ProductCatalog,
) -> Result<Vec<KeyedRecord>, DssError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        if row.index == HEADER_ROW {
            continue;
        }
        match parse_row(row, catalog)? {
            Some(record) => records.push(record),
            None => debug!(row = row.number(), "skipping row with blank key"),
        }
    }
    Ok(records)
}

fn parse_row(row: &SheetRow, catalog: &ProductCatalog) -> Result<Option<KeyedRecord>, DssError> {
    let line = row.number();

    let key = row.cell(COL_KEY).as_key();
    if key.is_empty() {
        return Ok(None);
    }

    let product = catalog.get(&key).ok_or_else(|| DssError::UnknownProduct {
        row: line,
        key: key.clone(),
    })?;

    let date = parse_date_cell(row.cell(COL_DATE), line)?;

    // Units are truncated, not rounded: 9.9 units is 9.
    let sales_units = coerce_number(row.cell(COL_SALES_UNITS), line)?.trunc();
    let ad_spend = coerce_number(row.cell(COL_AD_SPEND), line)?;
    let revenue = coerce_number(row.cell(COL_REVENUE), line)?;

    if sales_units < 0.0 {
        return Err(DssError::NegativeValue {
            row: line,
            column: "sales_units",
            value: sales_units,
        });
    }
    if ad_spend < 0.0 {
        return Err(DssError::NegativeValue {
            row: line,
            column: "ad_spend",
            value: ad_spend,
        });
    }

    Ok(Some((
        product.asin.clone(),
        HistoryRecord {
            date,
            sales_units: sales_units as u64,
            ad_spend,
            revenue,
        },
    )))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Product;
    use crate::io::cells::Cell;
    use crate::store::InMemoryHistoryStore;

    const HEADER: &str = "asin,date,sales_units,ad_spend,revenue\n";

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_products([
            Product {
                asin: "ABC123".to_string(),
                name: "Widget".to_string(),
                price: 25.0,
                cost: 10.0,
            },
            Product {
                asin: "777".to_string(),
                name: "Numeric code".to_string(),
                price: 5.0,
                cost: 1.0,
            },
        ])
    }

    fn upload(rows: &str) -> Vec<u8> {
        format!("{HEADER}{rows}").into_bytes()
    }

    fn jan31() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn well_formed_row_becomes_record() {
        let records = parse_records(&upload("ABC123,2024-01-31,10,100.50,950\n"), &catalog()).unwrap();
        assert_eq!(records.len(), 1);
        let (asin, record) = &records[0];
        assert_eq!(asin, "ABC123");
        assert_eq!(record.date, jan31());
        assert_eq!(record.sales_units, 10);
        assert_eq!(record.ad_spend, 100.50);
        assert_eq!(record.revenue, 950.0);
    }

    #[test]
    fn day_first_text_gives_same_date() {
        let iso = parse_records(&upload("ABC123,2024-01-31,10,100.50,950\n"), &catalog()).unwrap();
        let dmy = parse_records(&upload("ABC123,31/01/2024,10,100.50,950\n"), &catalog()).unwrap();
        assert_eq!(iso, dmy);
    }

    #[test]
    fn unknown_key_reports_one_based_row() {
        let err = parse_records(
            &upload("ABC123,2024-01-31,10,100.50,950\nNOPE,2024-01-31,1,1,1\n"),
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DssError::UnknownProduct {
                row: 3,
                key: "NOPE".to_string()
            }
        );
    }

    #[test]
    fn blank_keys_are_skipped_and_keys_are_trimmed() {
        let records = parse_records(
            &upload("  ,2024-01-31,1,1,1\n ABC123 ,2024-01-31,1,1,1\n,garbage,x,y,z\n"),
            &catalog(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn numbers_tolerate_separators_and_blanks() {
        let records = parse_records(&upload("ABC123,45322,\"1,200.9\",,\"12,000\"\n"), &catalog()).unwrap();
        let (_, record) = &records[0];
        assert_eq!(record.date, jan31());
        assert_eq!(record.sales_units, 1200);
        assert_eq!(record.ad_spend, 0.0);
        assert_eq!(record.revenue, 12_000.0);
    }

    #[test]
    fn malformed_cells_are_fatal() {
        let bad_date = parse_records(&upload("ABC123,31.01.2024,1,1,1\n"), &catalog()).unwrap_err();
        assert_eq!(
            bad_date,
            DssError::UnrecognizedDate {
                row: 2,
                raw: "31.01.2024".to_string()
            }
        );

        let bad_number = parse_records(&upload("ABC123,2024-01-31,ten,1,1\n"), &catalog()).unwrap_err();
        assert_eq!(
            bad_number,
            DssError::NonNumericValue {
                row: 2,
                raw: "ten".to_string()
            }
        );

        let negative = parse_records(&upload("ABC123,2024-01-31,1,-5,1\n"), &catalog()).unwrap_err();
        assert!(matches!(
            negative,
            DssError::NegativeValue {
                row: 2,
                column: "ad_spend",
                ..
            }
        ));
    }

    #[test]
    fn native_cells_resolve_without_text() {
        let rows = vec![
            SheetRow::new(0, vec![Cell::Text("asin".into())]),
            SheetRow::new(
                4,
                vec![
                    Cell::Number(777.0),
                    Cell::DateTime(jan31().and_hms_opt(0, 0, 0).unwrap()),
                    Cell::Number(9.9),
                    Cell::Number(12.5),
                    Cell::Empty,
                ],
            ),
        ];
        let records = parse_rows(&rows, &catalog()).unwrap();
        assert_eq!(records.len(), 1);
        let (asin, record) = &records[0];
        assert_eq!(asin, "777");
        assert_eq!(record.date, jan31());
        assert_eq!(record.sales_units, 9);
        assert_eq!(record.revenue, 0.0);
    }

    #[test]
    fn ingest_stores_one_batch_and_reports_catalog_size() {
        let mut store = InMemoryHistoryStore::new();
        let bytes = upload("ABC123,2024-01-31,10,100.50,950\nABC123,2024-02-01,12,120,990\n");

        let summary = parse_and_ingest(&bytes, &catalog(), &mut store).unwrap();
        assert_eq!(
            summary,
            IngestSummary {
                records_processed: 2,
                products_available: 2
            }
        );
        assert_eq!(store.batch_count(), 1);

        // Same file again: same shape, duplicates kept.
        let again = parse_and_ingest(&bytes, &catalog(), &mut store).unwrap();
        assert_eq!(again.records_processed, summary.records_processed);
        assert_eq!(store.history("ABC123").unwrap().len(), 4);
    }

    #[test]
    fn failed_upload_writes_nothing() {
        let mut store = InMemoryHistoryStore::new();
        let bytes = upload("ABC123,2024-01-31,10,100.50,950\nABC123,someday,1,1,1\n");
        assert!(parse_and_ingest(&bytes, &catalog(), &mut store).is_err());
        assert_eq!(store.total_records(), 0);
    }

    /// In-memory `.xlsx` with a header row at sheet row 0.
    fn workbook(fill: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut book = rust_xlsxwriter::Workbook::new();
        let sheet = book.add_worksheet();
        for (col, title) in ["asin", "date", "sales_units", "ad_spend", "revenue"]
            .into_iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, title).unwrap();
        }
        fill(sheet);
        book.save_to_buffer().unwrap()
    }

    #[test]
    fn xlsx_rows_resolve_native_cells() {
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let bytes = workbook(|sheet| {
            // Date-formatted cell and text spend.
            sheet.write_string(1, 0, "ABC123").unwrap();
            sheet.write_number_with_format(1, 1, 45322.0, &date_format).unwrap();
            sheet.write_number(1, 2, 10.0).unwrap();
            sheet.write_string(1, 3, "1,250.75").unwrap();
            sheet.write_number(1, 4, 950.0).unwrap();
            // Numeric key and a bare serial after two empty rows.
            sheet.write_number(4, 0, 777.0).unwrap();
            sheet.write_number(4, 1, 45323.0).unwrap();
            sheet.write_number(4, 2, 3.7).unwrap();
            sheet.write_number(4, 3, 12.0).unwrap();
        });

        let records = parse_records(&bytes, &catalog()).unwrap();
        assert_eq!(records.len(), 2);

        let (asin, record) = &records[0];
        assert_eq!(asin, "ABC123");
        assert_eq!(record.date, jan31());
        assert_eq!(record.sales_units, 10);
        assert_eq!(record.ad_spend, 1250.75);
        assert_eq!(record.revenue, 950.0);

        let (asin, record) = &records[1];
        assert_eq!(asin, "777");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(record.sales_units, 3);
        assert_eq!(record.revenue, 0.0);
    }

    #[test]
    fn xlsx_errors_use_sheet_row_numbers() {
        let bytes = workbook(|sheet| {
            sheet.write_string(1, 0, "ABC123").unwrap();
            sheet.write_string(1, 1, "2024-01-31").unwrap();
            sheet.write_number(1, 2, 1.0).unwrap();
            sheet.write_string(4, 0, "NOPE").unwrap();
            sheet.write_string(4, 1, "2024-01-31").unwrap();
        });

        let mut store = InMemoryHistoryStore::new();
        assert_eq!(
            parse_and_ingest(&bytes, &catalog(), &mut store),
            Err(DssError::UnknownProduct {
                row: 5,
                key: "NOPE".to_string()
            })
        );
        assert_eq!(store.total_records(), 0);
    }

    #[test]
    fn empty_upload_fails() {
        let mut store = InMemoryHistoryStore::new();
        assert_eq!(
            parse_and_ingest(b"", &catalog(), &mut store),
            Err(DssError::EmptyInput)
        );
    }
}
