//! Append-only CSV history file.
//!
//! Layout (header written once, when the file is created):
//!
//! ```text
//! asin,date,sales_units,ad_spend,revenue
//! ABC123,2024-01-31,10,100.5,950.0
//! ```

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{HistoryRecord, HistorySeries, KeyedRecord};
use crate::error::DssError;
use crate::store::HistoryStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRow {
    asin: String,
    date: NaiveDate,
    sales_units: u64,
    ad_spend: f64,
    revenue: f64,
}

impl StoredRow {
    fn into_keyed(self) -> KeyedRecord {
        (
            self.asin,
            HistoryRecord {
                date: self.date,
                sales_units: self.sales_units,
                ad_spend: self.ad_spend,
                revenue: self.revenue,
            },
        )
    }
}

#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored row, grouped by product. A missing file is empty.
    fn load_all(&self) -> Result<HashMap<String, Vec<HistoryRecord>>, DssError> {
        let mut grouped: HashMap<String, Vec<HistoryRecord>> = HashMap::new();
        if !self.path.exists() {
            return Ok(grouped);
        }

        let file = File::open(&self.path).map_err(|e| {
            DssError::store(format!("Failed to open '{}': {e}", self.path.display()))
        })?;
        let mut reader = csv::Reader::from_reader(file);
        for (idx, result) in reader.deserialize::<StoredRow>().enumerate() {
            let row = result.map_err(|e| {
                DssError::store(format!(
                    "Corrupt history row {} in '{}': {e}",
                    idx + 2,
                    self.path.display()
                ))
            })?;
            let (asin, record) = row.into_keyed();
            grouped.entry(asin).or_default().push(record);
        }
        Ok(grouped)
    }
}

impl HistoryStore for CsvHistoryStore {
    fn history(&self, asin: &str) -> Result<HistorySeries, DssError> {
        let mut all = self.load_all()?;
        Ok(HistorySeries::from_records(all.remove(asin).unwrap_or_default()))
    }

    fn histories(&self, asins: &[String]) -> Result<HashMap<String, HistorySeries>, DssError> {
        let mut all = self.load_all()?;
        Ok(asins
            .iter()
            .map(|asin| {
                let records = all.remove(asin).unwrap_or_default();
                (asin.clone(), HistorySeries::from_records(records))
            })
            .collect())
    }

    fn insert_batch(&mut self, batch: Vec<KeyedRecord>) -> Result<usize, DssError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let n = batch.len();
        // Encode everything first so a failed row never leaves a partial batch.
        let bytes = encode_batch(batch, needs_header)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DssError::store(format!("Failed to open '{}': {e}", self.path.display()))
            })?;
        file.write_all(&bytes)
            .and_then(|()| file.flush())
            .map_err(|e| {
                DssError::store(format!("Failed to append to '{}': {e}", self.path.display()))
            })?;

        Ok(n)
    }
}

/// Serialize a batch to CSV bytes, optionally preceded by the header line.
fn encode_batch(batch: Vec<KeyedRecord>, with_header: bool) -> Result<Vec<u8>, DssError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());

    for (asin, record) in batch {
        let row = StoredRow {
            asin,
            date: record.date,
            sales_units: record.sales_units,
            ad_spend: record.ad_spend,
            revenue: record.revenue,
        };
        writer
            .serialize(row)
            .map_err(|e| DssError::store(format!("Failed to encode history row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| DssError::store(format!("Failed to encode history batch: {e}")))
}
