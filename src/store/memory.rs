use std::collections::HashMap;

use crate::domain::{HistoryRecord, HistorySeries, KeyedRecord};
use crate::error::DssError;
use crate::store::HistoryStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    by_asin: HashMap<String, Vec<HistoryRecord>>,
    batches: usize,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `insert_batch` calls that wrote at least one record.
    pub fn batch_count(&self) -> usize {
        self.batches
    }

    pub fn total_records(&self) -> usize {
        self.by_asin.values().map(Vec::len).sum()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn history(&self, asin: &str) -> Result<HistorySeries, DssError> {
        let records = self.by_asin.get(asin).cloned().unwrap_or_default();
        Ok(HistorySeries::from_records(records))
    }

    fn insert_batch(&mut self, batch: Vec<KeyedRecord>) -> Result<usize, DssError> {
        let n = batch.len();
        if n == 0 {
            return Ok(0);
        }
        for (asin, record) in batch {
            self.by_asin.entry(asin).or_default().push(record);
        }
        self.batches += 1;
        Ok(n)
    }
}
