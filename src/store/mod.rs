//! History store seam.
//!
//! The analytics core only needs two things from persistence: a date-ordered
//! series per product, and a way to append a batch of freshly ingested
//! records. Whatever sits behind the trait owns its own consistency.
//!
//! - [`InMemoryHistoryStore`]: for tests and embedding
//! - [`CsvHistoryStore`]: append-only CSV file used by the `dss` binary

use std::collections::HashMap;

use crate::domain::{HistorySeries, KeyedRecord};
use crate::error::DssError;

pub mod csv_file;
pub mod memory;

pub use csv_file::CsvHistoryStore;
pub use memory::InMemoryHistoryStore;

pub trait HistoryStore {
    /// Date-ordered history of one product (empty when it has none).
    fn history(&self, asin: &str) -> Result<HistorySeries, DssError>;

    /// Histories of several products in one call.
    fn histories(&self, asins: &[String]) -> Result<HashMap<String, HistorySeries>, DssError> {
        asins
            .iter()
            .map(|asin| Ok((asin.clone(), self.history(asin)?)))
            .collect()
    }

    /// Persist a whole batch; returns the number of records written.
    fn insert_batch(&mut self, batch: Vec<KeyedRecord>) -> Result<usize, DssError>;
}
