//! Product catalog snapshots.
//!
//! The surrounding catalog layer owns products; the CLI reads a CSV export of
//! it with the columns `asin,name,price,cost`.

use std::fs::File;
use std::path::Path;

use crate::domain::Product;
use crate::error::DssError;

/// Load every product from a catalog CSV export.
pub fn load_catalog_csv(path: &Path) -> Result<Vec<Product>, DssError> {
    let file = File::open(path)
        .map_err(|e| DssError::store(format!("Failed to open catalog '{}': {e}", path.display())))?;
    read_catalog(file)
        .map_err(|e| DssError::store(format!("Failed to read catalog '{}': {e}", path.display())))
}

fn read_catalog<R: std::io::Read>(reader: R) -> Result<Vec<Product>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.deserialize().collect()
}
