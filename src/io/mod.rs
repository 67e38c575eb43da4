//! Input helpers.
//!
//! - upload decoding (`workbook`) into loosely typed cells (`cells`)
//! - date resolution (`dates`)
//! - row validation + batch ingest (`ingest`)
//! - product catalog snapshots (`catalog`)

pub mod catalog;
pub mod cells;
pub mod dates;
pub mod ingest;
pub mod workbook;

pub use catalog::*;
pub use ingest::*;
