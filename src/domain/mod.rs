//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - catalog inputs (`Product`, `ProductCatalog`)
//! - history observations (`HistoryRecord`, `HistorySeries`)
//! - analytics outputs (`RegressionResult`, `CorrelationResult`, `RiskResult`)

pub mod types;

pub use types::*;
