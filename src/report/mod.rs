//! Reporting: ordering of multi-product results and terminal formatting.

use std::cmp::Ordering;

use crate::domain::CorrelationResult;
use crate::error::DssError;

pub mod format;

pub use format::*;

/// One overview line: product key and its correlation outcome.
pub type OverviewRow = (String, Result<CorrelationResult, DssError>);

/// Most efficient spend first; products without a result go last, keeping
/// their relative order.
pub fn rank_by_efficiency(mut rows: Vec<OverviewRow>) -> Vec<OverviewRow> {
    rows.sort_by(|(_, a), (_, b)| match (a, b) {
        (Ok(a), Ok(b)) => b
            .coefficient
            .partial_cmp(&a.coefficient)
            .unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    });
    rows
}
