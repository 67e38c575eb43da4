//! Ad-spend efficiency via Pearson correlation.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{CorrelationBand, CorrelationResult, HistorySeries};
use crate::error::{DssError, MIN_HISTORY};
use crate::math::pearson;

/// Correlate ad spend with units sold over the whole history.
pub fn correlate(history: &HistorySeries) -> Result<CorrelationResult, DssError> {
    if history.len() < MIN_HISTORY {
        return Err(DssError::insufficient_history(history.len()));
    }

    let coefficient = pearson(&history.ad_spend(), &history.sales_units()).ok_or_else(|| {
        DssError::model_fit("correlation is undefined when ad spend or sales never vary")
    })?;
    let interpretation = CorrelationBand::classify(coefficient);

    debug!(n = history.len(), r = coefficient, band = %interpretation, "correlated ad spend");
    Ok(CorrelationResult {
        coefficient,
        interpretation,
    })
}

/// Correlate several products at once (parallel).
///
/// Output order matches input order; each product keeps its own result.
pub fn correlate_many<'a>(
    histories: &[(&'a str, &HistorySeries)],
) -> Vec<(&'a str, Result<CorrelationResult, DssError>)> {
    histories
        .par_iter()
        .map(|&(asin, history)| (asin, correlate(history)))
        .collect()
}
