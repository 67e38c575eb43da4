//! Sales prediction from ad spend.
//!
//! Fits `sales_units = β0 + β1 * ad_spend` by ordinary least squares over the
//! full history (no split, no regularization) and evaluates the line at a
//! proposed spend level.

use tracing::debug;

use crate::domain::{HistorySeries, RegressionResult};
use crate::error::{DssError, MIN_HISTORY};
use crate::math::fit_linear;

/// Label reported with every prediction.
pub const MODEL_NAME: &str = "OLS";

/// Predict unit sales for `future_ad_spend`.
///
/// Fails with [`DssError::InsufficientHistory`] for fewer than two records,
/// before any other validation.
pub fn predict(
    history: &HistorySeries,
    future_ad_spend: f64,
) -> Result<RegressionResult, DssError> {
    if history.len() < MIN_HISTORY {
        return Err(DssError::insufficient_history(history.len()));
    }
    if !future_ad_spend.is_finite() {
        return Err(DssError::invalid_input(format!(
            "future ad spend must be finite (got {future_ad_spend})"
        )));
    }

    let x = history.ad_spend();
    let y = history.sales_units();
    let fit = fit_linear(&x, &y)
        .ok_or_else(|| DssError::model_fit("least squares produced no finite coefficients"))?;

    let predicted = fit.predict(future_ad_spend);
    if !predicted.is_finite() {
        return Err(DssError::model_fit(format!(
            "non-finite prediction at ad spend {future_ad_spend}"
        )));
    }

    debug!(
        n = history.len(),
        intercept = fit.intercept,
        slope = fit.slope,
        r_squared = fit.r_squared,
        "fitted sales model"
    );

    Ok(RegressionResult {
        predicted_units: round_half_up(predicted),
        model_accuracy: fit.r_squared,
        future_ad_spend,
        intercept: fit.intercept,
        slope: fit.slope,
        model: MODEL_NAME.to_string(),
    })
}

/// Nearest integer, ties toward +∞ (`2.5 -> 3`, `-2.5 -> -2`).
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}
