//! Ordinary least squares.
//!
//! The regression engine solves a single-predictor problem with intercept:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! Implementation choices:
//! - We build the `n x 2` design matrix `[1, x_i]` and solve it with SVD, which
//!   copes with tall systems and with rank deficiency (e.g. constant `x`).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - R² is computed from the fitted values, `1 - SSE/SST`. It is returned
//!   as-is, even when `SST = 0` makes it non-finite.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fitted `y = intercept + slope * x` plus its in-sample R².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a simple linear regression with intercept.
///
/// Returns `None` when the inputs are mismatched, empty, or the solver cannot
/// produce finite coefficients.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &response)?;

    let fit = LinearFit {
        intercept: beta[0],
        slope: beta[1],
        r_squared: f64::NAN,
    };

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let resid = yi - fit.predict(xi);
        sse += resid * resid;
        sst += (yi - y_mean) * (yi - y_mean);
    }

    Some(LinearFit {
        r_squared: 1.0 - sse / sst,
        ..fit
    })
}
