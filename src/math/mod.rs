//! Mathematical utilities: least squares and paired-sample statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
