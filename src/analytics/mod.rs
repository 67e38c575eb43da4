//! Analytics engines.
//!
//! Responsibilities:
//!
//! - predict unit sales for a proposed ad spend (OLS)
//! - measure and classify how well ad spend tracks sales (Pearson r)
//! - estimate the chance of a positive margin under price/cost noise (Monte Carlo)
//!
//! Each engine is a pure, synchronous computation over its inputs.

pub mod correlation;
pub mod regression;
pub mod risk;

pub use correlation::*;
pub use regression::*;
pub use risk::*;
