//! Command-line parsing for the `dss` binary.
//!
//! Parsing lives here; dispatch lives in `app`, and the analytics never see
//! clap types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_PERTURBATION, DEFAULT_RISK_ITERATIONS, RiskConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dss", version, about = "Ad-spend decision support: ingest, predict, correlate, simulate")]
pub struct Cli {
    #[command(flatten)]
    pub stores: StoreArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the product snapshot and the sales history live.
#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Product catalog CSV (`asin,name,price,cost`).
    #[arg(long, env = "DSS_PRODUCTS", default_value = "products.csv", global = true)]
    pub products: PathBuf,

    /// Sales history CSV, appended to by `ingest` and `record`.
    #[arg(long, env = "DSS_HISTORY", default_value = "history.csv", global = true)]
    pub history: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a sales-history upload (.xlsx, or CSV with the same columns).
    Ingest {
        /// File to upload.
        file: PathBuf,
    },
    /// Record one observation for a known product.
    Record(RecordArgs),
    /// Predict unit sales for a proposed ad spend.
    Predict {
        asin: String,
        /// Proposed ad spend.
        #[arg(long = "ad-spend", allow_negative_numbers = true)]
        ad_spend: f64,
    },
    /// Correlate ad spend with sales for one product.
    Correlate { asin: String },
    /// Simulate the chance of a positive margin.
    Risk {
        asin: String,
        #[command(flatten)]
        risk: RiskArgs,
    },
    /// Correlation table across several products (all catalog products when none given).
    Overview { asins: Vec<String> },
    /// Run every engine for one product.
    Report {
        asin: String,
        #[arg(long = "ad-spend", allow_negative_numbers = true)]
        ad_spend: f64,
        #[command(flatten)]
        risk: RiskArgs,
    },
}

#[derive(Debug, Args, Clone)]
pub struct RecordArgs {
    pub asin: String,
    /// Observation date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long)]
    pub units: u64,
    #[arg(long = "ad-spend")]
    pub ad_spend: f64,
    #[arg(long, default_value_t = 0.0)]
    pub revenue: f64,
}

/// Monte Carlo knobs.
#[derive(Debug, Args, Clone)]
pub struct RiskArgs {
    /// Number of trials.
    #[arg(long, env = "DSS_RISK_ITERATIONS", default_value_t = DEFAULT_RISK_ITERATIONS)]
    pub iterations: usize,

    /// Relative perturbation applied to price and cost.
    #[arg(long, default_value_t = DEFAULT_PERTURBATION)]
    pub perturbation: f64,

    /// Seed for reproducible runs (entropy when absent).
    #[arg(long, env = "DSS_RISK_SEED")]
    pub seed: Option<u64>,
}

impl From<&RiskArgs> for RiskConfig {
    fn from(args: &RiskArgs) -> Self {
        RiskConfig {
            iterations: args.iterations,
            perturbation: args.perturbation,
            seed: args.seed,
        }
    }
}
