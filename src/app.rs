//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - opens the catalog snapshot and the history file
//! - runs one pipeline operation and prints its report

use std::path::Path;

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, RecordArgs, StoreArgs};
use crate::domain::{HistoryRecord, Product, ProductCatalog, RiskConfig};
use crate::error::{AppError, DssError};
use crate::io::load_catalog_csv;
use crate::store::CsvHistoryStore;

pub mod pipeline;

/// Entry point for the `dss` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    crate::logging::init_logging();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");
    let mut history = CsvHistoryStore::new(&cli.stores.history);

    match cli.command {
        Command::Ingest { file } => handle_ingest(&cli.stores, &file, &mut history),
        Command::Record(args) => handle_record(&cli.stores, args, &mut history),
        Command::Predict { asin, ad_spend } => {
            let result = pipeline::predict_sales(&history, &asin, ad_spend)?;
            print!("{}", crate::report::format_prediction(&asin, &result));
            Ok(())
        }
        Command::Correlate { asin } => {
            let result = pipeline::calculate_correlation(&history, &asin)?;
            print!("{}", crate::report::format_correlation(&asin, &result));
            Ok(())
        }
        Command::Risk { asin, risk } => {
            let product = lookup(&cli.stores, &asin)?;
            let result = pipeline::analyze_risk(&product, &RiskConfig::from(&risk))?;
            print!("{}", crate::report::format_risk(&product, &result));
            Ok(())
        }
        Command::Overview { asins } => {
            let asins = if asins.is_empty() {
                catalog(&cli.stores)?.asins()
            } else {
                asins
            };
            let rows = pipeline::correlation_overview(&history, &asins)?;
            let rows = crate::report::rank_by_efficiency(rows);
            print!("{}", crate::report::format_overview(&rows));
            Ok(())
        }
        Command::Report {
            asin,
            ad_spend,
            risk,
        } => {
            let product = lookup(&cli.stores, &asin)?;
            let report =
                pipeline::product_report(&history, &product, ad_spend, &RiskConfig::from(&risk))?;
            print!("{}", crate::report::format_product_report(&report));
            Ok(())
        }
    }
}

fn handle_ingest(
    stores: &StoreArgs,
    file: &Path,
    history: &mut CsvHistoryStore,
) -> Result<(), AppError> {
    let bytes = std::fs::read(file).map_err(|e| {
        AppError::new(2, format!("Failed to read upload '{}': {e}", file.display()))
    })?;
    let products = load_catalog_csv(&stores.products)?;
    let summary = pipeline::ingest_upload(&bytes, products, history)?;
    print!("{}", crate::report::format_ingest(&summary));
    Ok(())
}

fn handle_record(
    stores: &StoreArgs,
    args: RecordArgs,
    history: &mut CsvHistoryStore,
) -> Result<(), AppError> {
    let catalog = catalog(stores)?;
    let record = HistoryRecord {
        date: args.date,
        sales_units: args.units,
        ad_spend: args.ad_spend,
        revenue: args.revenue,
    };
    pipeline::record_single(&catalog, history, &args.asin, record)?;
    println!("Recorded {} on {}.", args.asin, args.date);
    Ok(())
}

fn catalog(stores: &StoreArgs) -> Result<ProductCatalog, DssError> {
    Ok(ProductCatalog::from_products(load_catalog_csv(&stores.products)?))
}

fn lookup(stores: &StoreArgs, asin: &str) -> Result<Product, DssError> {
    catalog(stores)?
        .get(asin)
        .cloned()
        .ok_or_else(|| DssError::UnknownProductKey {
            key: asin.to_string(),
        })
}
