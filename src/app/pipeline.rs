//! Operations exposed to the surrounding CRUD/report layer.
//!
//! Each function reads what it needs from the collaborators (catalog snapshot,
//! history store), runs one engine, and returns plain results. The CLI is just
//! one caller of these.

use tracing::{info, info_span, warn};

use crate::analytics::{RiskSimulator, correlate, correlate_many, predict};
use crate::domain::{
    CorrelationResult, HistoryRecord, IngestSummary, Product, ProductCatalog, RegressionResult,
    RiskConfig, RiskResult,
};
use crate::error::DssError;
use crate::io::parse_and_ingest;
use crate::store::HistoryStore;

/// Everything the engines can say about one product.
///
/// Engines run independently, so one failing (e.g. too little history) does
/// not hide the others.
#[derive(Debug, Clone)]
pub struct ProductReport {
    pub product: Product,
    pub history_len: usize,
    pub prediction: Result<RegressionResult, DssError>,
    pub correlation: Result<CorrelationResult, DssError>,
    pub risk: Result<RiskResult, DssError>,
}

/// Bulk upload: build the catalog once for this call, parse, store one batch.
pub fn ingest_upload<S: HistoryStore + ?Sized>(
    bytes: &[u8],
    products: impl IntoIterator<Item = Product>,
    store: &mut S,
) -> Result<IngestSummary, DssError> {
    let _span = info_span!("ingest", bytes = bytes.len()).entered();
    let catalog = ProductCatalog::from_products(products);
    if catalog.is_empty() {
        warn!("product catalog is empty; any keyed row will be rejected");
    }
    let summary = parse_and_ingest(bytes, &catalog, store)?;
    info!(
        records = summary.records_processed,
        products = summary.products_available,
        "upload ingested"
    );
    Ok(summary)
}

/// Create one record directly, outside of a bulk upload.
pub fn record_single<S: HistoryStore + ?Sized>(
    catalog: &ProductCatalog,
    store: &mut S,
    asin: &str,
    record: HistoryRecord,
) -> Result<(), DssError> {
    let product = catalog.get(asin).ok_or_else(|| DssError::UnknownProductKey {
        key: asin.to_string(),
    })?;
    if !(record.ad_spend.is_finite() && record.ad_spend >= 0.0) {
        return Err(DssError::invalid_input(format!(
            "ad spend must be finite and non-negative (got {})",
            record.ad_spend
        )));
    }
    store.insert_batch(vec![(product.asin.clone(), record)])?;
    Ok(())
}

pub fn predict_sales<S: HistoryStore + ?Sized>(
    store: &S,
    asin: &str,
    future_ad_spend: f64,
) -> Result<RegressionResult, DssError> {
    let history = store.history(asin)?;
    predict(&history, future_ad_spend)
}

pub fn calculate_correlation<S: HistoryStore + ?Sized>(
    store: &S,
    asin: &str,
) -> Result<CorrelationResult, DssError> {
    let history = store.history(asin)?;
    correlate(&history)
}

pub fn analyze_risk(product: &Product, config: &RiskConfig) -> Result<RiskResult, DssError> {
    RiskSimulator::new(*config).simulate(product.price, product.cost)
}

/// Correlation for several products, fetched in one store call.
pub fn correlation_overview<S: HistoryStore + ?Sized>(
    store: &S,
    asins: &[String],
) -> Result<Vec<(String, Result<CorrelationResult, DssError>)>, DssError> {
    let histories = store.histories(asins)?;
    let pairs: Vec<_> = asins
        .iter()
        .filter_map(|asin| histories.get(asin).map(|h| (asin.as_str(), h)))
        .collect();

    Ok(correlate_many(&pairs)
        .into_iter()
        .map(|(asin, result)| (asin.to_string(), result))
        .collect())
}

/// Run all three engines for one product.
pub fn product_report<S: HistoryStore + ?Sized>(
    store: &S,
    product: &Product,
    future_ad_spend: f64,
    risk: &RiskConfig,
) -> Result<ProductReport, DssError> {
    let _span = info_span!("report", asin = %product.asin).entered();
    let history = store.history(&product.asin)?;

    Ok(ProductReport {
        product: product.clone(),
        history_len: history.len(),
        prediction: predict(&history, future_ad_spend),
        correlation: correlate(&history),
        risk: analyze_risk(product, risk),
    })
}
