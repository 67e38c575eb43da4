//! Formatted terminal output.
//!
//! All text rendering lives here so engine code never formats strings and the
//! output stays easy to snapshot.

use crate::app::pipeline::ProductReport;
use crate::domain::{CorrelationResult, IngestSummary, Product, RegressionResult, RiskResult};
use crate::error::DssError;

use super::OverviewRow;

pub fn format_ingest(summary: &IngestSummary) -> String {
    format!(
        "Processed {} records ({} products in catalog).\n",
        summary.records_processed, summary.products_available
    )
}

pub fn format_prediction(asin: &str, result: &RegressionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Sales forecast: {asin} ===\n"));
    out.push_str(&format!("Ad spend      : {:.2}\n", result.future_ad_spend));
    out.push_str(&format!("Predicted units: {}\n", result.predicted_units));
    out.push_str(&format!(
        "Model         : {} (units = {:.4} + {:.4} * spend)\n",
        result.model, result.intercept, result.slope
    ));
    out.push_str(&format!("R²            : {:.4}\n", result.model_accuracy));
    out
}

pub fn format_correlation(asin: &str, result: &CorrelationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Ad-spend efficiency: {asin} ===\n"));
    out.push_str(&format!("Pearson r: {:+.4}\n", result.coefficient));
    out.push_str(&format!("Band     : {}\n", result.interpretation));
    out.push_str(&format!("           {}\n", result.interpretation.description()));
    out
}

pub fn format_risk(product: &Product, result: &RiskResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Profitability outlook: {} ({}) ===\n",
        product.asin, product.name
    ));
    out.push_str(&format!("Base price/cost: {:.2} / {:.2}\n", product.price, product.cost));
    out.push_str(&format!(
        "Scenarios      : {} profitable, {} loss, {} total\n",
        result.profitable_scenarios, result.loss_scenarios, result.total_simulations
    ));
    out.push_str(&format!(
        "P(profit)      : {:.1}%\n",
        result.profit_probability() * 100.0
    ));
    out
}

/// Correlation table, one line per product in the order given.
pub fn format_overview(rows: &[OverviewRow]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<16} {:>9} {:<32}", "asin", "r", "band").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<9} {:-<32}", "", "", "").trim_end());
    out.push('\n');

    for (asin, result) in rows {
        let line = match result {
            Ok(c) => format!(
                "{:<16} {:>+9.4} {:<32}",
                truncate(asin, 16),
                c.coefficient,
                c.interpretation.label()
            ),
            Err(err) => format!("{:<16} {:>9} {}", truncate(asin, 16), "-", err),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Every engine's section for one product; failed engines print their error.
pub fn format_product_report(report: &ProductReport) -> String {
    let asin = &report.product.asin;
    let mut out = String::new();
    out.push_str(&format!(
        "##### {} | {} | {} history records #####\n\n",
        asin, report.product.name, report.history_len
    ));

    out.push_str(&section(&report.prediction, |r| format_prediction(asin, r), "Sales forecast"));
    out.push('\n');
    out.push_str(&section(
        &report.correlation,
        |r| format_correlation(asin, r),
        "Ad-spend efficiency",
    ));
    out.push('\n');
    out.push_str(&section(
        &report.risk,
        |r| format_risk(&report.product, r),
        "Profitability outlook",
    ));
    out
}

fn section<T>(
    result: &Result<T, DssError>,
    render: impl Fn(&T) -> String,
    title: &str,
) -> String {
    match result {
        Ok(value) => render(value),
        Err(err) => format!("=== {title} ===\nunavailable: {err}\n"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
