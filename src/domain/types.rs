//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - handed in by the surrounding catalog/CRUD layer
//! - persisted by a history store
//! - printed or exported by callers

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Monte Carlo trial count used unless configured otherwise.
///
/// Kept fixed across products so that risk outlooks are comparable.
pub const DEFAULT_RISK_ITERATIONS: usize = 1000;

/// Half-width of the uniform price/cost perturbation (±15%).
pub const DEFAULT_PERTURBATION: f64 = 0.15;

/// A catalog product, keyed by its external business code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub asin: String,
    pub name: String,
    /// Unit selling price.
    pub price: f64,
    /// Unit cost.
    pub cost: f64,
}

/// Immutable snapshot of known products, keyed by business code.
///
/// Built once per ingestion call and passed explicitly to the parser, so the
/// parser never queries a store per row.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    by_asin: HashMap<String, Product>,
}

impl ProductCatalog {
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let by_asin = products
            .into_iter()
            .map(|p| (p.asin.clone(), p))
            .collect();
        Self { by_asin }
    }

    pub fn get(&self, asin: &str) -> Option<&Product> {
        self.by_asin.get(asin)
    }

    pub fn len(&self) -> usize {
        self.by_asin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_asin.is_empty()
    }

    /// All keys, sorted.
    pub fn asins(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.by_asin.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// One daily observation for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    pub sales_units: u64,
    pub ad_spend: f64,
    /// Money collected that day. Informational only; analytics ignore it.
    pub revenue: f64,
}

/// A parsed upload row: the product's business key and its observation.
pub type KeyedRecord = (String, HistoryRecord);

/// Date-ordered history of a single product.
///
/// Duplicate dates are kept as distinct observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySeries {
    records: Vec<HistoryRecord>,
}

impl HistorySeries {
    /// Build a series, sorting by date. The sort is stable, so same-day
    /// records keep their insertion order.
    pub fn from_records(mut records: Vec<HistoryRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Explanatory variable (x).
    pub fn ad_spend(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.ad_spend).collect()
    }

    /// Response variable (y).
    pub fn sales_units(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sales_units as f64).collect()
    }
}

/// Outcome of a sales prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Model output at `future_ad_spend`, rounded half-up.
    pub predicted_units: i64,
    /// R² over the training data. Not finite when the history is degenerate
    /// (e.g. constant sales), so consumers must not assume `[0, 1]`.
    pub model_accuracy: f64,
    pub future_ad_spend: f64,
    pub intercept: f64,
    pub slope: f64,
    pub model: String,
}

/// Strength/direction bands for the ad-spend vs. sales correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationBand {
    #[serde(rename = "Highly Efficient")]
    HighlyEfficient,
    #[serde(rename = "Moderate Impact")]
    ModerateImpact,
    #[serde(rename = "Wasted Spend")]
    WastedSpend,
    #[serde(rename = "Moderate Inverse Relationship")]
    ModerateInverse,
    #[serde(rename = "Critical Inverse Relationship")]
    CriticalInverse,
}

impl CorrelationBand {
    /// Classify a Pearson coefficient. First match wins:
    ///
    /// | band | condition |
    /// |---|---|
    /// | Highly Efficient | `r >= 0.7` |
    /// | Moderate Impact | `r >= 0.3` |
    /// | Wasted Spend | `r > -0.3` |
    /// | Moderate Inverse Relationship | `r > -0.7` |
    /// | Critical Inverse Relationship | otherwise |
    ///
    /// The edges are asymmetric: `0.7` and `0.3` belong to the
    /// upper band, `-0.3` and `-0.7` to the lower one.
    pub fn classify(r: f64) -> Self {
        if r >= 0.7 {
            CorrelationBand::HighlyEfficient
        } else if r >= 0.3 {
            CorrelationBand::ModerateImpact
        } else if r > -0.3 {
            CorrelationBand::WastedSpend
        } else if r > -0.7 {
            CorrelationBand::ModerateInverse
        } else {
            CorrelationBand::CriticalInverse
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CorrelationBand::HighlyEfficient => "Highly Efficient",
            CorrelationBand::ModerateImpact => "Moderate Impact",
            CorrelationBand::WastedSpend => "Wasted Spend",
            CorrelationBand::ModerateInverse => "Moderate Inverse Relationship",
            CorrelationBand::CriticalInverse => "Critical Inverse Relationship",
        }
    }

    /// Advice shown next to the label.
    pub fn description(self) -> &'static str {
        match self {
            CorrelationBand::HighlyEfficient => {
                "More ad spend reliably tracks many more sales."
            }
            CorrelationBand::ModerateImpact => {
                "Advertising helps, but it is not the only driver of sales."
            }
            CorrelationBand::WastedSpend => {
                "No clear relationship between ad spend and sales."
            }
            CorrelationBand::ModerateInverse => {
                "Careful: sales dip slightly as ad spend grows."
            }
            CorrelationBand::CriticalInverse => {
                "Alert: advertising is moving sales in the wrong direction."
            }
        }
    }
}

impl std::fmt::Display for CorrelationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson r, in `[-1, 1]`.
    pub coefficient: f64,
    pub interpretation: CorrelationBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResult {
    pub profitable_scenarios: usize,
    pub loss_scenarios: usize,
    pub total_simulations: usize,
}

impl RiskResult {
    /// Share of trials that ended with a positive margin.
    pub fn profit_probability(&self) -> f64 {
        if self.total_simulations == 0 {
            return 0.0;
        }
        self.profitable_scenarios as f64 / self.total_simulations as f64
    }
}

/// Monte Carlo settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskConfig {
    pub iterations: usize,
    /// Multipliers are drawn from `[1 - perturbation, 1 + perturbation]`.
    pub perturbation: f64,
    /// Fixed seed for reproducible runs; entropy-seeded when `None`.
    pub seed: Option<u64>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_RISK_ITERATIONS,
            perturbation: DEFAULT_PERTURBATION,
            seed: None,
        }
    }
}

/// Result of a bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub records_processed: usize,
    /// Catalog size at parse time.
    pub products_available: usize,
}
