//! # Statement Analyzer
//!
//! Derives growth rates, asset-composition shares and liquidity ratios from a
//! two-period financial statement (label, prior-year value, current-year value),
//! and packages the results as plain-text context for a narrative assistant.
//!
//! ## Core Concepts
//!
//! - **Growth rate**: `(current - prior) / prior * 100`, with an exact-zero prior
//!   replaced by a tiny epsilon so the division stays defined
//! - **Composition share**: each line as a percentage of the single "total assets" line, per year
//! - **Current ratio**: current assets / current liabilities; `NotAvailable` when liabilities are zero
//!   or either line is missing
//! - **Label lookup**: case- and accent-insensitive substring matching against configurable aliases
//!
//! ## Example
//!
//! ```rust
//! use statement_analyzer::*;
//!
//! let items = vec![
//!     LineItem::new("CURRENT ASSETS", 400.0, 500.0),
//!     LineItem::new("Cash", 100.0, 150.0),
//!     LineItem::new("TOTAL ASSETS", 1000.0, 1250.0),
//!     LineItem::new("CURRENT LIABILITIES", 200.0, 250.0),
//! ];
//!
//! let report = analyze(&items, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.table.rows[1].growth_pct, 50.0);
//! assert_eq!(report.ratios.current_ratio, MetricValue::Available(2.0));
//! println!("{}", report.summary.to_text());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod liquidity;
pub mod locator;
pub mod report;
pub mod schema;
pub mod summary;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use config::{config_json_schema, AnalysisConfig, LabelDictionary};
pub use engine::DerivationEngine;
pub use error::{AnalysisError, Result};
pub use ingestion::StatementTable;
pub use liquidity::{CurrentRatios, LiquidityAnalyzer, MissingIndicatorWarning};
pub use locator::{Labeled, LineLocator};
pub use report::AnalysisTable;
pub use schema::*;
pub use summary::{NarrativeSummary, SummaryEntry};
pub use utils::{coerce_cell, fold_label, safe_divide, DIVISION_EPSILON};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything derived from one statement: the table, the liquidity indicators
/// and the narrative context built from both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub table: AnalysisTable,
    pub ratios: CurrentRatios,
    pub summary: NarrativeSummary,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct StatementAnalyzer;

impl StatementAnalyzer {
    pub fn analyze(items: &[LineItem], config: &AnalysisConfig) -> Result<AnalysisReport> {
        config.validate()?;

        let engine = DerivationEngine::new(config);
        let rows = engine.derive_growth_and_composition(items)?;
        let ratios = engine.compute_current_ratios(&rows);

        if !ratios.warnings.is_empty() {
            debug!(
                "Liquidity indicators degraded: {} missing line item(s)",
                ratios.warnings.len()
            );
        }

        let summary = NarrativeSummary::build(&rows, &ratios, &config.placeholder);

        info!("Analysis complete for {} line items", rows.len());

        Ok(AnalysisReport {
            table: AnalysisTable::new(rows),
            ratios,
            summary,
        })
    }
}

pub fn analyze(items: &[LineItem], config: &AnalysisConfig) -> Result<AnalysisReport> {
    StatementAnalyzer::analyze(items, config)
}

/// Growth and composition with the default configuration.
pub fn derive_growth_and_composition(items: &[LineItem]) -> Result<Vec<DerivedRow>> {
    DerivationEngine::default().derive_growth_and_composition(items)
}

/// Current ratios with the default label aliases.
pub fn compute_current_ratios(rows: &[DerivedRow]) -> CurrentRatios {
    DerivationEngine::default().compute_current_ratios(rows)
}

pub fn build_summary_for_narrative(rows: &[DerivedRow], ratios: &CurrentRatios) -> NarrativeSummary {
    NarrativeSummary::build(rows, ratios, &AnalysisConfig::default().placeholder)
}
