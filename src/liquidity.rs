use crate::locator::LineLocator;
use crate::schema::{DerivedRow, MetricValue, StatementLine};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A liquidity line item that could not be found. Recoverable: the ratios
/// degrade to `NotAvailable` and the rest of the analysis stays valid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissingIndicatorWarning {
    pub line: StatementLine,
}

impl fmt::Display for MissingIndicatorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing '{}' line item; current ratio is not available",
            self.line
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentRatios {
    pub prior_ratio: MetricValue,
    pub current_ratio: MetricValue,
    pub current_asset_growth_pct: MetricValue,
    pub warnings: Vec<MissingIndicatorWarning>,
}

impl CurrentRatios {
    fn not_available(warnings: Vec<MissingIndicatorWarning>) -> Self {
        Self {
            prior_ratio: MetricValue::NotAvailable,
            current_ratio: MetricValue::NotAvailable,
            current_asset_growth_pct: MetricValue::NotAvailable,
            warnings,
        }
    }

    /// Change in the current ratio from the prior year to the current year.
    pub fn delta(&self) -> MetricValue {
        match (self.prior_ratio, self.current_ratio) {
            (MetricValue::Available(prior), MetricValue::Available(current)) => {
                MetricValue::Available(current - prior)
            }
            _ => MetricValue::NotAvailable,
        }
    }
}

/// Current assets over current liabilities; undefined for zero liabilities.
fn liquidity_ratio(assets: f64, liabilities: f64) -> MetricValue {
    if liabilities == 0.0 {
        MetricValue::NotAvailable
    } else {
        MetricValue::Available(assets / liabilities)
    }
}

pub struct LiquidityAnalyzer<'a> {
    locator: &'a LineLocator,
}

impl<'a> LiquidityAnalyzer<'a> {
    pub fn new(locator: &'a LineLocator) -> Self {
        Self { locator }
    }

    pub fn current_ratios(&self, rows: &[DerivedRow]) -> CurrentRatios {
        let assets = self.locator.find_first(StatementLine::CurrentAssets, rows);
        let liabilities = self
            .locator
            .find_first(StatementLine::CurrentLiabilities, rows);

        let (assets_row, liabilities_row) = match (assets, liabilities) {
            (Some(a), Some(l)) => (&rows[a], &rows[l]),
            _ => {
                let warnings: Vec<MissingIndicatorWarning> = [
                    (StatementLine::CurrentAssets, assets),
                    (StatementLine::CurrentLiabilities, liabilities),
                ]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(line, _)| MissingIndicatorWarning { line })
                .collect();

                for warning in &warnings {
                    warn!("{}", warning);
                }
                return CurrentRatios::not_available(warnings);
            }
        };

        let prior_ratio = liquidity_ratio(assets_row.prior_value, liabilities_row.prior_value);
        let current_ratio =
            liquidity_ratio(assets_row.current_value, liabilities_row.current_value);

        if !prior_ratio.is_available() || !current_ratio.is_available() {
            debug!(
                "Current liabilities are zero for at least one year ('{}'); ratio undefined",
                liabilities_row.label
            );
        }

        CurrentRatios {
            prior_ratio,
            current_ratio,
            current_asset_growth_pct: MetricValue::Available(assets_row.growth_pct),
            warnings: Vec::new(),
        }
    }
}
