use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::liquidity::{CurrentRatios, LiquidityAnalyzer};
use crate::locator::LineLocator;
use crate::schema::{CellStatus, DerivedRow, LineItem, MultiplicityPolicy, StatementLine};
use crate::utils::{clamp_finite, coerce_cell, safe_divide, Coerced};
use log::{debug, info, warn};

/// Turns raw statement lines into growth rates, asset-composition shares
/// and liquidity indicators. Stateless between calls.
pub struct DerivationEngine {
    epsilon: f64,
    total_assets_policy: MultiplicityPolicy,
    locator: LineLocator,
}

// Coerced working copy of one input row
struct WorkingRow<'a> {
    label: &'a str,
    prior: Coerced,
    current: Coerced,
}

impl DerivationEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            epsilon: config.division_epsilon,
            total_assets_policy: config.total_assets_policy,
            locator: LineLocator::new(&config.labels),
        }
    }

    pub fn derive_growth_and_composition(&self, rows: &[LineItem]) -> Result<Vec<DerivedRow>> {
        if rows.is_empty() {
            return Err(AnalysisError::EmptyStatement);
        }

        info!("Deriving growth and composition for {} line items", rows.len());

        // Coercion runs over the whole table before any division.
        let working: Vec<WorkingRow> = rows
            .iter()
            .map(|item| WorkingRow {
                label: &item.label,
                prior: coerce_cell(&item.prior),
                current: coerce_cell(&item.current),
            })
            .collect();

        self.report_unparseable(&working);

        let total_idx = self.resolve_total_assets(rows)?;
        let total_prior = working[total_idx].prior.value;
        let total_current = working[total_idx].current.value;
        debug!(
            "Total assets row '{}': prior={}, current={}",
            working[total_idx].label, total_prior, total_current
        );

        let percent = |num: f64, den: f64| clamp_finite(safe_divide(num, den, self.epsilon) * 100.0);

        let derived = working
            .iter()
            .map(|row| {
                let prior = row.prior.value;
                let current = row.current.value;
                DerivedRow {
                    label: row.label.to_string(),
                    prior_value: prior,
                    current_value: current,
                    prior_status: row.prior.status,
                    current_status: row.current.status,
                    growth_pct: percent(current - prior, prior),
                    prior_share_pct: percent(prior, total_prior),
                    current_share_pct: percent(current, total_current),
                }
            })
            .collect();

        Ok(derived)
    }

    pub fn compute_current_ratios(&self, rows: &[DerivedRow]) -> CurrentRatios {
        LiquidityAnalyzer::new(&self.locator).current_ratios(rows)
    }

    fn resolve_total_assets(&self, rows: &[LineItem]) -> Result<usize> {
        let matches = self.locator.find_all(StatementLine::TotalAssets, rows);

        match matches.as_slice() {
            [] => Err(AnalysisError::TotalAssetsNotFound),
            [only] => Ok(*only),
            [first, ..] => match self.total_assets_policy {
                MultiplicityPolicy::Strict => Err(AnalysisError::AmbiguousLineItem {
                    line: StatementLine::TotalAssets,
                    matches: matches.len(),
                }),
                MultiplicityPolicy::FirstMatch => {
                    warn!(
                        "{} rows match the total-assets label; using '{}'",
                        matches.len(),
                        rows[*first].label
                    );
                    Ok(*first)
                }
            },
        }
    }

    fn report_unparseable(&self, working: &[WorkingRow]) {
        let unparseable = working
            .iter()
            .flat_map(|row| [row.prior.status, row.current.status])
            .filter(|status| *status == CellStatus::Unparseable)
            .count();

        if unparseable > 0 {
            warn!(
                "{} value cells could not be read as numbers and were treated as 0",
                unparseable
            );
        }
    }
}

impl Default for DerivationEngine {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CellValue, MetricValue};

    fn sample_statement() -> Vec<LineItem> {
        vec![
            LineItem::new("A. CURRENT ASSETS", 400.0, 500.0),
            LineItem::new("Cash", 100.0, 150.0),
            LineItem::new("Inventory", 0.0, 50.0),
            LineItem::new("B. Non-current assets", 600.0, 500.0),
            LineItem::new("TOTAL ASSETS", 1000.0, 1000.0),
            LineItem::new("C. CURRENT LIABILITIES", 200.0, 250.0),
        ]
    }

    #[test]
    fn test_growth_and_shares() {
        let engine = DerivationEngine::default();
        let derived = engine
            .derive_growth_and_composition(&sample_statement())
            .unwrap();

        assert_eq!(derived.len(), 6);

        let cash = &derived[1];
        assert!((cash.growth_pct - 50.0).abs() < 1e-9);
        assert!((cash.prior_share_pct - 10.0).abs() < 1e-9);
        assert!((cash.current_share_pct - 15.0).abs() < 1e-9);

        let total = &derived[4];
        assert!((total.current_share_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_prior_growth_uses_epsilon() {
        let engine = DerivationEngine::default();
        let derived = engine
            .derive_growth_and_composition(&sample_statement())
            .unwrap();

        let inventory = &derived[2];
        assert!(inventory.growth_pct.is_finite());
        assert_eq!(inventory.growth_pct, 50.0 / 1e-9 * 100.0);
    }

    #[test]
    fn test_zero_total_assets_is_guarded() {
        let rows = vec![
            LineItem::new("Cash", 10.0, 0.0),
            LineItem::new("Total assets", 0.0, 0.0),
        ];
        let derived = DerivationEngine::default()
            .derive_growth_and_composition(&rows)
            .unwrap();

        assert_eq!(derived[0].prior_share_pct, 10.0 / 1e-9 * 100.0);
        assert_eq!(derived[0].current_share_pct, 0.0);
        assert!(derived.iter().all(|r| !r.current_share_pct.is_nan()));
    }

    #[test]
    fn test_overflowing_growth_saturates() {
        let rows = vec![
            LineItem::new("Goodwill", 0.0, 1e300),
            LineItem::new("TOTAL ASSETS", 1e300, 1e300),
        ];
        let derived = DerivationEngine::default()
            .derive_growth_and_composition(&rows)
            .unwrap();

        assert_eq!(derived[0].growth_pct, f64::MAX);
        assert!(derived
            .iter()
            .flat_map(|r| [r.growth_pct, r.prior_share_pct, r.current_share_pct])
            .all(f64::is_finite));

        let json = serde_json::to_string(&derived).unwrap();
        let back: Vec<DerivedRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, derived);
    }

    #[test]
    fn test_missing_total_assets() {
        let rows = vec![LineItem::new("Cash", 1.0, 2.0)];
        let result = DerivationEngine::default().derive_growth_and_composition(&rows);
        assert!(matches!(result, Err(AnalysisError::TotalAssetsNotFound)));
    }

    #[test]
    fn test_empty_statement() {
        let result = DerivationEngine::default().derive_growth_and_composition(&[]);
        assert!(matches!(result, Err(AnalysisError::EmptyStatement)));
    }

    #[test]
    fn test_multiple_total_assets_policy() {
        let rows = vec![
            LineItem::new("Total assets (restated)", 500.0, 500.0),
            LineItem::new("Cash", 50.0, 100.0),
            LineItem::new("TOTAL ASSETS", 1000.0, 1000.0),
        ];

        let derived = DerivationEngine::default()
            .derive_growth_and_composition(&rows)
            .unwrap();
        assert!((derived[1].prior_share_pct - 10.0).abs() < 1e-9);

        let strict = AnalysisConfig {
            total_assets_policy: MultiplicityPolicy::Strict,
            ..AnalysisConfig::default()
        };
        let result = DerivationEngine::new(&strict).derive_growth_and_composition(&rows);
        assert!(matches!(
            result,
            Err(AnalysisError::AmbiguousLineItem { matches: 2, .. })
        ));
    }

    #[test]
    fn test_coercion_happens_before_division() {
        let rows = vec![
            LineItem {
                label: "Receivables".to_string(),
                prior: CellValue::Text("abc".to_string()),
                current: CellValue::Text(" 250 ".to_string()),
            },
            LineItem {
                label: "TOTAL ASSETS".to_string(),
                prior: CellValue::Empty,
                current: CellValue::Number(1000.0),
            },
        ];

        let derived = DerivationEngine::default()
            .derive_growth_and_composition(&rows)
            .unwrap();

        assert_eq!(derived[0].prior_value, 0.0);
        assert_eq!(derived[0].prior_status, CellStatus::Unparseable);
        assert_eq!(derived[0].current_status, CellStatus::Numeric);
        assert!((derived[0].current_share_pct - 25.0).abs() < 1e-9);
        assert_eq!(derived[1].prior_status, CellStatus::Blank);
        assert!(derived.iter().all(|r| r.growth_pct.is_finite()));
    }

    #[test]
    fn test_current_ratios_through_engine() {
        let engine = DerivationEngine::default();
        let derived = engine
            .derive_growth_and_composition(&sample_statement())
            .unwrap();
        let ratios = engine.compute_current_ratios(&derived);

        assert_eq!(ratios.prior_ratio, MetricValue::Available(2.0));
        assert_eq!(ratios.current_ratio, MetricValue::Available(2.0));
        assert_eq!(ratios.current_asset_growth_pct, MetricValue::Available(25.0));
    }
}
