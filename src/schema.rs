use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw spreadsheet cell as handed over by the spreadsheet source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    #[schemars(description = "A numeric cell")]
    Number(f64),

    #[schemars(description = "A text cell; parsed as a number when possible, otherwise treated as zero")]
    Text(String),

    #[schemars(description = "A blank cell (treated as zero)")]
    Empty,
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

/// One statement line: label plus prior-period and current-period values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LineItem {
    #[schemars(description = "Accounting line description, e.g. 'TOTAL ASSETS'")]
    pub label: String,
    #[schemars(description = "Prior-period value (previous year)")]
    pub prior: CellValue,
    #[schemars(description = "Current-period value (current year)")]
    pub current: CellValue,
}

impl LineItem {
    pub fn new(
        label: impl Into<String>,
        prior: impl Into<CellValue>,
        current: impl Into<CellValue>,
    ) -> Self {
        Self {
            label: label.into(),
            prior: prior.into(),
            current: current.into(),
        }
    }
}

/// How a raw cell became a number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum CellStatus {
    /// The cell held a usable number.
    Numeric,
    /// The cell was empty; the value is zero.
    Blank,
    /// The cell could not be read as a number; the value is zero.
    Unparseable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedRow {
    pub label: String,
    pub prior_value: f64,
    pub current_value: f64,
    pub prior_status: CellStatus,
    pub current_status: CellStatus,
    /// (current - prior) / prior * 100, zero prior guarded by the division epsilon.
    /// Always finite: overflow saturates at `f64::MAX` so the row stays valid JSON.
    pub growth_pct: f64,
    /// Share of prior-year total assets
    pub prior_share_pct: f64,
    /// Share of current-year total assets
    pub current_share_pct: f64,
}

/// A scalar indicator that may be economically undefined or unmeasurable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MetricValue {
    Available(f64),
    NotAvailable,
}

impl MetricValue {
    pub fn as_option(&self) -> Option<f64> {
        match self {
            MetricValue::Available(v) => Some(*v),
            MetricValue::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricValue::Available(_))
    }

    /// Two decimals followed by `suffix`, or `placeholder` when not available.
    pub fn format_with(&self, suffix: &str, placeholder: &str) -> String {
        match self {
            MetricValue::Available(v) => format!("{:.2}{}", v, suffix),
            MetricValue::NotAvailable => placeholder.to_string(),
        }
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Available)
    }
}

/// Canonical statement lines the engine needs to locate by label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum StatementLine {
    TotalAssets,
    CurrentAssets,
    CurrentLiabilities,
}

impl StatementLine {
    pub const ALL: [StatementLine; 3] = [
        StatementLine::TotalAssets,
        StatementLine::CurrentAssets,
        StatementLine::CurrentLiabilities,
    ];
}

impl fmt::Display for StatementLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementLine::TotalAssets => "Total assets",
            StatementLine::CurrentAssets => "Current assets",
            StatementLine::CurrentLiabilities => "Current liabilities",
        };
        f.write_str(name)
    }
}

/// What to do when more than one row matches the total-assets label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum MultiplicityPolicy {
    #[default]
    #[schemars(description = "Use the first matching row and log a warning")]
    FirstMatch,

    #[schemars(description = "Reject the statement when more than one row matches")]
    Strict,
}
