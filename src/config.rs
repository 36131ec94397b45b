use crate::error::{AnalysisError, Result};
use crate::schema::{MultiplicityPolicy, StatementLine};
use crate::utils::{fold_label, DIVISION_EPSILON};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Label aliases used to locate the canonical statement lines.
///
/// Every alias is matched as a case- and accent-insensitive substring of the row label,
/// so "CURRENT ASSETS" also hits "Non-current assets". Lookups take the first matching
/// row; statements that list non-current assets first need a more specific alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct LabelDictionary {
    #[schemars(description = "Aliases for the total-assets line, e.g. 'TOTAL ASSETS'")]
    pub total_assets: Vec<String>,

    #[schemars(description = "Aliases for the current-assets line, e.g. 'CURRENT ASSETS'")]
    pub current_assets: Vec<String>,

    #[schemars(description = "Aliases for the current-liabilities line, e.g. 'CURRENT LIABILITIES'")]
    pub current_liabilities: Vec<String>,
}

impl Default for LabelDictionary {
    fn default() -> Self {
        Self {
            total_assets: vec!["TOTAL ASSETS".to_string(), "TỔNG CỘNG TÀI SẢN".to_string()],
            current_assets: vec!["CURRENT ASSETS".to_string(), "TÀI SẢN NGẮN HẠN".to_string()],
            current_liabilities: vec![
                "CURRENT LIABILITIES".to_string(),
                "NỢ NGẮN HẠN".to_string(),
            ],
        }
    }
}

impl LabelDictionary {
    pub fn aliases(&self, line: StatementLine) -> &[String] {
        match line {
            StatementLine::TotalAssets => &self.total_assets,
            StatementLine::CurrentAssets => &self.current_assets,
            StatementLine::CurrentLiabilities => &self.current_liabilities,
        }
    }

    pub fn aliases_mut(&mut self, line: StatementLine) -> &mut Vec<String> {
        match line {
            StatementLine::TotalAssets => &mut self.total_assets,
            StatementLine::CurrentAssets => &mut self.current_assets,
            StatementLine::CurrentLiabilities => &mut self.current_liabilities,
        }
    }

    /// Adds an alias for `line`; duplicates (after folding) are ignored.
    pub fn with_alias(mut self, line: StatementLine, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let folded = fold_label(&alias);
        let list = self.aliases_mut(line);
        if !list.iter().any(|a| fold_label(a) == folded) {
            list.push(alias);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    #[schemars(description = "Stand-in for an exact-zero denominator in growth and share computations")]
    pub division_epsilon: f64,

    #[schemars(description = "Behaviour when several rows match the total-assets label")]
    pub total_assets_policy: MultiplicityPolicy,

    #[schemars(description = "Label aliases for the canonical statement lines")]
    pub labels: LabelDictionary,

    #[schemars(description = "Text rendered in place of an unavailable indicator")]
    pub placeholder: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            division_epsilon: DIVISION_EPSILON,
            total_assets_policy: MultiplicityPolicy::FirstMatch,
            labels: LabelDictionary::default(),
            placeholder: "N/A".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading analysis config from {}", path.as_ref().display());
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.division_epsilon.is_finite() || self.division_epsilon <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "division_epsilon must be a positive finite number, got {}",
                self.division_epsilon
            )));
        }

        for line in StatementLine::ALL {
            let aliases = self.labels.aliases(line);
            if aliases.iter().all(|a| fold_label(a).is_empty()) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "no usable label alias for '{}'",
                    line
                )));
            }
        }

        if self.placeholder.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "placeholder must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// JSON Schema of [`AnalysisConfig`], for tooling that edits config files.
pub fn config_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(AnalysisConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
