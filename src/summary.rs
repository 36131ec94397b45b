use crate::error::Result;
use crate::liquidity::CurrentRatios;
use crate::report::AnalysisTable;
use crate::schema::DerivedRow;
use serde::{Deserialize, Serialize};

pub const FULL_TABLE_ENTRY: &str = "Full analysis table";
pub const CURRENT_ASSET_GROWTH_ENTRY: &str = "Current asset growth (%)";
pub const PRIOR_RATIO_ENTRY: &str = "Current ratio (prior year)";
pub const CURRENT_RATIO_ENTRY: &str = "Current ratio (current year)";

const RATIO_SUFFIX: &str = "x";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryEntry {
    pub indicator: String,
    pub value: String,
}

impl SummaryEntry {
    fn new(indicator: &str, value: String) -> Self {
        Self {
            indicator: indicator.to_string(),
            value,
        }
    }
}

/// Plain-text context for the narrative assistant.
///
/// Always four entries, in order: the full derived table, current-asset growth,
/// the prior-year current ratio and the current-year current ratio. Unavailable
/// values carry the placeholder text, never an empty slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrativeSummary {
    pub entries: Vec<SummaryEntry>,
}

impl NarrativeSummary {
    pub fn build(rows: &[DerivedRow], ratios: &CurrentRatios, placeholder: &str) -> Self {
        // Raw line values; rounding is for display only.
        let table = AnalysisTable::new(rows.to_vec()).to_markdown_with(|v| v.to_string());

        let entries = vec![
            SummaryEntry::new(FULL_TABLE_ENTRY, table),
            SummaryEntry::new(
                CURRENT_ASSET_GROWTH_ENTRY,
                ratios.current_asset_growth_pct.format_with("%", placeholder),
            ),
            SummaryEntry::new(
                PRIOR_RATIO_ENTRY,
                ratios.prior_ratio.format_with(RATIO_SUFFIX, placeholder),
            ),
            SummaryEntry::new(
                CURRENT_RATIO_ENTRY,
                ratios.current_ratio.format_with(RATIO_SUFFIX, placeholder),
            ),
        ];

        Self { entries }
    }

    pub fn get(&self, indicator: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.indicator == indicator)
            .map(|e| e.value.as_str())
    }

    /// Markdown rendering: the table as its own section, then the scalar indicators.
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        if let Some((table, indicators)) = self.entries.split_first() {
            output.push_str(&format!("## {}\n\n{}\n", table.indicator, table.value));

            output.push_str("## Key indicators\n\n");
            output.push_str("| Indicator | Value |\n|---|---:|\n");
            for entry in indicators {
                output.push_str(&format!("| {} | {} |\n", entry.indicator, entry.value));
            }
        }

        output
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
