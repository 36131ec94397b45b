use crate::error::{AnalysisError, Result};
use crate::schema::DerivedRow;
use crate::utils::{format_percent, format_thousands};
use serde::{Deserialize, Serialize};

pub const TABLE_HEADERS: [&str; 6] = [
    "Line item",
    "Prior year",
    "Current year",
    "Growth (%)",
    "Prior share (%)",
    "Current share (%)",
];

/// The derived table as handed to a presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisTable {
    pub rows: Vec<DerivedRow>,
}

impl AnalysisTable {
    pub fn new(rows: Vec<DerivedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn formatted_cells<F: Fn(f64) -> String>(row: &DerivedRow, format_value: &F) -> [String; 6] {
        [
            row.label.clone(),
            format_value(row.prior_value),
            format_value(row.current_value),
            format_percent(row.growth_pct),
            format_percent(row.prior_share_pct),
            format_percent(row.current_share_pct),
        ]
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(TABLE_HEADERS)?;

        for row in &self.rows {
            writer.write_record([
                row.label.clone(),
                format!("{:.0}", row.prior_value),
                format!("{:.0}", row.current_value),
                format!("{:.2}", row.growth_pct),
                format!("{:.2}", row.prior_share_pct),
                format!("{:.2}", row.current_share_pct),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AnalysisError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            AnalysisError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Markdown for display: line values rounded with thousands separators.
    pub fn to_markdown(&self) -> String {
        self.to_markdown_with(format_thousands)
    }

    /// Markdown with line values rendered by `format_value`. Percent columns
    /// always carry two decimals.
    pub fn to_markdown_with<F: Fn(f64) -> String>(&self, format_value: F) -> String {
        let mut output = String::new();

        output.push_str(&format!("| {} |\n", TABLE_HEADERS.join(" | ")));
        output.push_str("|---|---:|---:|---:|---:|---:|\n");

        for row in &self.rows {
            let cells = Self::formatted_cells(row, &format_value);
            let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
            output.push_str(&format!("| {} |\n", escaped.join(" | ")));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CellStatus;

    fn table() -> AnalysisTable {
        AnalysisTable::new(vec![
            DerivedRow {
                label: "Cash | equivalents".to_string(),
                prior_value: 100_000.0,
                current_value: 150_000.0,
                prior_status: CellStatus::Numeric,
                current_status: CellStatus::Numeric,
                growth_pct: 50.0,
                prior_share_pct: 10.0,
                current_share_pct: 12.5,
            },
            DerivedRow {
                label: "Total assets, net".to_string(),
                prior_value: 1_000_000.0,
                current_value: 1_200_000.0,
                prior_status: CellStatus::Numeric,
                current_status: CellStatus::Numeric,
                growth_pct: 20.0,
                prior_share_pct: 100.0,
                current_share_pct: 100.0,
            },
        ])
    }

    #[test]
    fn test_to_markdown() {
        let markdown = table().to_markdown();
        assert!(markdown.starts_with("| Line item | Prior year | Current year |"));
        assert!(markdown.contains("| Cash \\| equivalents | 100,000 | 150,000 | 50.00% | 10.00% | 12.50% |"));
        assert!(markdown.contains("| Total assets, net | 1,000,000 | 1,200,000 | 20.00% | 100.00% | 100.00% |"));
        assert_eq!(markdown.lines().count(), 4);
    }

    #[test]
    fn test_to_markdown_with_raw_values() {
        let mut table = table();
        table.rows[0].prior_value = 0.4;
        table.rows[0].current_value = 12.25;

        let markdown = table.to_markdown_with(|v| v.to_string());
        assert!(markdown.contains("| Cash \\| equivalents | 0.4 | 12.25 | 50.00% |"));
        assert!(markdown.contains("| Total assets, net | 1000000 | 1200000 |"));
    }

    #[test]
    fn test_to_csv_quotes_labels() {
        let csv = table().to_csv().unwrap();
        assert!(csv.starts_with("Line item,Prior year,Current year,Growth (%)"));
        assert!(csv.contains("\"Total assets, net\",1000000,1200000,20.00,100.00,100.00"));
    }

    #[test]
    fn test_to_json() {
        let json = table().to_json().unwrap();
        assert!(json.contains("\"growth_pct\": 50.0"));
        let back: AnalysisTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table());
    }
}
