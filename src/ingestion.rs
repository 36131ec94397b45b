use crate::error::{AnalysisError, Result};
use crate::schema::{CellValue, LineItem};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Fields per record: label, prior-period value, current-period value.
pub const STATEMENT_COLUMNS: usize = 3;

/// Ordered statement lines as delivered by the spreadsheet source.
///
/// Columns are positional; header names are never inspected, so a sheet headed
/// "Chỉ tiêu | Năm trước | Năm sau" reads the same as "Item | 2023 | 2024".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    pub items: Vec<LineItem>,
}

impl StatementTable {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Builds the table from positional records of raw cells.
    pub fn from_records<R>(records: R) -> Result<Self>
    where
        R: IntoIterator<Item = Vec<CellValue>>,
    {
        let mut items = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            let found = record.len();
            let [label, prior, current]: [CellValue; STATEMENT_COLUMNS] =
                record
                    .try_into()
                    .map_err(|_| AnalysisError::ColumnCountMismatch {
                        row: idx + 1,
                        expected: STATEMENT_COLUMNS,
                        found,
                    })?;

            items.push(LineItem {
                label: label_text(label),
                prior,
                current,
            });
        }

        if items.is_empty() {
            return Err(AnalysisError::EmptyStatement);
        }

        Ok(Self::new(items))
    }

    /// Reads a CSV export of the statement sheet. The first line is a header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            records.push(record.iter().map(CellValue::from).collect::<Vec<_>>());
        }

        debug!("Read {} statement records from CSV", records.len());
        Self::from_records(records)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn label_text(cell: CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.trim().to_string(),
        CellValue::Number(v) => v.to_string(),
        CellValue::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_reader_ignores_header_names() {
        let csv = "Chỉ tiêu,Năm trước,Năm sau\n\
                   TÀI SẢN NGẮN HẠN,\"400\",500\n\
                   Tiền,,abc\n\
                   \n\
                   TỔNG CỘNG TÀI SẢN,1000,1200\n";

        let table = StatementTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.items[0].label, "TÀI SẢN NGẮN HẠN");
        assert_eq!(table.items[0].prior, CellValue::Text("400".to_string()));
        assert_eq!(table.items[1].prior, CellValue::Empty);
        assert_eq!(table.items[1].current, CellValue::Text("abc".to_string()));
        assert_eq!(table.items[2].label, "TỔNG CỘNG TÀI SẢN");
    }

    #[test]
    fn test_wrong_column_count() {
        let csv = "Item,Prior,Current\nCash,1,2\nInventory,3\n";
        let result = StatementTable::from_csv_reader(csv.as_bytes());
        assert!(matches!(
            result,
            Err(AnalysisError::ColumnCountMismatch {
                row: 2,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_header_only_is_empty_statement() {
        let result = StatementTable::from_csv_reader("Item,Prior,Current\n".as_bytes());
        assert!(matches!(result, Err(AnalysisError::EmptyStatement)));
    }

    #[test]
    fn test_from_records_numeric_label() {
        let table = StatementTable::from_records(vec![vec![
            CellValue::Number(110.0),
            CellValue::Number(1.0),
            CellValue::Number(2.0),
        ]])
        .unwrap();
        assert_eq!(table.items[0].label, "110");
    }
}
