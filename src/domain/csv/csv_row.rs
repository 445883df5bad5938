// ============================================================
// CSV ROW TYPES
// ============================================================
// Data structures representing parsed CSV content

use serde::{Deserialize, Serialize};

/// Column added to every row after verification
pub const VERIFIED_ADDRESS_COLUMN: &str = "Verified Address";

/// A single field in a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvField {
    /// Field name (header)
    pub name: String,

    /// Field value, `None` when the row never had it (the "undefined" cell)
    pub value: Option<String>,
}

impl CsvField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A single record, fields kept in header order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    /// All fields in this row
    pub fields: Vec<CsvField>,
}

impl CsvRow {
    pub fn new(index: usize, fields: Vec<CsvField>) -> Self {
        Self { index, fields }
    }

    /// Value of a column; `None` if the column is absent or undefined
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
    }

    /// Set a column, replacing it in place if it exists, appending otherwise
    pub fn set(&mut self, name: &str, value: Option<String>) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(CsvField {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Attach the verification result for this row
    pub fn with_verified_address(mut self, verified: Option<String>) -> Self {
        self.set(VERIFIED_ADDRESS_COLUMN, verified);
        self
    }
}

/// Parsed file: header row plus records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// Header row of the verified output
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        if !headers.iter().any(|h| h == VERIFIED_ADDRESS_COLUMN) {
            headers.push(VERIFIED_ADDRESS_COLUMN.to_string());
        }
        headers
    }
}

/// Output of one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedCsv {
    /// Serialized CSV text
    pub content: String,

    /// Name the output is delivered under
    pub file_name: String,

    /// Number of data rows written
    pub row_count: usize,

    /// Number of lines the verification endpoint returned
    pub verified_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_and_empty() {
        let row = CsvRow::new(
            0,
            vec![
                CsvField::new("Order", "1001"),
                CsvField::new("Ship To - City", ""),
                CsvField::missing("Ship To - State"),
            ],
        );

        assert_eq!(row.get("Order"), Some("1001"));
        assert_eq!(row.get("Ship To - City"), Some(""));
        assert_eq!(row.get("Ship To - State"), None);
        assert_eq!(row.get("Nope"), None);
        assert_eq!(row.fields[1].value.as_deref(), Some(""));
    }

    #[test]
    fn test_verified_address_appended_once() {
        let row = CsvRow::new(0, vec![CsvField::new("Order", "1001")])
            .with_verified_address(Some("first".to_string()))
            .with_verified_address(Some("second".to_string()));

        let names: Vec<_> = row.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Order", VERIFIED_ADDRESS_COLUMN]);
        assert_eq!(row.get(VERIFIED_ADDRESS_COLUMN), Some("second"));
    }

    #[test]
    fn test_output_headers_no_duplicate_column() {
        let table = CsvTable {
            headers: vec!["Order".to_string(), VERIFIED_ADDRESS_COLUMN.to_string()],
            rows: Vec::new(),
        };
        assert_eq!(table.output_headers().len(), 2);

        let table = CsvTable {
            headers: vec!["Order".to_string()],
            rows: Vec::new(),
        };
        assert_eq!(table.output_headers(), vec!["Order", VERIFIED_ADDRESS_COLUMN]);
    }
}
