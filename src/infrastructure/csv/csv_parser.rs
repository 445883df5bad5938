// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files with encoding detection and error handling

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::domain::csv::{CsvField, CsvRow, CsvTable};
use crate::domain::error::AppError;

/// CSV parser with header-row semantics
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a CSV file and return rows
    pub fn parse_file(&self, path: &Path) -> Result<CsvTable, AppError> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_bytes(&bytes)
    }

    /// Parse raw upload bytes, decoding them first
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<CsvTable, AppError> {
        let content = decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<CsvTable, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(AppError::ParseError("CSV has no header row".to_string()));
        }

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            rows.push(Self::parse_row(index, &headers, &record));
        }

        debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV");

        Ok(CsvTable {
            headers: headers.iter().map(str::to_string).collect(),
            rows,
        })
    }

    /// Short records leave trailing columns undefined; surplus cells are dropped
    fn parse_row(index: usize, headers: &StringRecord, record: &StringRecord) -> CsvRow {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| match record.get(idx) {
                Some(value) => CsvField::new(header, value),
                None => CsvField::missing(header),
            })
            .collect();

        CsvRow::new(index, fields)
    }
}

/// UTF-8 (BOM stripped) when valid, Windows-1252 otherwise
fn decode(bytes: &[u8]) -> String {
    let (content, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return content.into_owned();
    }

    debug!("Input is not valid UTF-8, decoding as Windows-1252");
    let (content, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    content.into_owned()
}
