// ============================================================
// CSV WRITER
// ============================================================
// Serialize rows back to CSV text

use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

use crate::domain::csv::CsvRow;
use crate::domain::error::AppError;

/// Writes rows under a fixed header; undefined cells become empty.
///
/// Cells are emitted by position, so `row.fields[i]` lands under `headers[i]`
/// and repeated header names keep their own values. Records end with CRLF.
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to a string, header row first
    pub fn write_string(&self, headers: &[String], rows: &[CsvRow]) -> Result<String, AppError> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(headers)?;

        for row in rows {
            let record = (0..headers.len()).map(|i| {
                row.fields
                    .get(i)
                    .and_then(|field| field.value.as_deref())
                    .unwrap_or("")
            });
            writer.write_record(record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;

        debug!(rows = rows.len(), bytes = bytes.len(), "Serialized CSV");

        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV output is not UTF-8: {}", e)))
    }

    /// Write CSV text to disk
    pub fn write_file(path: &Path, content: &str) -> Result<(), AppError> {
        std::fs::write(path, content).map_err(|e| {
            AppError::IoError(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::CsvField;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_write_by_position() {
        let rows = vec![CsvRow::new(
            0,
            vec![CsvField::new("a", "1"), CsvField::new("b", "2")],
        )];

        let out = CsvWriter::new()
            .write_string(&headers(&["a", "b"]), &rows)
            .unwrap();
        assert_eq!(out, "a,b\r\n1,2\r\n");
    }

    #[test]
    fn test_repeated_header_keeps_each_value() {
        let rows = vec![CsvRow::new(
            0,
            vec![
                CsvField::new("Note", "first"),
                CsvField::new("Ship To - City", "Springfield"),
                CsvField::new("Note", "second"),
            ],
        )];

        let out = CsvWriter::new()
            .write_string(&headers(&["Note", "Ship To - City", "Note"]), &rows)
            .unwrap();
        assert_eq!(out, "Note,Ship To - City,Note\r\nfirst,Springfield,second\r\n");
    }

    #[test]
    fn test_missing_values_are_empty_cells() {
        let rows = vec![CsvRow::new(
            0,
            vec![CsvField::new("a", "1"), CsvField::missing("b")],
        )];

        let out = CsvWriter::new()
            .write_string(&headers(&["a", "b", "c"]), &rows)
            .unwrap();
        assert_eq!(out, "a,b,c\r\n1,,\r\n");
    }

    #[test]
    fn test_quotes_only_when_needed() {
        let rows = vec![CsvRow::new(
            0,
            vec![
                CsvField::new("addr", "1 Main St, Springfield"),
                CsvField::new("note", "say \"hi\""),
            ],
        )];

        let out = CsvWriter::new()
            .write_string(&headers(&["addr", "note"]), &rows)
            .unwrap();
        assert_eq!(
            out,
            "addr,note\r\n\"1 Main St, Springfield\",\"say \"\"hi\"\"\"\r\n"
        );
    }
}
