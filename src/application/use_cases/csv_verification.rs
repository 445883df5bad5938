// ============================================================
// CSV VERIFICATION USE CASE
// ============================================================
// Parse -> build address strings -> verify batch -> zip -> serialize

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::application::use_cases::address_verification::AddressVerificationUseCase;
use crate::domain::csv::{
    build_address_strings, CsvRow, CsvTable, VerifiedCsv, OUTPUT_FILE_NAME,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{CsvParser, CsvWriter};

pub struct CsvVerificationUseCase {
    verifier: Arc<AddressVerificationUseCase>,
    parser: CsvParser,
    writer: CsvWriter,
}

impl CsvVerificationUseCase {
    pub fn new(verifier: Arc<AddressVerificationUseCase>) -> Self {
        Self {
            verifier,
            parser: CsvParser::new(),
            writer: CsvWriter::new(),
        }
    }

    /// Verify an uploaded CSV body.
    ///
    /// Any failure, whatever its cause, is logged and returned as
    /// `AppError::ProcessingFailed`; no partial output is produced.
    pub async fn process_bytes(&self, bytes: &[u8]) -> Result<VerifiedCsv> {
        let span = info_span!("csv_verification", run_id = %Uuid::new_v4());

        async {
            self.run(bytes).await.map_err(|err| {
                error!(error = %err, "CSV verification failed");
                err.into_user_facing()
            })
        }
        .instrument(span)
        .await
    }

    /// Verify `input` and write the result to `output`. Nothing is written on failure.
    pub async fn process_file(&self, input: &Path, output: &Path) -> Result<VerifiedCsv> {
        let bytes = std::fs::read(input).map_err(|e| {
            error!(error = %e, path = %input.display(), "Failed to read input file");
            AppError::ProcessingFailed
        })?;

        let verified = self.process_bytes(&bytes).await?;

        CsvWriter::write_file(output, &verified.content).map_err(|e| {
            error!(error = %e, path = %output.display(), "Failed to write output file");
            AppError::ProcessingFailed
        })?;

        info!(path = %output.display(), rows = verified.row_count, "Verified CSV written");

        Ok(verified)
    }

    async fn run(&self, bytes: &[u8]) -> Result<VerifiedCsv> {
        let start = Instant::now();

        let table = self.parser.parse_bytes(bytes)?;
        let addresses = build_address_strings(&table.rows);

        let verified = self.verifier.verify_address_batch(&addresses).await?;
        let verified_count = verified.len();

        let headers = table.output_headers();
        let CsvTable { rows, .. } = table;
        let rows = attach_verified(rows, verified);

        let content = self.writer.write_string(&headers, &rows)?;

        info!(
            rows = rows.len(),
            verified = verified_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "CSV verification complete"
        );

        Ok(VerifiedCsv {
            content,
            file_name: OUTPUT_FILE_NAME.to_string(),
            row_count: rows.len(),
            verified_count,
        })
    }
}

/// Row `i` gets line `i`; rows past the end of `verified` get `None`.
pub fn attach_verified(rows: Vec<CsvRow>, verified: Vec<String>) -> Vec<CsvRow> {
    let mut verified = verified.into_iter();
    rows.into_iter()
        .map(|row| row.with_verified_address(verified.next()))
        .collect()
}
