use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::application::{AddressVerificationUseCase, CsvVerificationUseCase};
use crate::domain::csv::OUTPUT_FILE_NAME;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{start_server, HttpState};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "address-verifier",
    about = "Verify and correct shipping addresses in a CSV"
)]
pub struct CliArgs {
    /// TOML configuration file (defaults to ./address-verifier.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Verify every row of a CSV and write the result with a "Verified Address" column
    Verify {
        /// Input CSV file
        input: PathBuf,

        /// Where to write the verified CSV
        #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
        output: PathBuf,
    },

    /// Verify a single address and print the corrected form
    VerifyAddress {
        address: String,
    },

    /// Serve the upload API over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

/// Only `.csv` files are taken as input
pub fn ensure_csv_path(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Only CSV files are accepted: {}",
            path.display()
        )))
    }
}

pub async fn execute(
    command: Command,
    config: &AppConfig,
    verifier: Arc<AddressVerificationUseCase>,
) -> Result<()> {
    match command {
        Command::Verify { input, output } => {
            ensure_csv_path(&input)?;
            let use_case = CsvVerificationUseCase::new(verifier);
            let verified = use_case.process_file(&input, &output).await?;
            println!(
                "Wrote {} rows to {}",
                verified.row_count,
                output.display()
            );
            Ok(())
        }
        Command::VerifyAddress { address } => {
            let verified = verifier.verify_address(&address).await?;
            println!("{}", verified);
            Ok(())
        }
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let csv_use_case = Arc::new(CsvVerificationUseCase::new(verifier.clone()));

            info!(host = %host, port, "Starting HTTP server");
            let server = start_server(HttpState::new(csv_use_case, verifier), &host, port)
                .map_err(|e| {
                    error!(error = %e, "Failed to start HTTP server");
                    AppError::from(e)
                })?;
            server.await.map_err(AppError::from)
        }
    }
}
