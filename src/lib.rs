pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::application::AddressVerificationUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::{LLMClient, OpenAIClient};
use crate::interfaces::cli::{self, CliArgs};

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_verifier(config: &AppConfig) -> Result<Arc<AddressVerificationUseCase>> {
    let llm_client: Arc<dyn LLMClient + Send + Sync> =
        Arc::new(OpenAIClient::new(config.request_timeout())?);

    Ok(Arc::new(AddressVerificationUseCase::new(
        llm_client,
        config.single_llm_config(),
        config.batch_llm_config(),
    )))
}

pub fn run() -> ExitCode {
    let args = CliArgs::parse();

    dotenvy::dotenv().ok();
    init_tracing(args.debug);

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = actix_web::rt::System::new().block_on(async move {
        let verifier = build_verifier(&config)?;
        cli::execute(args.command, &config, verifier).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
