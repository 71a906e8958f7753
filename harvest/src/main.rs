use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::error;

use harvest::cli::{self, Cli};
use harvest::collectors;
use harvest::logging::{self, LogFormat};
use harvest_pipeline::list_collectors;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    logging::init(LogFormat::from_env());

    let cli = Cli::parse();

    collectors::register_builtin();
    let registry = list_collectors();

    match cli::run(cli, registry).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Harvest failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
