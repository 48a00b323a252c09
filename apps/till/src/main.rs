//! # Till Entry Point
//!
//! Parses arguments, loads configuration and hands off to [`till::run`].
//! A failed command is printed as an error notice and exits with status 1.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use till::cli::Cli;
use till::notice::Notice;
use till::state::config::TillConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    till::init_tracing();

    let config = TillConfig::load(cli.config.clone(), &cli.overrides())
        .context("Failed to load configuration")?;

    let json = cli.json;
    match till::run(cli, config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            if json {
                let body = serde_json::to_string_pretty(&err).context("Failed to encode error")?;
                eprintln!("{}", body);
            } else {
                eprintln!("{}", till::render::notice(&Notice::from(&err)));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
