//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `link_health` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Mapping the probe verdict to the process exit code
//!
//! All core functionality is implemented in the library crate.

use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use link_health::config::MISSING_URL_MESSAGE;
use link_health::initialization::init_logger_with;
use link_health::{ConfigError, ConsoleReporter, Opt, ProbeConfig, Prober, ReqwestClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env, mainly for RUST_LOG
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = match ProbeConfig::from_opt(&opt) {
        Ok(config) => config,
        Err(ConfigError::MissingUrl) => {
            println!("{MISSING_URL_MESSAGE}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("link_health error: {e}");
            process::exit(1);
        }
    };

    let client = ReqwestClient::new(&config).context("Failed to initialize HTTP client")?;

    let mut reporter = ConsoleReporter::new(io::stdout().lock());
    let report = Prober::new(&config, &client).run(&mut reporter).await;

    process::exit(report.exit_code());
}
