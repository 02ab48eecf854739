//! OpenAPI Type Scanner - Command-line tool for generating OpenAPI component schemas.
//!
//! # Usage
//!
//! ```bash
//! openapi-type-scanner [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate schemas for every type in a project:
//! ```bash
//! openapi-type-scanner ./my-project -o schemas.yaml
//! ```
//!
//! Scan a single generic root as JSON:
//! ```bash
//! openapi-type-scanner ./my-project -r 'Page<User>' -f json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_type_scanner::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Type Scanner starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Schema generation completed successfully");

    Ok(())
}
