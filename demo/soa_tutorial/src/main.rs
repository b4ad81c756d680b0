//! SoA Tutorial
//!
//! Command-line walk-through of a structure-of-arrays particle block.

use anyhow::Context;
use clap::Parser;
use soa_tutorial::config::{build_config, CliArgs as ConfigCliArgs};
use soa_tutorial::runtime::RuntimeScope;
use soa_tutorial::tutorial;
use std::path::PathBuf;

/// SoA Tutorial - fill and report a structure-of-arrays particle block
#[derive(Parser, Debug)]
#[command(name = "soa_tutorial")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SOA_TUTORIAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Tuples per block (8, 16, 32, 64)
    #[arg(short = 'n', long)]
    vector_length: Option<usize>,

    /// Output format (table, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    threads: Option<usize>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            log_level: args.log_level,
            vector_length: args.vector_length,
            format: args.format,
            threads: args.threads,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args).context("Failed to load configuration")?;

    let scope = RuntimeScope::acquire(&config)?;

    tracing::info!("SoA Tutorial v{}", soa_tutorial::VERSION);
    tracing::info!(
        log_level = %config.log_level,
        vector_length = config.vector_length,
        format = %config.format,
        threads = scope.threads(),
        "Tutorial configuration loaded"
    );

    let output = tutorial::run(&config, &scope)?;
    println!("{}", output);

    Ok(())
}
