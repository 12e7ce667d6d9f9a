//! requirecat CLI entry point

use clap::Parser;
use requirecat_indexer::{DEFAULT_OUTPUT, validate_output_path};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "requirecat")]
#[command(version)]
#[command(about = "Concatenate a directory of files in the order their `require` statements dictate", long_about = None)]
struct Cli {
    /// Root directory to scan; `require` paths are resolved against it
    root: PathBuf,

    /// Quiet mode: only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Output file, relative to the root directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_parser = validate_output_path)]
    output: PathBuf,

    /// Print a JSON summary to stdout on success
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("requirecat={}", log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    let options = commands::RunOptions {
        root: cli.root,
        output: cli.output,
        json: cli.json,
    };

    match commands::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}, aborting", e);
            ExitCode::FAILURE
        }
    }
}
