//! acton-modules CLI tool

use acton_modules::observability;
use acton_modules_cli::Cli;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = observability::init(cli.verbose) {
        eprintln!("Failed to initialise logging: {e}");
    }

    cli.run()
}
