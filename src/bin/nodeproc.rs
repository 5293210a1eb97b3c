//! Nodeproc CLI Binary
//!
//! Single scheduled run: exits 0 when processing completed, 1 otherwise.

use anyhow::Context;
use clap::Parser;
use nodeproc::tooling::cli::{format_summary, Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.config.clone(), &cli.logging_overrides())
        .with_context(|| format!("initializing {}", cli.config.display()))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let summary = context.execute(cli.force);
    match format_summary(&summary, &cli.format) {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("Error: {}", e),
    }
    process::exit(context.exit_code(&summary));
}
