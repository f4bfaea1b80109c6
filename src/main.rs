//! # Datamorph Command-Line Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize tracing (stderr + optional rolling file)
//!   └─> Execute the subcommand
//! ```
//!
//! ```bash
//! datamorph list --config pipelines.yaml
//! datamorph show --config pipelines.yaml --pipeline food_discount
//! datamorph run --config pipelines.yaml --pipeline food_discount \
//!     --input items.csv --output discounted.parquet
//! ```
//!
//! Set `RUST_LOG=debug` to see every applied step.

#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    datamorph::logging::init(!cli.no_log_file)?;

    cli::run_command(cli.command).inspect_err(|err| {
        tracing::error!("{err:#}");
    })
}
