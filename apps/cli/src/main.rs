//! pharmacorpus CLI: builds pharmaceutical synonym corpora from spreadsheet
//! datasets, cleans product descriptions, and patches dictionary templates.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
