//! Mimizuku CLI main entry point

use anyhow::Result;
use clap::Parser;
use mimizuku_cli::commands::{run, Cli};

fn main() -> Result<()> {
    // Progress goes to stderr; the diagram owns the selected sink.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}
