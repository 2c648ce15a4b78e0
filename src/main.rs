//! Traceability audit CLI for the AVB filter driver project.

mod cli;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
