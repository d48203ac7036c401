//! Binary crate for the `zipweather` web service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving the HTML front end
//! - Human-friendly output for one-off lookups

use clap::Parser;

mod cli;
mod logging;
mod pages;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);
    cmd.run().await
}
