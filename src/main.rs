use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
mod testutil;

mod comment;
mod filespec;
mod internal;
mod ledgerutil;
mod posting_tags;
mod tags;
mod transfers;

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_DIRECTIVE: &str = "zerosum_match=info";

#[derive(Debug, Parser)]
/// Utilities for matching transfers and promoting tags in Ledger journals.
struct Command {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    #[command(name = "match-transfers")]
    /// Annotates zero-sum placeholder postings with the counterparty of their
    /// transfer and writes the journal back out.
    MatchTransfers(transfers::cmd::Command),
    #[command(name = "stats")]
    /// Runs transfer matching and prints how many transfer postings matched,
    /// without writing the journal.
    Stats(transfers::cmd::StatsCommand),
    #[command(name = "promote-tags")]
    /// Adds the tags listed in postings' `tags` values to their transactions.
    PromoteTags(posting_tags::cmd::Command),
}

/// Logs go to stderr; stdout carries journal output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cmd = Command::parse();
    use SubCommand::*;
    match cmd.subcmd {
        MatchTransfers(cmd) => cmd.run(),
        Stats(cmd) => cmd.run(),
        PromoteTags(cmd) => cmd.run(),
    }
}
