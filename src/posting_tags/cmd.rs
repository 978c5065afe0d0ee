use anyhow::Result;
use clap::Args;

use crate::filespec::{self, FileSpec};
use crate::posting_tags::promote_posting_tags;

#[derive(Debug, Args)]
pub struct Command {
    /// The Ledger journal to read.
    input_journal: FileSpec,
    /// The ledger file to write to (overwrites any existing file). "-" writes
    /// to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let entries = filespec::read_journal(&self.input_journal)?;
        let out = promote_posting_tags(entries);
        filespec::write_journal(&self.output, out.entries)
    }
}
