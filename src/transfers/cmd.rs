use anyhow::{bail, Result};
use clap::Args;

use crate::filespec::{self, FileSpec};
use crate::transfers::{self, Config, MatchOutput};

/// Options shared by the commands that run the matcher.
#[derive(Debug, Args)]
pub struct MatcherOptions {
    /// The Ledger journal to read.
    input_journal: FileSpec,
    /// Matcher option string, e.g. "include_unmatched_warnings".
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
    /// Report each unmatched transfer posting as a warning, regardless of
    /// --config.
    #[arg(long = "include-unmatched-warnings")]
    include_unmatched_warnings: bool,
}

impl MatcherOptions {
    fn config(&self) -> Config {
        let mut config = Config::from_opt_str(self.config.as_deref());
        config.include_unmatched_warnings |= self.include_unmatched_warnings;
        config
    }

    fn run_matcher(&self) -> Result<MatchOutput> {
        let entries = filespec::read_journal(&self.input_journal)?;
        Ok(transfers::run(entries, &self.config()))
    }
}

#[derive(Debug, Args)]
pub struct Command {
    #[command(flatten)]
    matcher: MatcherOptions,
    /// Fail if any transfer posting was left unmatched. The output is still
    /// written.
    #[arg(long = "deny-unmatched")]
    deny_unmatched: bool,
    /// The ledger file to write to (overwrites any existing file). "-" writes
    /// to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let out = self.matcher.run_matcher()?;
        let unmatched = unmatched_summary(&out);
        filespec::write_journal(&self.output, out.entries)?;

        if self.deny_unmatched {
            if let Some(summary) = unmatched {
                bail!("{}: {}", self.matcher.input_journal, summary);
            }
        }
        Ok(())
    }
}

/// Describes the unmatched transfer postings of a run, one diagnostic per
/// line, or `None` if everything matched.
fn unmatched_summary(out: &MatchOutput) -> Option<String> {
    if out.stats.unmatched == 0 {
        return None;
    }
    let mut summary = format!(
        "{} of {} transfer postings are unmatched",
        out.stats.unmatched, out.stats.checked
    );
    for diagnostic in &out.diagnostics {
        summary.push_str("\n  ");
        summary.push_str(&diagnostic.to_string());
    }
    Some(summary)
}

#[derive(Debug, Args)]
pub struct StatsCommand {
    #[command(flatten)]
    matcher: MatcherOptions,
}

impl StatsCommand {
    pub fn run(&self) -> Result<()> {
        let out = self.matcher.run_matcher()?;
        filespec::write_file(&FileSpec::Stdio, &stats_report(&out))
    }
}

fn stats_report(out: &MatchOutput) -> String {
    let stats = &out.stats;
    format!(
        concat!(
            "checked: {}\nmatched: {}\nunmatched: {}\n",
            "links: {}\ndirect pairs: {}\ndiagnostics: {}\n",
        ),
        stats.checked,
        stats.matched,
        stats.unmatched,
        stats.links,
        stats.direct_pairs,
        out.diagnostics.len(),
    )
}
