//! Functions to read and write text files. Allows use of "-" as a way to
//! specify stdin or stdout.

use std::fmt;
use std::fs::File;
use std::io::{stdin, stdout, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Error, Result};

use crate::internal::Entry;

/// Specifies a file to read from to write to (depending on context).
#[derive(Clone, Debug)]
pub enum FileSpec {
    /// Read from stdin or write to stdout.
    Stdio,
    /// Read from or write to the file at the given path.
    Path(PathBuf),
}

impl fmt::Display for FileSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use FileSpec::*;
        match self {
            Stdio => f.write_str("<stdio>"),
            Path(path) => write!(f, "{:?}", path),
        }
    }
}

impl FileSpec {
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        use FileSpec::*;
        Ok(match self {
            Stdio => Box::new(stdin()),
            Path(path) => Box::new(
                File::open(path).with_context(|| format!("opening {:?} for reading", path))?,
            ),
        })
    }

    pub fn writer(&self) -> Result<Box<dyn Write>> {
        use FileSpec::*;
        Ok(match self {
            Stdio => Box::new(stdout()),
            Path(path) => Box::new(
                File::create(path).with_context(|| format!("opening {:?} for writing", path))?,
            ),
        })
    }
}

impl FromStr for FileSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        use FileSpec::*;
        if s == "-" {
            Ok(Stdio)
        } else {
            Ok(Path(s.into()))
        }
    }
}

pub fn read_file(file_spec: &FileSpec) -> Result<String> {
    let mut f = file_spec.reader()?;
    let mut content = String::new();
    f.read_to_string(&mut content)
        .with_context(|| format!("reading {}", file_spec))?;
    Ok(content)
}

/// Reads and parses the Ledger journal at `file_spec` into its entries.
pub fn read_journal(file_spec: &FileSpec) -> Result<Vec<Entry>> {
    let content: String = read_file(file_spec)?;
    parse_journal(&content, file_spec)
}

fn parse_journal(content: &str, file_spec: &FileSpec) -> Result<Vec<Entry>> {
    let ledger = ledger_parser::parse(content)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("parsing ledger journal {}", file_spec))?;
    Ok(Entry::from_ledger(ledger))
}

pub fn write_journal(file_spec: &FileSpec, entries: Vec<Entry>) -> Result<()> {
    let content: String = format!("{}", Entry::into_ledger(entries));
    write_file(file_spec, &content)
}

pub fn write_file(file_spec: &FileSpec, content: &str) -> Result<()> {
    let mut f = file_spec.writer()?;
    f.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use test_case::test_case;

    use super::*;

    #[test_case("-" => "<stdio>"; "dash is stdio")]
    #[test_case("books/main.ledger" => r#""books/main.ledger""#; "path")]
    fn parse_and_display(s: &str) -> String {
        s.parse::<FileSpec>()
            .expect("file specs always parse")
            .to_string()
    }

    #[test]
    fn parses_journal_into_entries() {
        let entries = parse_journal(
            &textwrap::dedent(
                r#"
                2026/02/05 Move to savings
                    Assets:Checking:Main  GBP -500.00
                    Equity:ZeroSum:Transfers  GBP 500.00
                "#,
            ),
            &FileSpec::Path(PathBuf::from("main.ledger")),
        )
        .expect("journal should parse");

        let transactions: Vec<_> = entries.iter().filter_map(Entry::as_transaction).collect();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].posts.len(), 2);
        assert_eq!(transactions[0].trn.raw.description, "Move to savings");
    }
}
