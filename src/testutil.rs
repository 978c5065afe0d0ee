use ledger_parser::{LedgerItem, Posting};

use crate::comment::Comment;
use crate::internal::{Entry, PostingInternal};

pub fn parse_entries(s: &str) -> Vec<Entry> {
    let ledger =
        ledger_parser::parse(textwrap::dedent(s).as_ref()).expect("test input did not parse");
    Entry::from_ledger(ledger)
}

/// Formats entries as journal text, passing comments through `Comment` so that
/// tag ordering does not affect comparisons.
pub fn format_entries(entries: Vec<Entry>) -> String {
    format!("{}", Entry::into_ledger(entries))
}

/// Returns the comment of posting `post_idx` of the transaction at `trn_idx`,
/// counting transactions only.
pub fn posting_comment(entries: &[Entry], trn_idx: usize, post_idx: usize) -> &Comment {
    let trn = entries
        .iter()
        .filter_map(Entry::as_transaction)
        .nth(trn_idx)
        .expect("transaction index out of range");
    &trn.posts[post_idx].comment
}

#[macro_export]
macro_rules! assert_entries_eq {
    ($want:expr, $got:expr, $($context_arg:expr),*) => {
        let want_str = crate::testutil::format_entries($want);
        let got_str = crate::testutil::format_entries($got);
        if want_str != got_str {
            eprintln!($($context_arg,)*);
            text_diff::assert_diff(&want_str, &got_str, "\n", 0);
        }
    };
    ($want:expr, $got:expr) => {
        let want_str = crate::testutil::format_entries($want);
        let got_str = crate::testutil::format_entries($got);
        if want_str != got_str {
            text_diff::assert_diff(&want_str, &got_str, "\n", 0);
        }
    };
}

pub fn parse_posting(p: &str) -> Posting {
    let t = "2000/01/01 Dummy Transaction\n  ".to_string() + p + "\n";
    let mut ledger = ledger_parser::parse(&t).unwrap();
    let mut trn = match ledger.items.remove(0) {
        LedgerItem::Transaction(trn) => trn,
        other => panic!("got {:?}, want transaction", other),
    };
    trn.postings.remove(0)
}

pub fn parse_posting_internal(p: &str) -> PostingInternal {
    parse_posting(p).into()
}
