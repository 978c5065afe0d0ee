//! Promotion of posting-level tags to their transaction.
//!
//! A posting can carry its own tags in a `tags` value tag, which keeps the
//! association per posting in split-purpose transactions. Promotion adds the
//! union of those tags to the transaction as flag tags, so that they show up
//! in transaction-level queries. The posting's own `tags` value is kept.
//!
//! ```text
//! 2026/01/15 Costco                 2026/01/15 Costco
//!     Expenses:Furniture  USD 200       ; :123MainSt:Jim:
//!     ; tags: 123MainSt          =>     Expenses:Furniture  USD 200
//!     Expenses:Gifts  USD 50            ; tags: 123MainSt
//!     ; tags: Jim                       ...
//! ```

pub mod cmd;

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::internal::{Entry, TransactionPostings};
use crate::tags;

/// The result of `promote_posting_tags`.
#[derive(Debug)]
pub struct PromoteOutput {
    pub entries: Vec<Entry>,
    /// Transactions that have at least one posting with tags.
    pub promoted: usize,
}

pub fn promote_posting_tags(entries: Vec<Entry>) -> PromoteOutput {
    let mut promoted = 0;
    let entries: Vec<Entry> = entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Transaction(trn) => {
                let (trn, has_posting_tags) = promote_transaction(trn);
                if has_posting_tags {
                    promoted += 1;
                }
                Entry::Transaction(trn)
            }
            other => other,
        })
        .collect();

    info!(promoted, "promoted posting tags");
    PromoteOutput { entries, promoted }
}

/// Adds the posting tags of `trn` to its own tags. Also returns whether any
/// posting carried a `tags` value.
fn promote_transaction(mut trn: TransactionPostings) -> (TransactionPostings, bool) {
    let mut has_posting_tags = false;
    let mut posting_tags = BTreeSet::<String>::new();
    for post in &trn.posts {
        let raw = match post.comment.value_tags.get(tags::POSTING_TAGS_KEY) {
            Some(raw) => raw,
            None => continue,
        };
        has_posting_tags = true;
        for tag in raw.split_whitespace() {
            // A ':' would split the tag apart when the comment is read back.
            if tag.contains(tags::ACCOUNT_SEPARATOR) {
                debug!(tag, account = post.account(), "skipping tag containing ':'");
                continue;
            }
            posting_tags.insert(tag.to_string());
        }
    }

    trn.trn.comment.tags.extend(posting_tags);
    (trn, has_posting_tags)
}
