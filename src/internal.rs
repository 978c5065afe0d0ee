//! Internal wrapper types for journal items, `Transaction` and `Posting`.

use ledger_parser::{Ledger, LedgerItem, Posting, Transaction};
use rust_decimal::Decimal;

use crate::comment::Comment;
use crate::ledgerutil;
use crate::tags;

/// A single item of a journal. Only transactions take part in matching,
/// everything else is carried through untouched.
#[derive(Debug)]
pub enum Entry {
    Transaction(TransactionPostings),
    Other(LedgerItem),
}

impl Entry {
    /// Unpacks all items of `ledger`, preserving their order.
    pub fn from_ledger(ledger: Ledger) -> Vec<Self> {
        ledger.items.into_iter().map(Into::into).collect()
    }

    pub fn into_ledger(entries: Vec<Self>) -> Ledger {
        Ledger {
            items: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_transaction(&self) -> Option<&TransactionPostings> {
        match self {
            Entry::Transaction(trn) => Some(trn),
            Entry::Other(_) => None,
        }
    }
}

impl From<LedgerItem> for Entry {
    fn from(item: LedgerItem) -> Self {
        match item {
            LedgerItem::Transaction(trn) => Entry::Transaction(trn.into()),
            other => Entry::Other(other),
        }
    }
}

impl From<Entry> for LedgerItem {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Transaction(trn) => LedgerItem::Transaction(trn.into()),
            Entry::Other(item) => item,
        }
    }
}

/// TransactionInternal is a `Transaction` with the comment string (if any) moved
/// out as a `Comment`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionInternal {
    pub raw: Transaction,
    pub comment: Comment,
}

impl TransactionInternal {
    /// The `id` value tag, if present.
    pub fn id(&self) -> Option<&str> {
        self.comment.value(tags::TRANSACTION_ID_KEY)
    }
}

impl From<Transaction> for TransactionInternal {
    fn from(mut raw: Transaction) -> Self {
        let comment = Comment::from_opt_string(&raw.comment);
        raw.comment = None;
        Self { raw, comment }
    }
}

impl From<TransactionInternal> for Transaction {
    fn from(mut trn: TransactionInternal) -> Self {
        trn.raw.comment = trn.comment.into_opt_comment();
        trn.raw
    }
}

/// A `TransactionInternal` paired with its `PostingInternal`s.
///
/// Typically for use at the input/output boundary of processing a journal.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionPostings {
    pub trn: TransactionInternal,
    pub posts: Vec<PostingInternal>,
}

impl TransactionPostings {
    /// Postings eligible to be one end of a transfer, in posting order.
    pub fn transfer_candidates(&self) -> impl Iterator<Item = &PostingInternal> {
        self.posts.iter().filter(|post| post.is_transfer_candidate())
    }

    pub fn has_transfer_candidates(&self) -> bool {
        self.transfer_candidates().next().is_some()
    }
}

impl From<Transaction> for TransactionPostings {
    fn from(mut raw_trn: Transaction) -> Self {
        let raw_posts = std::mem::take(&mut raw_trn.postings);
        let posts: Vec<PostingInternal> = raw_posts.into_iter().map(Into::into).collect();
        let trn: TransactionInternal = raw_trn.into();
        Self { trn, posts }
    }
}

impl From<TransactionPostings> for Transaction {
    fn from(trn_posts: TransactionPostings) -> Self {
        let raw_posts: Vec<Posting> = trn_posts.posts.into_iter().map(Into::into).collect();
        let mut raw_trn: Transaction = trn_posts.trn.into();
        raw_trn.postings = raw_posts;
        raw_trn
    }
}

/// PostingInternal is a `Posting` with the comment string (if any) moved out as
/// a `Comment`
#[derive(Clone, Debug, PartialEq)]
pub struct PostingInternal {
    pub raw: Posting,
    pub comment: Comment,
}

impl PostingInternal {
    pub fn account(&self) -> &str {
        &self.raw.account
    }

    /// The signed quantity of the posting, `None` for a balancing posting.
    pub fn quantity(&self) -> Option<Decimal> {
        ledgerutil::posting_quantity(&self.raw)
    }

    /// True for postings on asset or liability accounts that carry an amount.
    pub fn is_transfer_candidate(&self) -> bool {
        self.quantity().is_some()
            && ledgerutil::account_root(self.account())
                .map_or(false, |root| tags::TRANSFER_ACCOUNT_ROOTS.contains(&root))
    }

    /// True for postings in the placeholder namespace.
    pub fn is_placeholder(&self) -> bool {
        ledgerutil::account_is_within(self.account(), tags::PLACEHOLDER_ACCOUNT)
    }
}

impl From<Posting> for PostingInternal {
    fn from(mut raw: Posting) -> Self {
        let comment = Comment::from_opt_string(&raw.comment);
        raw.comment = None;
        Self { raw, comment }
    }
}

impl From<PostingInternal> for Posting {
    fn from(mut post: PostingInternal) -> Self {
        post.raw.comment = post.comment.into_opt_comment();
        post.raw
    }
}
