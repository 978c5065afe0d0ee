//! Lookup tables built in a single pass over a batch of entries.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::internal::{Entry, PostingInternal, TransactionPostings};
use crate::tags::ZEROSUM_LINK_PREFIX;

/// One end of a transfer as seen from the index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRecord {
    /// Position of the contributing transaction within the batch.
    pub entry_idx: usize,
    pub account: String,
    pub date: NaiveDate,
    pub payee: String,
}

impl TransferRecord {
    fn new(entry_idx: usize, post: &PostingInternal, trn: &TransactionPostings) -> Self {
        Self {
            entry_idx,
            account: post.account().to_string(),
            date: trn.trn.raw.date,
            payee: trn.trn.raw.description.clone(),
        }
    }
}

/// Transfer candidates indexed by zero-sum link token and by transaction
/// identifier.
///
/// Built once per batch and only read afterwards.
#[derive(Debug, Default)]
pub struct TransferIndex {
    /// Link token to the candidates of every transaction carrying it, in batch
    /// order.
    links: HashMap<String, Vec<TransferRecord>>,
    /// Transaction id, then candidate account, to that candidate's
    /// counterparty within the same transaction.
    direct: HashMap<String, HashMap<String, TransferRecord>>,
}

impl TransferIndex {
    pub fn build(entries: &[Entry]) -> Self {
        let mut index = Self::default();
        for (entry_idx, entry) in entries.iter().enumerate() {
            if let Some(trn) = entry.as_transaction() {
                index.add_transaction(entry_idx, trn);
            }
        }
        debug!(
            links = index.links.len(),
            direct_pairs = index.direct_pair_count(),
            "transfer indexes built"
        );
        index
    }

    fn add_transaction(&mut self, entry_idx: usize, trn: &TransactionPostings) {
        let candidates: Vec<&PostingInternal> = trn.transfer_candidates().collect();
        if candidates.is_empty() {
            return;
        }

        for link in zerosum_links(trn) {
            let records = self.links.entry(link.to_string()).or_default();
            records.extend(
                candidates
                    .iter()
                    .map(|post| TransferRecord::new(entry_idx, post, trn)),
            );
        }

        let id = match trn.trn.id() {
            Some(id) if candidates.len() >= 2 => id,
            _ => return,
        };
        let by_account = self.direct.entry(id.to_string()).or_default();
        for post in &candidates {
            // The first other account in posting order is taken as the
            // counterparty, even when there are several.
            let counterparty = candidates
                .iter()
                .find(|other| other.account() != post.account());
            if let Some(counterparty) = counterparty {
                by_account.insert(
                    post.account().to_string(),
                    TransferRecord::new(entry_idx, counterparty, trn),
                );
            }
        }
    }

    /// All records contributed under `link`, in batch order.
    pub fn link_records(&self, link: &str) -> &[TransferRecord] {
        self.links.get(link).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first record under `link` that is not on `account`.
    pub fn link_counterparty(&self, link: &str, account: &str) -> Option<&TransferRecord> {
        self.link_records(link)
            .iter()
            .find(|record| record.account != account)
    }

    /// The first record under `link` that is not on `account`, preferring
    /// records contributed by a transaction other than the one at
    /// `entry_idx`.
    pub fn link_counterparty_outside(
        &self,
        link: &str,
        account: &str,
        entry_idx: usize,
    ) -> Option<&TransferRecord> {
        self.link_records(link)
            .iter()
            .find(|record| record.entry_idx != entry_idx && record.account != account)
            .or_else(|| self.link_counterparty(link, account))
    }

    /// The counterparty of `account` within the transaction identified by
    /// `id`.
    pub fn direct_counterparty(&self, id: &str, account: &str) -> Option<&TransferRecord> {
        self.direct.get(id).and_then(|by_account| by_account.get(account))
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn direct_pair_count(&self) -> usize {
        self.direct.values().map(HashMap::len).sum()
    }
}

/// The zero-sum link tokens on a transaction, in sorted order.
pub fn zerosum_links(trn: &TransactionPostings) -> impl Iterator<Item = &str> {
    trn.trn
        .comment
        .links()
        .into_iter()
        .filter(|link| link.starts_with(ZEROSUM_LINK_PREFIX))
}

/// The link token for a placeholder's `match_id`.
pub fn zerosum_link_for(match_id: &str) -> String {
    format!("{}{}", ZEROSUM_LINK_PREFIX, match_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::parse_entries;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn links_collect_candidates_across_transactions() {
        let entries = parse_entries(
            r#"
            2026/02/05 Move to savings
                ; :^ZeroSum.m1:
                Assets:Checking:Main  GBP -500.00
                Equity:ZeroSum:Transfers
            2026/02/06 Arrived in savings
                ; :^ZeroSum.m1:
                Assets:Savings:Emergency  GBP 500.00
                Expenses:Fees  GBP 1.00
                Equity:ZeroSum:Transfers
            "#,
        );
        let index = TransferIndex::build(&entries);

        let records: Vec<(&str, NaiveDate, &str)> = index
            .link_records("ZeroSum.m1")
            .iter()
            .map(|r| (r.account.as_str(), r.date, r.payee.as_str()))
            .collect();
        assert_eq!(
            records,
            vec![
                ("Assets:Checking:Main", date(2026, 2, 5), "Move to savings"),
                ("Assets:Savings:Emergency", date(2026, 2, 6), "Arrived in savings"),
            ]
        );
        assert_eq!(
            index
                .link_counterparty("ZeroSum.m1", "Assets:Checking:Main")
                .map(|r| r.account.as_str()),
            Some("Assets:Savings:Emergency"),
        );
        assert_eq!(index.link_count(), 1);
        assert_eq!(index.direct_pair_count(), 0);
    }

    #[test]
    fn link_counterparty_outside_prefers_other_transactions() {
        let entries = parse_entries(
            r#"
            2026/02/05 Split
                ; :^ZeroSum.m1:
                Assets:Checking:Main  GBP -500.00
                Assets:Savings:Emergency  GBP 300.00
                Equity:ZeroSum:Transfers
            2026/02/07 Card payment
                ; :^ZeroSum.m1:
                Liabilities:Visa  GBP 200.00
                Equity:ZeroSum:Transfers
            "#,
        );
        let index = TransferIndex::build(&entries);
        let split_idx = index.link_records("ZeroSum.m1")[0].entry_idx;

        assert_eq!(
            index
                .link_counterparty("ZeroSum.m1", "Assets:Checking:Main")
                .map(|r| r.account.as_str()),
            Some("Assets:Savings:Emergency"),
        );
        assert_eq!(
            index
                .link_counterparty_outside("ZeroSum.m1", "Assets:Checking:Main", split_idx)
                .map(|r| r.account.as_str()),
            Some("Liabilities:Visa"),
        );
        // Nothing outside the split transaction is on another account, so the
        // split's own records are used.
        assert_eq!(
            index
                .link_counterparty_outside("ZeroSum.m1", "Liabilities:Visa", split_idx)
                .map(|r| r.account.as_str()),
            Some("Assets:Checking:Main"),
        );
    }

    #[test]
    fn links_without_zerosum_prefix_are_ignored() {
        let entries = parse_entries(
            r#"
            2026/02/05 Move to savings
                ; :^invoice-42:
                Assets:Checking:Main  GBP -500.00
                Equity:ZeroSum:Transfers
            "#,
        );
        let index = TransferIndex::build(&entries);
        assert_eq!(index.link_count(), 0);
        assert!(index.link_records("invoice-42").is_empty());
    }

    #[test]
    fn transactions_without_candidates_contribute_nothing() {
        let entries = parse_entries(
            r#"
            2026/02/05 Lunch
                ; id: t1
                ; :^ZeroSum.m1:
                Expenses:Food  GBP 5.00
                Income:Refunds  GBP -5.00
                Assets:Checking:Main
            "#,
        );
        let index = TransferIndex::build(&entries);
        assert_eq!(index.link_count(), 0);
        assert_eq!(index.direct_pair_count(), 0);
    }

    #[test]
    fn direct_pairs_need_an_id() {
        let entries = parse_entries(
            r#"
            2026/02/05 With id
                ; id: t1
                Assets:Checking:Main  GBP -500.00
                Assets:Savings:Emergency  GBP 500.00
            2026/02/05 Without id
                Assets:Checking:Main  GBP -20.00
                Liabilities:Visa  GBP 20.00
            "#,
        );
        let index = TransferIndex::build(&entries);
        assert_eq!(index.direct_pair_count(), 2);
        assert_eq!(
            index
                .direct_counterparty("t1", "Assets:Checking:Main")
                .map(|r| r.account.as_str()),
            Some("Assets:Savings:Emergency"),
        );
        assert_eq!(
            index
                .direct_counterparty("t1", "Assets:Savings:Emergency")
                .map(|r| r.account.as_str()),
            Some("Assets:Checking:Main"),
        );
        assert!(index
            .direct_counterparty("t1", "Liabilities:Visa")
            .is_none());
    }

    #[test]
    fn direct_pairs_take_first_other_account_for_three_way_splits() {
        let entries = parse_entries(
            r#"
            2026/02/05 Three way
                ; id: t3
                Assets:Checking:Main  GBP -300.00
                Assets:Savings:Emergency  GBP 200.00
                Assets:Savings:Holiday  GBP 100.00
            "#,
        );
        let index = TransferIndex::build(&entries);
        let counterparty = |account: &str| {
            index
                .direct_counterparty("t3", account)
                .map(|r| r.account.clone())
        };
        assert_eq!(
            counterparty("Assets:Checking:Main").as_deref(),
            Some("Assets:Savings:Emergency")
        );
        assert_eq!(
            counterparty("Assets:Savings:Emergency").as_deref(),
            Some("Assets:Checking:Main")
        );
        assert_eq!(
            counterparty("Assets:Savings:Holiday").as_deref(),
            Some("Assets:Checking:Main")
        );
    }

    #[test]
    fn same_account_candidates_are_not_paired() {
        let entries = parse_entries(
            r#"
            2026/02/05 Shuffle
                ; id: t4
                Assets:Checking:Main  GBP -10.00
                Assets:Checking:Main  GBP 10.00
            "#,
        );
        let index = TransferIndex::build(&entries);
        assert_eq!(index.direct_pair_count(), 0);
    }
}
