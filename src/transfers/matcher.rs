//! Resolves placeholder postings to their transfer counterparties.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::comment::Comment;
use crate::internal::{Entry, PostingInternal, TransactionPostings};
use crate::tags;
use crate::transfers::config::Config;
use crate::transfers::index::{zerosum_link_for, zerosum_links, TransferIndex};
use crate::transfers::narration::{merge_narration, transfer_narration};

/// A transfer candidate for which no counterparty was found. Never fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub account: String,
    pub date: NaiveDate,
    pub description: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "transfer not matched: {} on {} ({})",
            self.account, self.date, self.description
        )
    }
}

/// Counters for a matching run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchStats {
    /// Transfer candidates examined.
    pub checked: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Distinct link tokens in the index.
    pub links: usize,
    /// Candidate accounts with a counterparty in the same transaction.
    pub direct_pairs: usize,
}

/// The result of `match_transfers`.
#[derive(Debug)]
pub struct MatchOutput {
    /// The input entries in their original order, with placeholder postings
    /// annotated.
    pub entries: Vec<Entry>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: MatchStats,
}

/// Annotates the placeholder postings in `entries` using lookups into `index`,
/// which must have been built from the same entries.
pub fn match_transfers(
    entries: Vec<Entry>,
    index: &TransferIndex,
    config: &Config,
) -> MatchOutput {
    let mut matcher = Matcher {
        index,
        config,
        diagnostics: Vec::new(),
        stats: MatchStats {
            links: index.link_count(),
            direct_pairs: index.direct_pair_count(),
            ..MatchStats::default()
        },
    };

    let entries: Vec<Entry> = entries
        .into_iter()
        .enumerate()
        .map(|(entry_idx, entry)| match entry {
            Entry::Transaction(trn) if trn.has_transfer_candidates() => {
                Entry::Transaction(matcher.process_transaction(entry_idx, trn))
            }
            other => other,
        })
        .collect();

    info!(
        matched = matcher.stats.matched,
        unmatched = matcher.stats.unmatched,
        checked = matcher.stats.checked,
        "transfer matching complete"
    );

    MatchOutput {
        entries,
        diagnostics: matcher.diagnostics,
        stats: matcher.stats,
    }
}

struct Matcher<'a> {
    index: &'a TransferIndex,
    config: &'a Config,
    diagnostics: Vec<Diagnostic>,
    stats: MatchStats,
}

/// Counterparties found for the transfer candidates of one transaction, keyed
/// by candidate account.
#[derive(Default)]
struct CandidateMatches<'t, 'i> {
    counterparties: HashMap<&'t str, &'i str>,
    /// Signed amounts of the matched candidates.
    amounts: HashMap<&'t str, Decimal>,
}

/// A resolved counterparty for a placeholder.
struct Resolution<'a> {
    account: &'a str,
    date: NaiveDate,
}

impl<'a> Matcher<'a> {
    fn process_transaction(
        &mut self,
        entry_idx: usize,
        trn: TransactionPostings,
    ) -> TransactionPostings {
        let mut annotations: HashMap<usize, Comment> = {
            let matches = self.match_candidates(&trn);
            trn.posts
                .iter()
                .enumerate()
                .filter(|(_, post)| post.is_placeholder())
                .filter_map(|(post_idx, post)| {
                    self.annotate_placeholder(entry_idx, &trn, post, &matches)
                        .map(|comment| (post_idx, comment))
                })
                .collect()
        };
        if annotations.is_empty() {
            return trn;
        }

        let TransactionPostings { trn, posts } = trn;
        let posts = posts
            .into_iter()
            .enumerate()
            .map(|(post_idx, post)| match annotations.remove(&post_idx) {
                Some(comment) => PostingInternal { comment, ..post },
                None => post,
            })
            .collect();
        TransactionPostings { trn, posts }
    }

    /// Finds a counterparty for each transfer candidate: by link first, then
    /// within the transaction by id.
    fn match_candidates<'t>(&mut self, trn: &'t TransactionPostings) -> CandidateMatches<'t, 'a> {
        let mut matches = CandidateMatches::default();

        for post in trn.transfer_candidates() {
            self.stats.checked += 1;
            match self.match_candidate(trn, post) {
                Some(matched_account) => {
                    self.stats.matched += 1;
                    matches.counterparties.insert(post.account(), matched_account);
                    if let Some(quantity) = post.quantity() {
                        matches.amounts.insert(post.account(), quantity);
                    }
                }
                None => {
                    self.stats.unmatched += 1;
                    self.report_unmatched(trn, post);
                }
            }
        }

        matches
    }

    fn match_candidate(
        &self,
        trn: &TransactionPostings,
        post: &PostingInternal,
    ) -> Option<&'a str> {
        let index: &'a TransferIndex = self.index;
        let account = post.account();

        let by_link = zerosum_links(trn).find_map(|link| index.link_counterparty(link, account));
        if let Some(record) = by_link {
            debug!(account, matched = %record.account, "link match");
            return Some(&record.account);
        }

        let direct = trn
            .trn
            .id()
            .and_then(|id| index.direct_counterparty(id, account));
        if let Some(record) = direct {
            debug!(account, matched = %record.account, "direct transfer match");
            return Some(&record.account);
        }

        None
    }

    fn report_unmatched(&mut self, trn: &TransactionPostings, post: &PostingInternal) {
        let date = trn.trn.raw.date;
        let description = &trn.trn.raw.description;
        if !self.config.include_unmatched_warnings {
            debug!(
                account = post.account(),
                %date,
                description = %description,
                "transfer not matched"
            );
            return;
        }
        let diagnostic = Diagnostic {
            account: post.account().to_string(),
            date,
            description: description.clone(),
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Returns the new comment for the placeholder `post`, or `None` to leave
    /// it unchanged.
    fn annotate_placeholder(
        &self,
        entry_idx: usize,
        trn: &TransactionPostings,
        post: &PostingInternal,
        matches: &CandidateMatches<'_, 'a>,
    ) -> Option<Comment> {
        let source_account = trn.transfer_candidates().next()?.account();
        let resolution = self
            .resolve_by_match_id(entry_idx, post, source_account)
            .or_else(|| resolve_by_candidates(trn, matches))?;
        debug!(
            placeholder = post.account(),
            source = source_account,
            matched = resolution.account,
            "placeholder resolved"
        );

        let mut comment = post.comment.clone();
        let value_tags = &mut comment.value_tags;
        value_tags.insert(
            tags::SOURCE_ACCOUNT_KEY.to_string(),
            source_account.to_string(),
        );
        value_tags.insert(
            tags::MATCHED_ACCOUNT_KEY.to_string(),
            resolution.account.to_string(),
        );
        value_tags.insert(
            tags::MATCHED_DATE_KEY.to_string(),
            resolution.date.to_string(),
        );

        // Direction is only known when the source itself was matched.
        if let Some(amount) = matches.amounts.get(source_account) {
            let generated = transfer_narration(source_account, resolution.account, *amount);
            let narration = merge_narration(generated, comment.value(tags::NARRATION_KEY));
            comment
                .value_tags
                .insert(tags::NARRATION_KEY.to_string(), narration);
        }

        Some(comment)
    }

    /// Looks up the link named by the placeholder's `match_id`, which leads to
    /// the counterparty in another transaction.
    fn resolve_by_match_id(
        &self,
        entry_idx: usize,
        post: &PostingInternal,
        source_account: &str,
    ) -> Option<Resolution<'a>> {
        let index: &'a TransferIndex = self.index;
        let link = zerosum_link_for(post.comment.value(tags::MATCH_ID_KEY)?);
        let record = index.link_counterparty_outside(&link, source_account, entry_idx)?;
        debug!(link = %link, matched = %record.account, "match by id");
        Some(Resolution {
            account: &record.account,
            date: record.date,
        })
    }
}

/// Falls back to the counterparty of the first matched candidate in the
/// transaction itself.
fn resolve_by_candidates<'i>(
    trn: &TransactionPostings,
    matches: &CandidateMatches<'_, 'i>,
) -> Option<Resolution<'i>> {
    trn.transfer_candidates()
        .find_map(|post| matches.counterparties.get(post.account()).copied())
        .map(|account| Resolution {
            account,
            date: trn.trn.raw.date,
        })
}
