//! Transfer counterparty matching.
//!
//! Zero-sum balancing leaves each leg of a transfer in its own transaction,
//! joined by a `ZeroSum.<id>` link and balanced against a placeholder posting
//! under `Equity:ZeroSum`. This module finds the other leg of each transfer
//! and records it on the placeholder:
//!
//! ```text
//! Equity:ZeroSum:Transfers  GBP 500.00
//!   ; matched_transfer_account: Assets:Savings:Emergency
//!   ; matched_transfer_date: 2026-02-06
//!   ; narration: Transfer from Main to Emergency
//!   ; source_account: Assets:Checking:Main
//! ```
//!
//! Matching runs in two passes: `index::TransferIndex::build` scans the batch
//! once, then `matcher::match_transfers` annotates placeholders from the
//! index.

pub mod cmd;
pub mod config;
pub mod index;
pub mod matcher;
pub mod narration;

use crate::internal::Entry;

pub use config::Config;
pub use index::TransferIndex;
pub use matcher::{match_transfers, MatchOutput};

/// Builds the index for `entries` and annotates them in one call.
pub fn run(entries: Vec<Entry>, config: &Config) -> MatchOutput {
    let index = TransferIndex::build(&entries);
    match_transfers(entries, &index, config)
}
