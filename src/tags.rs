/// Marker at the start of a flag tag that makes it a link token, e.g.
/// `:^ZeroSum.abc123:`.
pub const LINK_PREFIX: &str = "^";
/// Prefix of link tokens produced by zero-sum balancing. The remainder of the
/// token is an opaque match identifier.
pub const ZEROSUM_LINK_PREFIX: &str = "ZeroSum.";

/// Account namespace of placeholder postings that get annotated.
pub const PLACEHOLDER_ACCOUNT: &str = "Equity:ZeroSum";
/// Top-level account segments whose postings may be transfer candidates.
pub const TRANSFER_ACCOUNT_ROOTS: [&str; 2] = ["Assets", "Liabilities"];
/// Separator between account name segments.
pub const ACCOUNT_SEPARATOR: char = ':';

/// Key for a value tag on a transaction holding its identifier.
pub const TRANSACTION_ID_KEY: &str = "id";
/// Key for a value tag on a placeholder posting naming the link that holds its
/// counterparty.
pub const MATCH_ID_KEY: &str = "match_id";

/// Key written to placeholders: the transfer candidate of their transaction.
pub const SOURCE_ACCOUNT_KEY: &str = "source_account";
/// Key written to placeholders: the counterparty account.
pub const MATCHED_ACCOUNT_KEY: &str = "matched_transfer_account";
/// Key written to placeholders: the counterparty date, as `YYYY-MM-DD`.
pub const MATCHED_DATE_KEY: &str = "matched_transfer_date";
/// Key written to placeholders: a human readable description of the transfer.
pub const NARRATION_KEY: &str = "narration";

/// Key for a value tag on a posting listing its tags, separated by whitespace.
pub const POSTING_TAGS_KEY: &str = "tags";
