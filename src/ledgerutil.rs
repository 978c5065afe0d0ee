//! Helpers for handling ledger-parser structures and account names.

use ledger_parser::Posting;
use rust_decimal::Decimal;

use crate::tags::ACCOUNT_SEPARATOR;

/// Returns the signed quantity of `post`, or `None` if the amount is left to
/// be inferred.
pub fn posting_quantity(post: &Posting) -> Option<Decimal> {
    post.amount.as_ref().map(|amount| amount.amount.quantity)
}

/// Returns the top-level segment of `account`, `None` for an empty name.
pub fn account_root(account: &str) -> Option<&str> {
    account
        .split(ACCOUNT_SEPARATOR)
        .next()
        .filter(|root| !root.is_empty())
}

/// Returns the last segment of `account`.
pub fn account_leaf(account: &str) -> &str {
    account.rsplit(ACCOUNT_SEPARATOR).next().unwrap_or(account)
}

/// True if `account` is `parent` or one of its descendants.
pub fn account_is_within(account: &str, parent: &str) -> bool {
    match account.strip_prefix(parent) {
        Some(rest) => rest.is_empty() || rest.starts_with(ACCOUNT_SEPARATOR),
        None => false,
    }
}
