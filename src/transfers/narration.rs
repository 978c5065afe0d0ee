use rust_decimal::Decimal;

use crate::ledgerutil::account_leaf;

/// Describes a transfer using the leaf names of the accounts involved.
///
/// A negative `source_amount` means money left `source_account`, so it is
/// the sender. Otherwise (including zero) `source_account` is the receiver.
pub fn transfer_narration(
    source_account: &str,
    matched_account: &str,
    source_amount: Decimal,
) -> String {
    let source_leaf = account_leaf(source_account);
    let matched_leaf = account_leaf(matched_account);
    if source_amount < Decimal::ZERO {
        format!("Transfer from {} to {}", source_leaf, matched_leaf)
    } else {
        format!("Transfer from {} to {}", matched_leaf, source_leaf)
    }
}

/// Combines a generated narration with one already present on a posting.
///
/// An existing narration is kept in parentheses after the generated text,
/// unless it already starts with the generated text (as it does after a
/// previous run).
pub fn merge_narration(generated: String, existing: Option<&str>) -> String {
    match existing {
        None => generated,
        Some(existing) if is_generated_from(existing, &generated) => existing.to_string(),
        Some(existing) => format!("{} ({})", generated, existing),
    }
}

fn is_generated_from(existing: &str, generated: &str) -> bool {
    match existing.strip_prefix(generated) {
        Some(rest) => rest.is_empty() || (rest.starts_with(" (") && rest.ends_with(')')),
        None => false,
    }
}
