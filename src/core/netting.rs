//! Debt netting engine
//!
//! Reduces a list of credits to the smallest equivalent set of pairwise
//! transfers: net money owed between every pair of members is preserved and
//! every emitted transfer has a non-negative amount.
//!
//! # Algorithm
//!
//! 1. Each credit becomes a raw transfer in which the debtor pays the donor.
//! 2. Merge pass: raw transfers are folded, in original order, into an
//!    accumulator holding at most one entry per unordered pair of members.
//!    A transfer in the same direction as the accumulator entry adds its
//!    amount, the opposite direction subtracts, so opposing debts between
//!    the same pair net out. The first matching entry wins.
//! 3. Normalization pass: entries that went negative are rotated (from/to
//!    swapped, amount negated) so all results are non-negative.
//!
//! Zero-amount entries are suppressed from the final output: a pair whose
//! credits cancel exactly has no actionable payment between them. The entry
//! still participates in merging, keeping first-match semantics intact.
//!
//! The merge scan is O(n * m) for n credits over m distinct pairs, which is
//! comfortable at chat-group scale.

use crate::types::{BotError, Credit, Transfer};
use rust_decimal::Decimal;

/// Map a credit to its raw transfer: the debtor pays the donor
pub fn transfer_from_credit(credit: &Credit) -> Transfer {
    Transfer {
        from: credit.debtor.clone(),
        to: credit.donor.clone(),
        amount: credit.amount,
    }
}

/// Fold `incoming` into the accumulator entry covering the same pair
///
/// Same direction adds, opposite direction subtracts. Callers only invoke
/// this after matching the pair; the check here guards the accumulator
/// invariant against future misuse.
///
/// # Errors
///
/// Returns [`BotError::PairMismatch`] if the two transfers cover different
/// pairs of members. This indicates a bug in the merge scan and is never
/// shown to the chat.
fn merge_into(entry: &mut Transfer, incoming: &Transfer) -> Result<(), BotError> {
    if !entry.involves_same_pair(incoming) {
        return Err(BotError::PairMismatch);
    }

    if entry.from.same_identity(&incoming.from) {
        entry.amount += incoming.amount;
    } else {
        entry.amount -= incoming.amount;
    }
    Ok(())
}

/// Rotate a transfer so its amount is non-negative
fn normalized(transfer: Transfer) -> Transfer {
    if transfer.amount < Decimal::ZERO {
        Transfer {
            from: transfer.to,
            to: transfer.from,
            amount: -transfer.amount,
        }
    } else {
        transfer
    }
}

/// Net a list of credits into minimal pairwise transfers
///
/// The output contains at most one transfer per unordered pair of members
/// that ever exchanged credits, ordered by the first occurrence of each
/// pair in the input. All amounts are non-negative; pairs that net to zero
/// are omitted.
///
/// # Errors
///
/// Returns [`BotError::PairMismatch`] only if the accumulator invariant is
/// violated, which indicates a bug rather than bad input.
pub fn net_credits(credits: &[Credit]) -> Result<Vec<Transfer>, BotError> {
    let mut merged: Vec<Transfer> = Vec::new();

    for credit in credits {
        let transfer = transfer_from_credit(credit);
        match merged
            .iter_mut()
            .find(|entry| entry.involves_same_pair(&transfer))
        {
            Some(entry) => merge_into(entry, &transfer)?,
            None => merged.push(transfer),
        }
    }

    Ok(merged
        .into_iter()
        .map(normalized)
        .filter(|transfer| !transfer.amount.is_zero())
        .collect())
}
