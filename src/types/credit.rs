//! Credit and transfer types
//!
//! A [`Credit`] is the persisted record of one member lending money to
//! another. A [`Transfer`] is the derived payment obligation produced by the
//! netting engine; transfers are ephemeral and never written to the store.

use super::user::User;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit identifier
///
/// Credits are keyed by the message id of the chat message that created them,
/// which the transport guarantees to be unique within a chat.
pub type CreditId = i64;

/// A recorded claim that one member lent money to another
///
/// Immutable once created; the only lifecycle transition is deletion through
/// an undo request by the original donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    /// Unique identifier (source message id)
    pub id: CreditId,

    /// The member who lent the money
    pub donor: User,

    /// The member who owes the money
    pub debtor: User,

    /// Amount lent; always positive
    pub amount: Decimal,

    /// Free-text reason for the credit; never empty
    pub description: String,
}

/// A derived payment obligation between two members
///
/// During merging the amount is signed: a negative amount means the direction
/// is reversed relative to `from`/`to`. Normalization rotates such entries so
/// every transfer handed out by the netting engine is non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// The member who pays
    pub from: User,

    /// The member who receives
    pub to: User,

    /// Amount to pay; non-negative after normalization
    pub amount: Decimal,
}

impl Transfer {
    /// Whether this transfer covers the same unordered pair of members
    ///
    /// Direction is ignored: `A -> B` and `B -> A` cover the same pair.
    pub fn involves_same_pair(&self, other: &Transfer) -> bool {
        (self.from.same_identity(&other.from) && self.to.same_identity(&other.to))
            || (self.from.same_identity(&other.to) && self.to.same_identity(&other.from))
    }
}
