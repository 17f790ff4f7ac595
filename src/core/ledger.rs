//! Credit ledger
//!
//! This module provides the [`LedgerStore`], the single owner of the credit
//! collection. Every mutation flows through it: insertion is idempotent on
//! the credit id, and removal is gated on the requester being the donor of
//! the record. Durable storage is delegated to an injected
//! [`CreditStore`](crate::store::CreditStore) implementation.
//!
//! # Duplicate Handling
//!
//! A credit whose id is already registered is silently ignored and logged at
//! warning level. The transport can redeliver messages, so a duplicate is an
//! expected event, not a failure the sender needs to hear about.

use crate::store::CreditStore;
use crate::types::{BotError, Credit, CreditId, User};
use tracing::warn;

/// Owner of the credit collection
///
/// Constructed once at startup with the store backend and handed to the
/// dispatcher; all ledger access is serialized through it.
pub struct LedgerStore {
    store: Box<dyn CreditStore>,
}

impl LedgerStore {
    /// Create a ledger backed by the given store
    pub fn new(store: Box<dyn CreditStore>) -> Self {
        LedgerStore { store }
    }

    /// Register a credit unless its id is already present
    ///
    /// Returns whether the credit was inserted. Duplicates are logged and
    /// ignored; they are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] if persisting the insertion fails.
    pub fn add_if_missing(&mut self, credit: Credit) -> Result<bool, BotError> {
        let id = credit.id;
        let inserted = self.store.insert_if_absent(credit)?;
        if !inserted {
            warn!(credit_id = id, "credit already registered, ignoring");
        }
        Ok(inserted)
    }

    /// Remove a credit if the requester is its donor
    ///
    /// Returns the removed record on success.
    ///
    /// # Errors
    ///
    /// - [`BotError::CreditNotFound`] if no credit has the given id
    /// - [`BotError::NotCreditOwner`] if the requester is not the donor;
    ///   the ledger is left unchanged
    /// - [`BotError::Store`] if persisting the removal fails
    pub fn remove_if_owned_by(
        &mut self,
        id: CreditId,
        requester: &User,
    ) -> Result<Credit, BotError> {
        let credit = self
            .store
            .get(id)
            .ok_or_else(|| BotError::credit_not_found(id))?;

        if !credit.donor.same_identity(requester) {
            warn!(
                credit_id = id,
                requester = %requester.id,
                owner = %credit.donor.id,
                "undo rejected, requester is not the donor"
            );
            return Err(BotError::not_credit_owner(id, &credit.donor.first_name));
        }

        let removed = self
            .store
            .remove(id)?
            .ok_or_else(|| BotError::credit_not_found(id))?;
        Ok(removed)
    }

    /// All credits, or all credits involving the given user
    ///
    /// With a user, returns every credit where that user is donor or
    /// debtor. A record never has the same donor and debtor, so the union
    /// is duplicate-free.
    pub fn get_all(&self, user: Option<&User>) -> Vec<Credit> {
        match user {
            None => self.store.all(),
            Some(user) => self.store.involving(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn ledger(dir: &TempDir) -> LedgerStore {
        let store = JsonFileStore::open(&dir.path().join("credits.json")).unwrap();
        LedgerStore::new(Box::new(store))
    }

    fn credit(id: i64, donor: User, debtor: User, cents: i64) -> Credit {
        Credit {
            id,
            donor,
            debtor,
            amount: Decimal::new(cents, 2),
            description: "groceries".to_string(),
        }
    }

    #[test]
    fn test_add_if_missing_inserts_new_credit() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let inserted = ledger
            .add_if_missing(credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben"), 1000))
            .unwrap();

        assert!(inserted);
        assert_eq!(ledger.get_all(None).len(), 1);
    }

    #[test]
    fn test_add_if_missing_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let record = credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben"), 1000);
        assert!(ledger.add_if_missing(record.clone()).unwrap());
        assert!(!ledger.add_if_missing(record).unwrap());

        // Exactly one record after the duplicate insert
        assert_eq!(ledger.get_all(None).len(), 1);
    }

    #[test]
    fn test_remove_by_donor_returns_record() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let anna = User::with_id(1, "Anna");
        ledger
            .add_if_missing(credit(1, anna.clone(), User::with_id(2, "Ben"), 1000))
            .unwrap();

        let removed = ledger.remove_if_owned_by(1, &anna).unwrap();
        assert_eq!(removed.id, 1);
        assert!(ledger.get_all(None).is_empty());
    }

    #[test]
    fn test_remove_missing_id_fails_without_mutation() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let anna = User::with_id(1, "Anna");
        ledger
            .add_if_missing(credit(1, anna.clone(), User::with_id(2, "Ben"), 1000))
            .unwrap();

        let result = ledger.remove_if_owned_by(99, &anna);
        assert!(matches!(
            result.unwrap_err(),
            BotError::CreditNotFound { id: 99 }
        ));
        assert_eq!(ledger.get_all(None).len(), 1);
    }

    #[test]
    fn test_remove_by_non_donor_fails_without_mutation() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let anna = User::with_id(1, "Anna");
        let ben = User::with_id(2, "Ben");
        ledger
            .add_if_missing(credit(1, anna.clone(), ben.clone(), 1000))
            .unwrap();

        // The debtor may not undo the donor's credit
        let result = ledger.remove_if_owned_by(1, &ben);
        match result.unwrap_err() {
            BotError::NotCreditOwner { id, owner } => {
                assert_eq!(id, 1);
                assert_eq!(owner, "Anna");
            }
            other => panic!("expected NotCreditOwner, got {:?}", other),
        }
        assert_eq!(ledger.get_all(None).len(), 1);
    }

    #[test]
    fn test_get_all_filters_by_involvement() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger(&dir);

        let anna = User::with_id(1, "Anna");
        let ben = User::with_id(2, "Ben");
        let cleo = User::with_id(3, "Cleo");

        ledger
            .add_if_missing(credit(1, anna.clone(), ben.clone(), 1000))
            .unwrap();
        ledger
            .add_if_missing(credit(2, ben.clone(), cleo.clone(), 500))
            .unwrap();

        assert_eq!(ledger.get_all(None).len(), 2);
        assert_eq!(ledger.get_all(Some(&anna)).len(), 1);
        assert_eq!(ledger.get_all(Some(&ben)).len(), 2);
        assert_eq!(ledger.get_all(Some(&cleo)).len(), 1);
    }
}
