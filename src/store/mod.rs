//! Document store for credit records
//!
//! The ledger persists credits through the [`CreditStore`] trait so the
//! business logic never touches files directly. The trait mirrors what the
//! core requires from durable storage: insert-if-absent by unique id, exact
//! lookup by id, field-equality query on donor/debtor, and delete by id. No
//! transactions beyond whole-collection writes are needed.
//!
//! [`JsonFileStore`] is the production implementation: one JSON file holding
//! the full credit collection, loaded at open and rewritten on every
//! mutation. At chat-group scale the collection is small enough that
//! rewriting beats incremental formats in simplicity.

use crate::types::{BotError, Credit, CreditId, User};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage contract required by the ledger
///
/// Reads are served from memory and cannot fail; mutations persist to
/// durable storage and report I/O problems as [`BotError::Store`].
pub trait CreditStore {
    /// Insert a credit unless one with the same id already exists
    ///
    /// Returns whether the insertion occurred. A duplicate id is a no-op
    /// and returns `false`, never an error.
    fn insert_if_absent(&mut self, credit: Credit) -> Result<bool, BotError>;

    /// Look up a credit by id
    fn get(&self, id: CreditId) -> Option<Credit>;

    /// Remove a credit by id, returning the removed record
    fn remove(&mut self, id: CreditId) -> Result<Option<Credit>, BotError>;

    /// All credits, in insertion order
    fn all(&self) -> Vec<Credit>;

    /// All credits where the user is donor or debtor, in insertion order
    fn involving(&self, user: &User) -> Vec<Credit>;
}

/// Single-file JSON document store
///
/// The collection lives in one JSON array on disk. Insertion order is
/// preserved, which keeps bill output stable across restarts.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    credits: Vec<Credit>,
}

impl JsonFileStore {
    /// Open a store backed by the given file
    ///
    /// A missing file starts an empty collection; it is created on the
    /// first mutation. An existing file must parse as a credit array.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] if the file exists but cannot be read
    /// or does not parse.
    pub fn open(path: &Path) -> Result<Self, BotError> {
        let credits = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            Vec::new()
        };

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            credits,
        })
    }

    /// Number of credits currently stored
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    /// Whether the store holds no credits
    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    fn persist(&self) -> Result<(), BotError> {
        let raw = serde_json::to_string_pretty(&self.credits)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl CreditStore for JsonFileStore {
    fn insert_if_absent(&mut self, credit: Credit) -> Result<bool, BotError> {
        if self.credits.iter().any(|c| c.id == credit.id) {
            return Ok(false);
        }
        self.credits.push(credit);
        self.persist()?;
        Ok(true)
    }

    fn get(&self, id: CreditId) -> Option<Credit> {
        self.credits.iter().find(|c| c.id == id).cloned()
    }

    fn remove(&mut self, id: CreditId) -> Result<Option<Credit>, BotError> {
        let position = self.credits.iter().position(|c| c.id == id);
        match position {
            Some(index) => {
                let removed = self.credits.remove(index);
                self.persist()?;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    fn all(&self) -> Vec<Credit> {
        self.credits.clone()
    }

    fn involving(&self, user: &User) -> Vec<Credit> {
        self.credits
            .iter()
            .filter(|c| c.donor.same_identity(user) || c.debtor.same_identity(user))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn credit(id: i64, donor: User, debtor: User) -> Credit {
        Credit {
            id,
            donor,
            debtor,
            amount: Decimal::new(1000, 2),
            description: "pizza".to_string(),
        }
    }

    fn open_store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(&dir.path().join("credits.json")).unwrap()
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let inserted = store
            .insert_if_absent(credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben")))
            .unwrap();
        assert!(inserted);

        let found = store.get(1).unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(found.donor.first_name, "Anna");
    }

    #[test]
    fn test_insert_duplicate_id_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let first = credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben"));
        let second = credit(1, User::with_id(3, "Cleo"), User::with_id(2, "Ben"));

        assert!(store.insert_if_absent(first).unwrap());
        assert!(!store.insert_if_absent(second).unwrap());

        // First record wins, exactly one stored
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().donor.first_name, "Anna");
    }

    #[test]
    fn test_remove_returns_the_record() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store
            .insert_if_absent(credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben")))
            .unwrap();

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.unwrap().id, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_id_returns_none() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        assert!(store.remove(99).unwrap().is_none());
    }

    #[test]
    fn test_involving_matches_donor_and_debtor() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let anna = User::with_id(1, "Anna");
        let ben = User::with_id(2, "Ben");
        let cleo = User::with_id(3, "Cleo");

        store
            .insert_if_absent(credit(1, anna.clone(), ben.clone()))
            .unwrap();
        store
            .insert_if_absent(credit(2, ben.clone(), cleo.clone()))
            .unwrap();
        store
            .insert_if_absent(credit(3, cleo.clone(), anna.clone()))
            .unwrap();

        let around_anna = store.involving(&anna);
        assert_eq!(around_anna.len(), 2);
        assert_eq!(around_anna[0].id, 1);
        assert_eq!(around_anna[1].id, 3);

        let around_ben = store.involving(&ben);
        assert_eq!(around_ben.len(), 2);
    }

    #[test]
    fn test_collection_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credits.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store
                .insert_if_absent(credit(1, User::with_id(1, "Anna"), User::with_id(2, "Ben")))
                .unwrap();
            store
                .insert_if_absent(credit(2, User::with_id(2, "Ben"), User::with_id(1, "Anna")))
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        // Insertion order is preserved across restarts
        let all = reopened.all();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credits.json");
        fs::write(&path, "not json at all").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result.unwrap_err(), BotError::Store { .. }));
    }
}
