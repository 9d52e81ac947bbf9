//! Sled-based ledger storage implementation

use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::TransactionResult;
use sled::{Db, Transactional};

use rex_core::{LedgerChanges, LedgerError, LedgerStore, Result};
use rex_shared_types::{Account, Address, Delegation, EventCursor};

const CF_ACCOUNTS: &str = "accounts";
const CF_DELEGATIONS: &str = "delegations";
const CF_METADATA: &str = "metadata";

const CURSOR_KEY: &[u8] = b"cursor";

fn store_error(err: sled::Error) -> LedgerError {
    LedgerError::Store(err.to_string())
}

/// Sled-based implementation of the `LedgerStore` trait.
///
/// # Fields
/// * `db` - The underlying Sled database
/// * `accounts` - Tree for account power records, keyed by address
/// * `delegations` - Tree for append-only delegation records, keyed by record id
/// * `metadata` - Tree for the event cursor
pub struct SledLedgerStore {
    db: Db,
    accounts: sled::Tree,
    delegations: sled::Tree,
    metadata: sled::Tree,
}

impl SledLedgerStore {
    /// Opens (or creates) the ledger database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = sled::open(path).map_err(store_error)?;

        Ok(Self {
            accounts: db.open_tree(CF_ACCOUNTS).map_err(store_error)?,
            delegations: db.open_tree(CF_DELEGATIONS).map_err(store_error)?,
            metadata: db.open_tree(CF_METADATA).map_err(store_error)?,
            db,
        })
    }

    /// Inserts a serializable value into a sled tree
    fn insert_into_tree<T: Serialize>(&self, tree: &sled::Tree, key: &[u8], value: &T) -> Result<()> {
        let serialized = bincode::serialize(value)?;
        tree.insert(key, serialized).map_err(store_error)?;
        Ok(())
    }

    /// Retrieves a value from a sled tree
    ///
    /// # Returns
    /// `Ok(Some(value))` if found, `Ok(None)` if not found, or an error
    fn get_from_tree<T: DeserializeOwned>(&self, tree: &sled::Tree, key: &[u8]) -> Result<Option<T>> {
        match tree.get(key).map_err(store_error)? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Blocks until all committed events are durable on disk.
    pub fn flush(&self) -> Result<usize> {
        self.db.flush().map_err(store_error)
    }
}

impl LedgerStore for SledLedgerStore {
    fn get_account(&self, id: &Address) -> Result<Option<Account>> {
        self.get_from_tree(&self.accounts, id.as_ref())
    }

    fn save(&self, account: &Account) -> Result<()> {
        self.insert_into_tree(&self.accounts, account.id.as_ref(), account)
    }

    fn append_delegation(&self, delegation: &Delegation) -> Result<bool> {
        let serialized = bincode::serialize(delegation)?;
        let swapped = self
            .delegations
            .compare_and_swap(delegation.id.as_bytes(), None as Option<&[u8]>, Some(serialized))
            .map_err(store_error)?;
        if swapped.is_err() {
            warn!("Delegation record {} already exists, keeping the original", delegation.id);
            return Ok(false);
        }
        Ok(true)
    }

    fn get_delegation(&self, id: &str) -> Result<Option<Delegation>> {
        self.get_from_tree(&self.delegations, id.as_bytes())
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        self.accounts
            .iter()
            .map(|entry| -> Result<Account> {
                let (_key, value) = entry.map_err(store_error)?;
                Ok(bincode::deserialize(&value)?)
            })
            .collect()
    }

    fn cursor(&self) -> Result<Option<EventCursor>> {
        self.get_from_tree(&self.metadata, CURSOR_KEY)
    }

    fn commit(&self, changes: LedgerChanges) -> Result<()> {
        let accounts = changes
            .accounts
            .iter()
            .map(|account| -> Result<(Vec<u8>, Vec<u8>)> {
                Ok((account.id.as_str().as_bytes().to_vec(), bincode::serialize(account)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let delegations = changes
            .delegations
            .iter()
            .map(|delegation| -> Result<(String, Vec<u8>)> {
                Ok((delegation.id.clone(), bincode::serialize(delegation)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let cursor = bincode::serialize(&changes.cursor)?;

        let result: TransactionResult<Vec<String>, ()> = (&self.accounts, &self.delegations, &self.metadata)
            .transaction(|(accounts_tx, delegations_tx, metadata_tx)| {
                for (key, value) in &accounts {
                    accounts_tx.insert(key.as_slice(), value.as_slice())?;
                }
                let mut duplicates = Vec::new();
                for (id, value) in &delegations {
                    if delegations_tx.get(id.as_bytes())?.is_some() {
                        duplicates.push(id.clone());
                        continue;
                    }
                    delegations_tx.insert(id.as_bytes(), value.as_slice())?;
                }
                metadata_tx.insert(CURSOR_KEY, cursor.as_slice())?;
                Ok(duplicates)
            });

        let duplicates = result.map_err(|e| LedgerError::Store(format!("ledger commit failed: {:?}", e)))?;
        for id in duplicates {
            warn!("Delegation record {} already exists, keeping the original", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledLedgerStore::open(dir.path()).unwrap();
        assert!(store.accounts().unwrap().is_empty());
        assert!(store.cursor().unwrap().is_none());
    }
}
