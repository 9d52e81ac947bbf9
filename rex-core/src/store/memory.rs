//! In-process ledger store used by tests and dry runs.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use rex_shared_types::{Account, Address, Delegation, EventCursor};

use super::{LedgerChanges, LedgerStore};
use crate::error::{LedgerError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Address, Account>,
    delegations: HashMap<String, Delegation>,
    cursor: Option<EventCursor>,
}

impl MemoryState {
    fn insert_delegation(&mut self, delegation: &Delegation) -> bool {
        if self.delegations.contains_key(&delegation.id) {
            warn!("Delegation record {} already exists, keeping the original", delegation.id);
            return false;
        }
        self.delegations.insert(delegation.id.clone(), delegation.clone());
        true
    }
}

/// A `HashMap`-backed store. Commits happen under a single write lock, so a
/// reader never sees half of an event.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: RwLock<MemoryState>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| LedgerError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| LedgerError::Store("memory store lock poisoned".to_string()))
    }

    pub fn delegation_count(&self) -> Result<usize> {
        Ok(self.read()?.delegations.len())
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn get_account(&self, id: &Address) -> Result<Option<Account>> {
        Ok(self.read()?.accounts.get(id).cloned())
    }

    fn save(&self, account: &Account) -> Result<()> {
        self.write()?
            .accounts
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    fn append_delegation(&self, delegation: &Delegation) -> Result<bool> {
        Ok(self.write()?.insert_delegation(delegation))
    }

    fn get_delegation(&self, id: &str) -> Result<Option<Delegation>> {
        Ok(self.read()?.delegations.get(id).cloned())
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self.read()?.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(accounts)
    }

    fn cursor(&self) -> Result<Option<EventCursor>> {
        Ok(self.read()?.cursor)
    }

    fn commit(&self, changes: LedgerChanges) -> Result<()> {
        let mut state = self.write()?;
        for account in changes.accounts {
            state.accounts.insert(account.id.clone(), account);
        }
        for delegation in &changes.delegations {
            state.insert_delegation(delegation);
        }
        state.cursor = Some(changes.cursor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rex_shared_types::{Amount, Asset, EventMeta, PowerKind};

    fn addr(byte: u8) -> Address {
        Address::parse(&format!("0x{:040x}", byte)).unwrap()
    }

    fn meta(tx_hash: &str) -> EventMeta {
        EventMeta {
            block_number: 1,
            log_index: 0,
            timestamp: 100,
            tx_hash: tx_hash.to_string(),
        }
    }

    #[test]
    fn test_load_or_create_defaults() {
        let store = MemoryLedgerStore::new();
        let account = store.load_or_create(&addr(1)).unwrap();
        assert_eq!(account, Account::new(addr(1)));
        // Creation alone does not persist anything.
        assert!(store.get_account(&addr(1)).unwrap().is_none());
    }

    #[test]
    fn test_load_or_create_rejects_zero_address() {
        let store = MemoryLedgerStore::new();
        assert_eq!(store.load_or_create(&Address::zero()), Err(LedgerError::NullAddress));
    }

    #[test]
    fn test_delegations_are_append_only() {
        let store = MemoryLedgerStore::new();
        let first = Delegation::new(addr(1), addr(2), Asset::Rex, PowerKind::Voting, Amount::from_raw(5), &meta("0xaa"));
        let mut second = first.clone();
        second.amount = Amount::from_raw(99);

        assert!(store.append_delegation(&first).unwrap());
        assert!(!store.append_delegation(&second).unwrap());
        assert_eq!(store.get_delegation(&first.id).unwrap(), Some(first));
    }

    #[test]
    fn test_commit_sets_cursor_and_accounts() {
        let store = MemoryLedgerStore::new();
        let mut account = Account::new(addr(7));
        account.rex.balance = Amount::from_raw(10);
        let cursor = EventCursor { block_number: 4, log_index: 2 };

        store
            .commit(LedgerChanges {
                accounts: vec![account.clone()],
                delegations: vec![],
                cursor,
            })
            .unwrap();

        assert_eq!(store.cursor().unwrap(), Some(cursor));
        assert_eq!(store.get_account(&addr(7)).unwrap(), Some(account));
        assert_eq!(store.accounts().unwrap().len(), 1);
    }
}
