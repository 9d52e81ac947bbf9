//! Account ledger store and delegation recorder interfaces.

pub mod memory;

pub use memory::MemoryLedgerStore;

use rex_shared_types::{Account, Address, Delegation, EventCursor};

use crate::error::{LedgerError, Result};

/// Everything one event wants to persist. Applied all-or-nothing by
/// [`LedgerStore::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerChanges {
    pub accounts: Vec<Account>,
    pub delegations: Vec<Delegation>,
    pub cursor: EventCursor,
}

/// Storage backend for account records, delegation records and the event
/// cursor.
///
/// Implementations only need interior mutability for a single writer: the
/// ledger processes one event at a time.
pub trait LedgerStore {
    fn get_account(&self, id: &Address) -> Result<Option<Account>>;

    /// Returns the stored record for `id`, or a default self-delegating one.
    /// The zero address is rejected, it is never an account.
    fn load_or_create(&self, id: &Address) -> Result<Account> {
        if id.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        Ok(self
            .get_account(id)?
            .unwrap_or_else(|| Account::new(id.clone())))
    }

    fn save(&self, account: &Account) -> Result<()>;

    /// Stores a delegation record. An existing record with the same id is left
    /// untouched; returns whether the record was written.
    fn append_delegation(&self, delegation: &Delegation) -> Result<bool>;

    fn get_delegation(&self, id: &str) -> Result<Option<Delegation>>;

    fn accounts(&self) -> Result<Vec<Account>>;

    /// Position of the last committed event, if any.
    fn cursor(&self) -> Result<Option<EventCursor>>;

    /// Atomically persists accounts, delegation records and the new cursor.
    fn commit(&self, changes: LedgerChanges) -> Result<()>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn get_account(&self, id: &Address) -> Result<Option<Account>> {
        (**self).get_account(id)
    }

    fn save(&self, account: &Account) -> Result<()> {
        (**self).save(account)
    }

    fn append_delegation(&self, delegation: &Delegation) -> Result<bool> {
        (**self).append_delegation(delegation)
    }

    fn get_delegation(&self, id: &str) -> Result<Option<Delegation>> {
        (**self).get_delegation(id)
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        (**self).accounts()
    }

    fn cursor(&self) -> Result<Option<EventCursor>> {
        (**self).cursor()
    }

    fn commit(&self, changes: LedgerChanges) -> Result<()> {
        (**self).commit(changes)
    }
}
