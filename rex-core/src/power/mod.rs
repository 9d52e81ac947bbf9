//! Incremental power recomputation.
//!
//! Both assets run through the same handlers; the [`Asset`](rex_shared_types::Asset)
//! carried by the session selects which balance, delegate and delegated
//! in/out fields are read and written, and whether representative counters
//! are maintained.
//!
//! Every adjustment is checked. A value leaving the `i128` range fails the
//! event with [`LedgerError::Overflow`] and nothing from it is committed.

pub mod delegation;
pub mod retotal;
pub mod transfer;

pub use delegation::apply_delegation_change;
pub use retotal::retotal;
pub use transfer::apply_transfer;

use rex_shared_types::{Address, Amount};

use crate::error::{LedgerError, Result};

pub(crate) fn overflow(account: &Address, field: &str) -> LedgerError {
    LedgerError::Overflow(format!("{} of {} leaves the ledger range", field, account))
}

/// Adds `delta` to `slot`.
pub(crate) fn adjust(slot: &mut Amount, delta: Amount, account: &Address, field: &str) -> Result<()> {
    *slot = slot
        .checked_add(delta)
        .ok_or_else(|| overflow(account, field))?;
    Ok(())
}

pub(crate) fn negate(value: Amount, account: &Address, field: &str) -> Result<Amount> {
    value.checked_neg().ok_or_else(|| overflow(account, field))
}
