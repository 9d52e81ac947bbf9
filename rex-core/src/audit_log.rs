//! Audit logging for the power ledger.

use tracing::{event, Level};

use rex_shared_types::{Address, Amount, Asset, Delegation, EventCursor, LedgerEvent, PowerKind};

/// Logs when an event has been applied and committed.
#[tracing::instrument(level = "debug", skip(ledger_event, accounts_updated))]
pub fn log_event_applied(ledger_event: &LedgerEvent, accounts_updated: usize) {
    event!(
        Level::DEBUG,
        "{} {} applied: block={}, log_index={}, tx={}, accounts_updated={}",
        ledger_event.asset,
        ledger_event.name(),
        ledger_event.meta.block_number,
        ledger_event.meta.log_index,
        ledger_event.meta.tx_hash,
        accounts_updated
    );
}

/// Logs when a redelivered event is at or before the committed cursor.
#[tracing::instrument(level = "info", skip(ledger_event, cursor))]
pub fn log_event_skipped(ledger_event: &LedgerEvent, cursor: &EventCursor) {
    event!(
        Level::INFO,
        "Skipping {} {} at block={}, log_index={}: already committed up to block={}, log_index={}",
        ledger_event.asset,
        ledger_event.name(),
        ledger_event.meta.block_number,
        ledger_event.meta.log_index,
        cursor.block_number,
        cursor.log_index
    );
}

/// Logs a debit that left a holder with a negative balance.
#[tracing::instrument(level = "error", skip(account, balance))]
pub fn log_negative_balance(account: &Address, asset: Asset, balance: Amount) {
    event!(
        Level::ERROR,
        "Negative {} balance on holder {} with balance {}",
        asset,
        account,
        balance
    );
}

/// Logs a representative counter that would have dropped below zero.
#[tracing::instrument(level = "error", skip(account))]
pub fn log_representative_underflow(account: &Address, kind: PowerKind) {
    event!(
        Level::ERROR,
        "{} representative count of {} would go negative, clamping at zero",
        kind,
        account
    );
}

/// Logs a staged delegation record.
#[tracing::instrument(level = "debug", skip(delegation))]
pub fn log_delegation_recorded(delegation: &Delegation) {
    event!(
        Level::DEBUG,
        "Delegation recorded: id={}, power={}, amount={}",
        delegation.id,
        delegation.power,
        delegation.amount.to_decimal()
    );
}
