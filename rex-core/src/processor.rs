//! Event dispatch and atomic commit.

use rex_shared_types::{EventCursor, LedgerEvent, LedgerEventKind};

use crate::audit_log;
use crate::error::Result;
use crate::power::{apply_delegation_change, apply_transfer};
use crate::session::{Anomaly, EventSession};
use crate::store::LedgerStore;

/// Result of handing one event to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Applied {
        cursor: EventCursor,
        accounts_updated: usize,
        delegations_recorded: usize,
        anomalies: Vec<Anomaly>,
    },
    /// The event is at or before the committed cursor and was not reapplied.
    Skipped { cursor: EventCursor },
}

impl EventOutcome {
    pub fn anomalies(&self) -> &[Anomaly] {
        match self {
            EventOutcome::Applied { anomalies, .. } => anomalies,
            EventOutcome::Skipped { .. } => &[],
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied { .. })
    }
}

/// Running counters for a ledger instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub events_applied: u64,
    pub events_skipped: u64,
    pub transfers: u64,
    pub delegation_changes: u64,
    pub anomalies: u64,
}

/// Applies token events to a [`LedgerStore`], strictly one at a time.
pub struct PowerLedger<S: LedgerStore> {
    store: S,
    stats: LedgerStats,
}

impl<S: LedgerStore> PowerLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            stats: LedgerStats::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> &LedgerStats {
        &self.stats
    }

    /// Applies `event` and commits every resulting change in one store write.
    ///
    /// On error nothing from the event has been persisted and the same event
    /// can be delivered again.
    pub fn process(&mut self, event: &LedgerEvent) -> Result<EventOutcome> {
        if let Some(cursor) = self.store.cursor()? {
            if event.meta.cursor() <= cursor {
                audit_log::log_event_skipped(event, &cursor);
                self.stats.events_skipped += 1;
                return Ok(EventOutcome::Skipped { cursor });
            }
        }

        let mut session = EventSession::new(&self.store, event.asset, &event.meta);
        match &event.kind {
            LedgerEventKind::Transfer { from, to, value } => {
                apply_transfer(&mut session, from, to, *value)?;
            }
            LedgerEventKind::DelegateChanged {
                delegator,
                delegatee,
                power,
            } => {
                apply_delegation_change(&mut session, delegator, delegatee, *power)?;
            }
        }
        let (changes, anomalies) = session.finish()?;

        let cursor = changes.cursor;
        let accounts_updated = changes.accounts.len();
        let delegations_recorded = changes.delegations.len();
        self.store.commit(changes)?;

        audit_log::log_event_applied(event, accounts_updated);
        self.stats.events_applied += 1;
        self.stats.anomalies += anomalies.len() as u64;
        match event.kind {
            LedgerEventKind::Transfer { .. } => self.stats.transfers += 1,
            LedgerEventKind::DelegateChanged { .. } => self.stats.delegation_changes += 1,
        }

        Ok(EventOutcome::Applied {
            cursor,
            accounts_updated,
            delegations_recorded,
            anomalies,
        })
    }
}
