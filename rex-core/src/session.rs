//! Per-event unit of work.
//!
//! An [`EventSession`] owns every account an event touches. Handlers mutate
//! raw fields through it and mark accounts for retotaling; [`EventSession::finish`]
//! retotals each marked account exactly once, after all raw mutations, and
//! hands back the changes to commit. Dropping a session discards the event.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rex_shared_types::{Account, Address, Amount, Asset, Delegation, EventMeta, PowerKind, PowerSelector};

use crate::audit_log;
use crate::error::Result;
use crate::power::retotal;
use crate::store::{LedgerChanges, LedgerStore};

/// Data-integrity problems noticed while applying an event. They are logged
/// and reported but never abort processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    NegativeBalance {
        account: Address,
        asset: Asset,
        balance: Amount,
    },
    RepresentativeUnderflow {
        account: Address,
        kind: PowerKind,
    },
}

pub struct EventSession<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    asset: Asset,
    meta: &'a EventMeta,
    accounts: BTreeMap<Address, Account>,
    pending_retotal: BTreeMap<Address, PowerSelector>,
    delegations: Vec<Delegation>,
    anomalies: Vec<Anomaly>,
}

impl<'a, S: LedgerStore + ?Sized> EventSession<'a, S> {
    pub fn new(store: &'a S, asset: Asset, meta: &'a EventMeta) -> Self {
        Self {
            store,
            asset,
            meta,
            accounts: BTreeMap::new(),
            pending_retotal: BTreeMap::new(),
            delegations: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn meta(&self) -> &EventMeta {
        self.meta
    }

    /// Exclusive access to the session's copy of `id`, loading or creating it
    /// on first use.
    pub fn account(&mut self, id: &Address) -> Result<&mut Account> {
        match self.accounts.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let account = self.store.load_or_create(id)?;
                Ok(entry.insert(account))
            }
        }
    }

    /// Schedules `id` for a retotal of `selector` when the session finishes.
    pub fn mark_retotal(&mut self, id: &Address, selector: PowerSelector) {
        self.pending_retotal
            .entry(id.clone())
            .and_modify(|pending| *pending = pending.union(selector))
            .or_insert(selector);
    }

    pub fn stage_delegation(&mut self, delegation: Delegation) {
        audit_log::log_delegation_recorded(&delegation);
        self.delegations.push(delegation);
    }

    pub fn report_negative_balance(&mut self, account: &Address, balance: Amount) {
        audit_log::log_negative_balance(account, self.asset, balance);
        self.anomalies.push(Anomaly::NegativeBalance {
            account: account.clone(),
            asset: self.asset,
            balance,
        });
    }

    pub fn report_representative_underflow(&mut self, account: &Address, kind: PowerKind) {
        audit_log::log_representative_underflow(account, kind);
        self.anomalies.push(Anomaly::RepresentativeUnderflow {
            account: account.clone(),
            kind,
        });
    }

    /// Retotals every marked account and returns the changes to commit along
    /// with the anomalies seen on the way.
    pub fn finish(mut self) -> Result<(LedgerChanges, Vec<Anomaly>)> {
        for (id, selector) in &self.pending_retotal {
            if let Some(account) = self.accounts.get_mut(id) {
                retotal(account, self.asset, *selector, self.meta.timestamp)?;
            }
        }
        let changes = LedgerChanges {
            accounts: self.accounts.into_values().collect(),
            delegations: self.delegations,
            cursor: self.meta.cursor(),
        };
        Ok((changes, self.anomalies))
    }
}
