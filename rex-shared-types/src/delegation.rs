//! Immutable record of a delegation reassignment.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Asset, EventMeta, PowerKind};

/// Written once per `DelegateChanged` event and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// `delegator:delegate:asset:tx_hash`.
    pub id: String,
    pub delegator: Address,
    pub delegate: Address,
    pub asset: Asset,
    pub power: PowerKind,
    pub timestamp: u64,
    /// Delegator's balance of `asset` before the reassignment was applied.
    pub amount: Amount,
}

impl Delegation {
    pub fn new(
        delegator: Address,
        delegate: Address,
        asset: Asset,
        power: PowerKind,
        amount: Amount,
        meta: &EventMeta,
    ) -> Self {
        Self {
            id: Self::record_id(&delegator, &delegate, asset, &meta.tx_hash),
            delegator,
            delegate,
            asset,
            power,
            timestamp: meta.timestamp,
            amount,
        }
    }

    pub fn record_id(delegator: &Address, delegate: &Address, asset: Asset, tx_hash: &str) -> String {
        format!("{}:{}:{}:{}", delegator, delegate, asset.tag(), tx_hash)
    }
}
