//! Decoded token events consumed by the ledger.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Asset, PowerKind};

/// Where an event came from on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub block_number: u64,
    pub log_index: u32,
    /// Block timestamp, seconds since the epoch.
    pub timestamp: u64,
    pub tx_hash: String,
}

impl EventMeta {
    pub fn cursor(&self) -> EventCursor {
        EventCursor {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

/// Position of an event in the delivered stream. Orders by block, then log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventCursor {
    pub block_number: u64,
    pub log_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    /// `Transfer(from, to, value)`; the zero address marks a mint or burn.
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    /// `DelegateChanged(delegator, delegatee, delegationType)`.
    DelegateChanged {
        delegator: Address,
        delegatee: Address,
        power: PowerKind,
    },
}

/// A typed event for one of the two assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub asset: Asset,
    pub meta: EventMeta,
    pub kind: LedgerEventKind,
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self.kind {
            LedgerEventKind::Transfer { .. } => "Transfer",
            LedgerEventKind::DelegateChanged { .. } => "DelegateChanged",
        }
    }
}
