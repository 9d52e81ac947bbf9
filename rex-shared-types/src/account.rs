//! Per-participant power record.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Asset, PowerKind};

/// One amount per power kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerPair {
    pub voting: Amount,
    pub proposition: Amount,
}

impl PowerPair {
    pub fn get(&self, kind: PowerKind) -> Amount {
        match kind {
            PowerKind::Voting => self.voting,
            PowerKind::Proposition => self.proposition,
        }
    }

    pub fn get_mut(&mut self, kind: PowerKind) -> &mut Amount {
        match kind {
            PowerKind::Voting => &mut self.voting,
            PowerKind::Proposition => &mut self.proposition,
        }
    }
}

/// Raw and derived power fields of one account for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPower {
    /// Token balance held by the account.
    pub balance: Amount,
    /// Receiver of this account's voting power; the account itself by default.
    pub voting_delegate: Address,
    /// Receiver of this account's proposition power; the account itself by default.
    pub proposition_delegate: Address,
    /// Power received from accounts delegating to this one.
    pub delegated_in: PowerPair,
    /// Power this account has sent to its delegates.
    pub delegated_out: PowerPair,
    /// `balance + delegated_in - delegated_out`, per kind.
    pub total: PowerPair,
}

impl AssetPower {
    fn new(owner: &Address) -> Self {
        Self {
            balance: Amount::ZERO,
            voting_delegate: owner.clone(),
            proposition_delegate: owner.clone(),
            delegated_in: PowerPair::default(),
            delegated_out: PowerPair::default(),
            total: PowerPair::default(),
        }
    }

    pub fn delegate(&self, kind: PowerKind) -> &Address {
        match kind {
            PowerKind::Voting => &self.voting_delegate,
            PowerKind::Proposition => &self.proposition_delegate,
        }
    }

    pub fn set_delegate(&mut self, kind: PowerKind, delegate: Address) {
        match kind {
            PowerKind::Voting => self.voting_delegate = delegate,
            PowerKind::Proposition => self.proposition_delegate = delegate,
        }
    }
}

/// Number of accounts delegating a power kind to an account, self included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeCounts {
    pub voting: u32,
    pub proposition: u32,
}

impl Default for RepresentativeCounts {
    fn default() -> Self {
        Self {
            voting: 1,
            proposition: 1,
        }
    }
}

impl RepresentativeCounts {
    pub fn get(&self, kind: PowerKind) -> u32 {
        match kind {
            PowerKind::Voting => self.voting,
            PowerKind::Proposition => self.proposition,
        }
    }

    pub fn get_mut(&mut self, kind: PowerKind) -> &mut u32 {
        match kind {
            PowerKind::Voting => &mut self.voting,
            PowerKind::Proposition => &mut self.proposition,
        }
    }
}

/// The stored power record of a single participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Address,
    pub rex: AssetPower,
    pub stk_rex: AssetPower,
    /// Sum of the REX and stkREX totals, per kind.
    pub total: PowerPair,
    /// Maintained by REX delegations only.
    pub representatives: RepresentativeCounts,
    /// Block timestamp (seconds) of the last event that retotaled this account.
    pub last_update_timestamp: u64,
}

impl Account {
    /// A fresh record: zero balances, self-delegation for every asset and kind.
    pub fn new(id: Address) -> Self {
        Self {
            rex: AssetPower::new(&id),
            stk_rex: AssetPower::new(&id),
            total: PowerPair::default(),
            representatives: RepresentativeCounts::default(),
            last_update_timestamp: 0,
            id,
        }
    }

    pub fn power(&self, asset: Asset) -> &AssetPower {
        asset.power(self)
    }

    pub fn power_mut(&mut self, asset: Asset) -> &mut AssetPower {
        asset.power_mut(self)
    }

    pub fn is_self_delegating(&self, asset: Asset, kind: PowerKind) -> bool {
        self.power(asset).delegate(kind) == &self.id
    }
}
